pub mod config;
pub mod font_family;

pub use config::{AppConfig, FontConfig, OutputConfig, CONFIG_ENV};
pub use font_family::FontFamily;
