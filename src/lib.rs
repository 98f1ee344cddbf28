//! ImageGene - pixel-buffer image toolkit
//!
//! File codecs, font loading, configuration and the recipe pipeline around
//! the `raster-ops` transform engine. This library exposes modules for
//! integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;

pub use raster_ops;
