pub mod codec;
pub mod font;

pub use codec::{Codec, ImageFormat};
pub use font::{FontFace, FontLibrary, FontSource, DEFAULT_FONT_SIZE};
