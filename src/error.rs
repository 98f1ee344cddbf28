use std::path::PathBuf;

use raster_ops::OpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported pixel layout: {0}")]
    UnsupportedLayout(String),

    #[error("Image too large: {width}x{height}")]
    Dimensions { width: usize, height: usize },

    #[error("Invalid pixel buffer: {0}")]
    Buffer(#[from] OpError),
}

#[derive(Debug, Error)]
pub enum FontError {
    #[error("Font not found: {0}")]
    NotFound(String),

    #[error("Failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse font: {0}")]
    Parse(String),

    #[error("Invalid font size: {0}")]
    InvalidSize(f32),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to read recipe {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse recipe: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Step {index} ({op}): {reason}")]
    InvalidStep {
        index: usize,
        op: &'static str,
        reason: String,
    },

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Font error: {0}")]
    Font(#[from] FontError),
}
