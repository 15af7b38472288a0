//! Error types
//!
//! Only configuration-level failures surface as `Err`. Problems with a single pixel,
//! vertex or primitive are logged and skipped by the rasterizer.

use thiserror::Error;

/// Vertex/index buffer errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("vertex layout has a stride of 0 bytes")]
    ZeroStride,
    #[error("{len} bytes is not a whole number of {stride}-byte vertices")]
    PartialVertex { len: usize, stride: usize },
    #[error("failed to allocate {0} bytes")]
    OutOfMemory(usize),
}

/// Pixel surface errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("unsupported pixel size: {0} bytes per pixel")]
    UnsupportedFormat(u32),
    #[error("row pitch {pitch} is smaller than {width} pixels of {bytes_per_pixel} bytes")]
    PitchTooSmall { pitch: usize, width: usize, bytes_per_pixel: usize },
    #[error("pixel storage holds {actual} bytes, {required} required")]
    StorageTooSmall { actual: usize, required: usize },
    #[error("failed to write image: {0}")]
    Image(String),
}

impl From<image::ImageError> for SurfaceError {
    fn from(e: image::ImageError) -> Self {
        SurfaceError::Image(e.to_string())
    }
}

/// Rasterizer errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("unknown primitive kind: {0}")]
    UnknownPrimitive(String),
}

/// Configuration load/save errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid surface: {0}")]
    Surface(#[from] SurfaceError),
}
