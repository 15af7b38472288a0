//! softrast: a software 3D rasterizer for raw pixel surfaces
//!
//! Turns typed vertex data into colored pixels without any GPU:
//! - Vector/matrix math with look-at, perspective and frustum projections
//! - Vertex and index buffers described by attribute layouts
//! - A pixel codec for any 16/24/32-bit channel layout
//! - Point, line and triangle rasterization with optional depth testing
//! - Float or 8-bit fixed-point attribute interpolation

pub mod math;
pub mod buffer;
pub mod color;
pub mod surface;
pub mod raster;
pub mod config;
pub mod error;

pub use buffer::{AttributeSemantic, ColoredVertex, IndexBuffer, VertexAttribute, VertexBuffer, VertexLayout};
pub use color::{ChannelLayout, Color8, PixelFormat};
pub use config::{
    load_config, load_config_from_str, load_render_target, save_config, EngineConfig, InterpolationMode,
};
pub use error::{BufferError, ConfigError, RasterError, SurfaceError};
pub use raster::{DrawStats, Pixel, PrimitiveKind, Rasterizer};
pub use surface::{PixelStorage, Surface, DEPTH_FAR};

/// Route `log` output to the test harness
#[cfg(test)]
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
