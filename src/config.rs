//! Engine configuration
//!
//! Uses RON for human-readable config files:
//!
//! ```ron
//! (
//!   surface: (width: 320, height: 240, format: (bytes_per_pixel: 2, ...), depth_buffer: true),
//!   raster: (interpolation: Fixed, clear_color: (r: 0, g: 0, b: 0, a: 255)),
//! )
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::{Color8, PixelFormat};
use crate::error::{ConfigError, SurfaceError};
use crate::raster::Rasterizer;
use crate::surface::Surface;

/// Arithmetic used to blend vertex attributes across lines and triangles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterpolationMode {
    /// `f32` weights
    #[default]
    Float,
    /// Integer weights with 8 fractional bits
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: usize,
    pub height: usize,
    pub format: PixelFormat,
    pub depth_buffer: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            format: PixelFormat::ARGB8888,
            depth_buffer: true,
        }
    }
}

impl SurfaceConfig {
    /// Allocate a surface with this size and format, cleared to zero
    pub fn build(&self) -> Result<Surface, SurfaceError> {
        if !self.format.is_supported() {
            return Err(SurfaceError::UnsupportedFormat(self.format.bytes_per_pixel));
        }
        let surface = Surface::new(self.width, self.height, self.format);
        Ok(if self.depth_buffer { surface.with_depth() } else { surface })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    pub interpolation: InterpolationMode,
    pub clear_color: Color8,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            interpolation: InterpolationMode::Float,
            clear_color: Color8::BLACK,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub surface: SurfaceConfig,
    pub raster: RasterConfig,
}

impl EngineConfig {
    /// Surface built from `surface` and cleared to `raster.clear_color`
    pub fn create_surface(&self) -> Result<Surface, SurfaceError> {
        let mut surface = self.surface.build()?;
        surface.clear(self.raster.clear_color);
        Ok(surface)
    }

    pub fn rasterizer(&self) -> Rasterizer {
        Rasterizer::from_config(&self.raster)
    }
}

/// Load a config from a RON file and set up the render target it describes
pub fn load_render_target<P: AsRef<Path>>(path: P) -> Result<(Surface, Rasterizer), ConfigError> {
    let config = load_config(path)?;
    let surface = config.create_surface()?;
    log::debug!(
        "render target {}x{} at {} bpp, {:?} interpolation",
        surface.width(),
        surface.height(),
        config.surface.format.bits_per_pixel(),
        config.raster.interpolation
    );
    Ok((surface, config.rasterizer()))
}

/// Load a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Load a config from a RON string (for embedded configs or testing)
pub fn load_config_from_str(s: &str) -> Result<EngineConfig, ConfigError> {
    let config: EngineConfig = ron::from_str(s)?;
    if !config.surface.format.is_supported() {
        log::warn!(
            "config names an unsupported pixel format ({} bytes per pixel)",
            config.surface.format.bytes_per_pixel
        );
    }
    Ok(config)
}

/// Save a config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &EngineConfig, path: P) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}
