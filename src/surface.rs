//! Pixel surfaces
//!
//! A `Surface` is a raw, row-pitched byte buffer in some `PixelFormat`, plus an optional
//! depth buffer with one `f32` per pixel. The byte storage is generic so the same code
//! drives an owned back buffer (`Vec<u8>`) or a borrowed slice of mapped device memory.
//! Multi-byte pixels are stored little-endian.

use std::path::Path;

use crate::color::{Color8, PixelFormat};
use crate::error::SurfaceError;
use crate::math::Vec2i;

/// Depth value a cleared depth buffer holds; every fragment in `[0, 1]` is nearer
pub const DEPTH_FAR: f32 = f32::MAX;

/// Byte storage a surface can draw into
pub trait PixelStorage: AsRef<[u8]> + AsMut<[u8]> {}

impl<T: AsRef<[u8]> + AsMut<[u8]> + ?Sized> PixelStorage for T {}

/// Color (and optional depth) memory for one render target
#[derive(Debug, Clone)]
pub struct Surface<B = Vec<u8>> {
    pixels: B,
    depth: Option<Vec<f32>>,
    width: usize,
    height: usize,
    pitch: usize,
    format: PixelFormat,
}

impl Surface<Vec<u8>> {
    /// Owned surface with a tightly packed pitch, cleared to zero
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        let pitch = width * format.bytes_per_pixel as usize;
        Self {
            pixels: vec![0; pitch * height],
            depth: None,
            width,
            height,
            pitch,
            format,
        }
    }
}

impl<B: PixelStorage> Surface<B> {
    /// Wraps existing pixel memory, e.g. a mapped framebuffer with its own line length
    pub fn from_storage(
        pixels: B,
        width: usize,
        height: usize,
        pitch: usize,
        format: PixelFormat,
    ) -> Result<Self, SurfaceError> {
        let bpp = format.bytes_per_pixel as usize;
        if pitch < width * bpp {
            return Err(SurfaceError::PitchTooSmall { pitch, width, bytes_per_pixel: bpp });
        }
        let required = pitch * height;
        let actual = pixels.as_ref().len();
        if actual < required {
            return Err(SurfaceError::StorageTooSmall { actual, required });
        }
        Ok(Self { pixels, depth: None, width, height, pitch, format })
    }

    /// Attach a depth buffer, cleared to [`DEPTH_FAR`]
    pub fn with_depth(mut self) -> Self {
        self.depth = Some(vec![DEPTH_FAR; self.width * self.height]);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    pub fn has_depth(&self) -> bool {
        self.depth.is_some()
    }

    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_ref()
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.pixels.as_mut()
    }

    pub fn depth_buffer(&self) -> Option<&[f32]> {
        self.depth.as_deref()
    }

    pub fn into_storage(self) -> B {
        self.pixels
    }

    #[inline]
    pub fn in_bounds(&self, pos: Vec2i) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    #[inline]
    fn byte_offset(&self, pos: Vec2i) -> usize {
        pos.y as usize * self.pitch + pos.x as usize * self.format.bytes_per_pixel as usize
    }

    /// Write one pixel. Returns false when out of bounds or the format is unsupported.
    pub fn set_pixel(&mut self, pos: Vec2i, color: Color8) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        let packed = self.format.pack(color).to_le_bytes();
        let bpp = self.format.bytes_per_pixel as usize;
        if !self.format.is_supported() {
            log::warn!("unsupported pixel format: {} bytes per pixel", bpp);
            return false;
        }
        let offset = self.byte_offset(pos);
        match self.pixels.as_mut().get_mut(offset..offset + bpp) {
            Some(dst) => {
                dst.copy_from_slice(&packed[..bpp]);
                true
            }
            None => false,
        }
    }

    /// Read one pixel back through the format's unpack
    pub fn get_pixel(&self, pos: Vec2i) -> Option<Color8> {
        if !self.in_bounds(pos) {
            return None;
        }
        let bpp = self.format.bytes_per_pixel as usize;
        if !self.format.is_supported() {
            log::warn!("unsupported pixel format: {} bytes per pixel", bpp);
            return None;
        }
        let offset = self.byte_offset(pos);
        let src = self.pixels.as_ref().get(offset..offset + bpp)?;
        let mut raw = [0u8; 4];
        raw[..bpp].copy_from_slice(src);
        Some(self.format.unpack(u32::from_le_bytes(raw)))
    }

    pub fn depth_at(&self, pos: Vec2i) -> Option<f32> {
        if !self.in_bounds(pos) {
            return None;
        }
        let idx = pos.y as usize * self.width + pos.x as usize;
        self.depth.as_ref().and_then(|d| d.get(idx).copied())
    }

    /// Depth-tested write: the pixel (and its depth) is stored only when `z` is strictly
    /// nearer than what the depth buffer holds. Without a depth buffer this is `set_pixel`.
    pub fn set_pixel_with_depth(&mut self, pos: Vec2i, z: f32, color: Color8) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        let idx = pos.y as usize * self.width + pos.x as usize;
        let passes = match self.depth.as_ref().and_then(|d| d.get(idx)) {
            Some(stored) => z < *stored,
            None => true,
        };
        if !passes || !self.set_pixel(pos, color) {
            return false;
        }
        if let Some(slot) = self.depth.as_mut().and_then(|d| d.get_mut(idx)) {
            *slot = z;
        }
        true
    }

    /// Fill every pixel with `color` and reset depth
    pub fn clear(&mut self, color: Color8) {
        let bpp = self.format.bytes_per_pixel as usize;
        if self.format.is_supported() {
            let packed = self.format.pack(color).to_le_bytes();
            let row_bytes = self.width * bpp;
            for y in 0..self.height {
                let start = y * self.pitch;
                let row = &mut self.pixels.as_mut()[start..start + row_bytes];
                for px in row.chunks_exact_mut(bpp) {
                    px.copy_from_slice(&packed[..bpp]);
                }
            }
        } else {
            log::warn!("unsupported pixel format: {} bytes per pixel", bpp);
        }
        self.clear_depth();
    }

    pub fn clear_depth(&mut self) {
        if let Some(depth) = self.depth.as_mut() {
            depth.fill(DEPTH_FAR);
        }
    }

    /// Copy the finished frame into `dst` (e.g. the mapped display), clipped to the
    /// shorter of the two. Returns the number of bytes copied.
    pub fn present_to(&self, dst: &mut [u8]) -> usize {
        let src = self.pixels.as_ref();
        let n = src.len().min(dst.len());
        dst[..n].copy_from_slice(&src[..n]);
        n
    }

    /// Decode into an RGBA image. Formats without alpha come out opaque.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let opaque = !self.format.alpha.is_present();
        image::RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let mut c = self
                .get_pixel(Vec2i::new(x as i32, y as i32))
                .unwrap_or(Color8::TRANSPARENT);
            if opaque {
                c.a = 255;
            }
            image::Rgba(c.to_array())
        })
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), SurfaceError> {
        let path = path.as_ref();
        self.to_rgba_image()
            .save_with_format(path, image::ImageFormat::Png)?;
        log::debug!("saved {}x{} surface to {}", self.width, self.height, path.display());
        Ok(())
    }
}
