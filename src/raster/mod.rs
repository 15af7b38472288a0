//! Software rasterizer
//!
//! Draws points, lines and filled triangles onto a [`Surface`], either from fragments
//! the caller already placed in screen space or straight from geometry buffers whose
//! positions are in normalized device coordinates. Nothing is kept between calls;
//! all state lives in the surface's pixel and depth memory.
//!
//! Bad input never aborts a draw call. An unusable vertex skips its primitive, an
//! unsupported surface format skips the call, and both are reported through `log`.

mod interp;
mod line;
mod triangle;
mod draw;

pub use interp::{FixedInterpolator, FloatInterpolator, Interpolator, FIXED_FRAC_BITS, FIXED_ONE};
pub use line::Bresenham;
pub use draw::{ndc_to_depth, ndc_to_screen, vertex_to_pixel, GUARD_BAND};

use std::fmt;
use std::str::FromStr;

use crate::buffer::{IndexBuffer, VertexBuffer};
use crate::color::Color8;
use crate::config::{InterpolationMode, RasterConfig};
use crate::error::RasterError;
use crate::math::Vec2i;
use crate::surface::{PixelStorage, Surface};

/// A screen-space fragment: integer position, color and depth (0 nearest, 1 farthest)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixel {
    pub pos: Vec2i,
    pub color: Color8,
    pub depth: f32,
}

impl Pixel {
    /// What a vertex without usable attributes stands in for. Sits on the far
    /// plane so it never hides real geometry.
    pub const FALLBACK: Pixel = Pixel { pos: Vec2i::ZERO, color: Color8::BLACK, depth: 1.0 };

    pub const fn new(pos: Vec2i, color: Color8) -> Self {
        Self { pos, color, depth: 0.0 }
    }

    pub const fn with_depth(pos: Vec2i, color: Color8, depth: f32) -> Self {
        Self { pos, color, depth }
    }
}

/// How a vertex list is grouped into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Points,
    Lines,
    Triangles,
    /// Triangle list drawn as outlines
    Wireframe,
}

impl PrimitiveKind {
    pub fn vertices_per_primitive(self) -> usize {
        match self {
            PrimitiveKind::Points => 1,
            PrimitiveKind::Lines => 2,
            PrimitiveKind::Triangles | PrimitiveKind::Wireframe => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Points => "points",
            PrimitiveKind::Lines => "lines",
            PrimitiveKind::Triangles => "triangles",
            PrimitiveKind::Wireframe => "wireframe",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for PrimitiveKind {
    type Error = RasterError;

    fn try_from(code: u32) -> Result<Self, RasterError> {
        match code {
            0 => Ok(PrimitiveKind::Points),
            1 => Ok(PrimitiveKind::Lines),
            2 => Ok(PrimitiveKind::Triangles),
            3 => Ok(PrimitiveKind::Wireframe),
            _ => Err(RasterError::UnknownPrimitive(code.to_string())),
        }
    }
}

impl FromStr for PrimitiveKind {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self, RasterError> {
        match s.to_ascii_lowercase().as_str() {
            "points" | "point" => Ok(PrimitiveKind::Points),
            "lines" | "line" => Ok(PrimitiveKind::Lines),
            "triangles" | "triangle" => Ok(PrimitiveKind::Triangles),
            "wireframe" => Ok(PrimitiveKind::Wireframe),
            _ => Err(RasterError::UnknownPrimitive(s.to_string())),
        }
    }
}

/// Outcome of one buffer draw call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Primitives rasterized
    pub primitives: usize,
    /// Primitives dropped for an out-of-range index or missing attribute
    pub skipped: usize,
    /// Fragments that passed the bounds and depth tests
    pub fragments: usize,
}

/// Runs `$body` with `$interp` bound to the interpolator `$mode` selects
macro_rules! with_interpolator {
    ($mode:expr, $interp:ident => $body:expr) => {
        match $mode {
            InterpolationMode::Float => {
                let $interp = &FloatInterpolator;
                $body
            }
            InterpolationMode::Fixed => {
                let $interp = &FixedInterpolator;
                $body
            }
        }
    };
}

/// Draw entry points, parameterized by the interpolation strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rasterizer {
    interpolation: InterpolationMode,
}

impl Rasterizer {
    pub fn new(interpolation: InterpolationMode) -> Self {
        Self { interpolation }
    }

    pub fn from_config(config: &RasterConfig) -> Self {
        Self::new(config.interpolation)
    }

    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    fn can_draw<B: PixelStorage>(surface: &Surface<B>) -> bool {
        let format = surface.format();
        if !format.is_supported() {
            log::warn!("unsupported pixel format: {} bytes per pixel, nothing drawn", format.bytes_per_pixel);
            return false;
        }
        true
    }

    /// Write one fragment through the depth test. Returns whether it landed.
    pub fn draw_point<B: PixelStorage>(&self, surface: &mut Surface<B>, p: &Pixel) -> bool {
        Self::can_draw(surface) && surface.set_pixel_with_depth(p.pos, p.depth, p.color)
    }

    /// Returns the number of fragments written
    pub fn draw_line<B: PixelStorage>(&self, surface: &mut Surface<B>, p0: &Pixel, p1: &Pixel) -> usize {
        if !Self::can_draw(surface) {
            return 0;
        }
        with_interpolator!(self.interpolation, interp => line::draw_line(surface, interp, p0, p1))
    }

    pub fn draw_triangle_wireframe<B: PixelStorage>(
        &self,
        surface: &mut Surface<B>,
        v0: &Pixel,
        v1: &Pixel,
        v2: &Pixel,
    ) -> usize {
        if !Self::can_draw(surface) {
            return 0;
        }
        with_interpolator!(self.interpolation, interp => triangle::draw_wireframe(surface, interp, v0, v1, v2))
    }

    pub fn draw_triangle_fill<B: PixelStorage>(
        &self,
        surface: &mut Surface<B>,
        v0: &Pixel,
        v1: &Pixel,
        v2: &Pixel,
    ) -> usize {
        if !Self::can_draw(surface) {
            return 0;
        }
        with_interpolator!(self.interpolation, interp => triangle::fill_triangle(surface, interp, v0, v1, v2))
    }

    /// Draw `vertices` in order, grouped by `kind`
    pub fn draw_vertex_buffer<B: PixelStorage>(
        &self,
        surface: &mut Surface<B>,
        vertices: &VertexBuffer,
        kind: PrimitiveKind,
    ) -> DrawStats {
        if !Self::can_draw(surface) {
            return DrawStats::default();
        }
        let elements = 0..vertices.vertex_count();
        let stats = with_interpolator!(self.interpolation, interp => {
            draw::draw_elements(surface, interp, vertices, kind, elements)
        });
        log::debug!(
            "drew {} {} from {} vertices: {} skipped, {} fragments",
            stats.primitives,
            kind,
            vertices.vertex_count(),
            stats.skipped,
            stats.fragments
        );
        stats
    }

    /// Draw the vertices `indices` names, grouped by `kind`. Out-of-range indices skip
    /// only the primitive they belong to.
    pub fn draw_index_buffer<B: PixelStorage>(
        &self,
        surface: &mut Surface<B>,
        indices: &IndexBuffer,
        vertices: &VertexBuffer,
        kind: PrimitiveKind,
    ) -> DrawStats {
        if !Self::can_draw(surface) {
            return DrawStats::default();
        }
        let elements = indices.iter().map(|i| i as usize);
        let stats = with_interpolator!(self.interpolation, interp => {
            draw::draw_elements(surface, interp, vertices, kind, elements)
        });
        if stats.skipped > 0 {
            log::warn!("skipped {} {} primitives with invalid indices", stats.skipped, kind);
        }
        log::debug!(
            "drew {} indexed {} from {} indices: {} fragments",
            stats.primitives,
            kind,
            indices.len(),
            stats.fragments
        );
        stats
    }

    /// Like [`draw_vertex_buffer`](Self::draw_vertex_buffer) with a numeric primitive
    /// code (0 points, 1 lines, 2 triangles, 3 wireframe). Unknown codes draw nothing.
    pub fn draw_vertex_buffer_raw<B: PixelStorage>(
        &self,
        surface: &mut Surface<B>,
        vertices: &VertexBuffer,
        code: u32,
    ) -> DrawStats {
        match PrimitiveKind::try_from(code) {
            Ok(kind) => self.draw_vertex_buffer(surface, vertices, kind),
            Err(e) => {
                log::warn!("{}", e);
                DrawStats::default()
            }
        }
    }
}
