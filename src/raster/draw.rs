//! Vertex-to-fragment conversion and primitive dispatch over geometry buffers

use super::interp::Interpolator;
use super::line::draw_line;
use super::triangle::{draw_wireframe, fill_triangle};
use super::{DrawStats, Pixel, PrimitiveKind};
use crate::buffer::{AttributeSemantic, VertexBuffer};
use crate::color::Color8;
use crate::math::{Vec2i, Vec4};
use crate::surface::{PixelStorage, Surface};

/// Screen coordinates are clamped to this range so edge products stay far from overflow
pub const GUARD_BAND: i32 = 1 << 24;

/// Map an NDC position (origin center, +y up) to a pixel (origin top-left, +y down)
pub fn ndc_to_screen(x: f32, y: f32, width: usize, height: usize) -> Vec2i {
    let to_pixel = |v: f32| {
        let limit = GUARD_BAND as f32;
        v.floor().clamp(-limit, limit) as i32
    };
    Vec2i::new(
        to_pixel((x * 0.5 + 0.5) * width as f32),
        to_pixel((-y * 0.5 + 0.5) * height as f32),
    )
}

/// Map NDC z in `[-1, 1]` to a depth in `[0, 1]`, 0 nearest
pub fn ndc_to_depth(z: f32) -> f32 {
    (z * 0.5 + 0.5).clamp(0.0, 1.0)
}

/// Convert one vertex to a screen-space fragment.
///
/// `None` when `index` is past the end of the buffer or the vertex lacks a decodable
/// position or color. Callers that need a value anyway can use [`Pixel::FALLBACK`].
pub fn vertex_to_pixel(vertices: &VertexBuffer, index: usize, width: usize, height: usize) -> Option<Pixel> {
    if index >= vertices.vertex_count() {
        log::debug!("vertex index {} out of range ({} vertices)", index, vertices.vertex_count());
        return None;
    }
    let Some(position) = vertices.read(index, AttributeSemantic::Position) else {
        log::warn!("vertex {} has no readable position", index);
        return None;
    };
    let Some(color) = vertices.read(index, AttributeSemantic::Color) else {
        log::warn!("vertex {} has no readable color", index);
        return None;
    };
    Some(fragment_from(position, color, width, height))
}

fn fragment_from(position: Vec4, color: Vec4, width: usize, height: usize) -> Pixel {
    Pixel {
        pos: ndc_to_screen(position.x, position.y, width, height),
        color: Color8::from_unit(color),
        depth: ndc_to_depth(position.z),
    }
}

/// Rasterize one primitive from already converted fragments. Returns fragments written.
pub fn draw_primitive<B: PixelStorage, I: Interpolator>(
    surface: &mut Surface<B>,
    interp: &I,
    kind: PrimitiveKind,
    pixels: &[Pixel],
) -> usize {
    match (kind, pixels) {
        (PrimitiveKind::Points, [p]) => surface.set_pixel_with_depth(p.pos, p.depth, p.color) as usize,
        (PrimitiveKind::Lines, [p0, p1]) => draw_line(surface, interp, p0, p1),
        (PrimitiveKind::Triangles, [v0, v1, v2]) => fill_triangle(surface, interp, v0, v1, v2),
        (PrimitiveKind::Wireframe, [v0, v1, v2]) => draw_wireframe(surface, interp, v0, v1, v2),
        _ => 0,
    }
}

/// Draw every whole primitive named by `elements`, a flat list of vertex indices taken
/// `kind.vertices_per_primitive()` at a time. A primitive with any unusable vertex is
/// skipped; the rest of the list is still drawn. Trailing indices that do not make up
/// a whole primitive are ignored.
pub fn draw_elements<B, I, E>(
    surface: &mut Surface<B>,
    interp: &I,
    vertices: &VertexBuffer,
    kind: PrimitiveKind,
    elements: E,
) -> DrawStats
where
    B: PixelStorage,
    I: Interpolator,
    E: IntoIterator<Item = usize>,
{
    let (width, height) = (surface.width(), surface.height());
    let per_primitive = kind.vertices_per_primitive();
    let mut stats = DrawStats::default();
    let mut pixels = [Pixel::FALLBACK; 3];
    let mut filled = 0;
    let mut valid = true;

    for index in elements {
        match vertex_to_pixel(vertices, index, width, height) {
            Some(p) => pixels[filled] = p,
            None => valid = false,
        }
        filled += 1;
        if filled < per_primitive {
            continue;
        }
        if valid {
            stats.fragments += draw_primitive(surface, interp, kind, &pixels[..per_primitive]);
            stats.primitives += 1;
        } else {
            stats.skipped += 1;
        }
        filled = 0;
        valid = true;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ColoredVertex, VertexAttribute, VertexLayout};
    use crate::color::PixelFormat;
    use crate::raster::interp::FloatInterpolator;

    #[test]
    fn test_ndc_to_screen_corners() {
        assert_eq!(ndc_to_screen(-1.0, 1.0, 100, 50), Vec2i::new(0, 0));
        assert_eq!(ndc_to_screen(0.0, 0.0, 100, 50), Vec2i::new(50, 25));
        assert_eq!(ndc_to_screen(1.0, -1.0, 100, 50), Vec2i::new(100, 50));
        assert_eq!(ndc_to_screen(-0.5, -0.5, 100, 100), Vec2i::new(25, 75));
    }

    #[test]
    fn test_ndc_to_screen_guard_band() {
        let p = ndc_to_screen(1.0e12, -1.0e12, 100, 100);
        assert_eq!(p, Vec2i::new(GUARD_BAND, GUARD_BAND));
        assert_eq!(ndc_to_screen(f32::NAN, 0.0, 10, 10).x, 0);
    }

    #[test]
    fn test_depth_mapping() {
        assert_eq!(ndc_to_depth(-1.0), 0.0);
        assert_eq!(ndc_to_depth(0.0), 0.5);
        assert_eq!(ndc_to_depth(1.0), 1.0);
        assert_eq!(ndc_to_depth(-3.0), 0.0);
        assert_eq!(ndc_to_depth(7.0), 1.0);
    }

    #[test]
    fn test_vertex_to_pixel() {
        let vb = VertexBuffer::from_vertices(
            ColoredVertex::layout(),
            &[ColoredVertex::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0, 1.0])],
        );
        let p = vertex_to_pixel(&vb, 0, 10, 10).unwrap();
        assert_eq!(p.pos, Vec2i::new(5, 5));
        assert_eq!(p.color, Color8::RED);
        assert_eq!(p.depth, 0.5);
        assert!(vertex_to_pixel(&vb, 1, 10, 10).is_none());
    }

    #[test]
    fn test_missing_color_is_rejected() {
        let layout = VertexLayout::new(&[VertexAttribute::f32s(AttributeSemantic::Position, 0, 3)], 12);
        let vb = VertexBuffer::zeroed(layout, 2);
        assert!(vertex_to_pixel(&vb, 0, 10, 10).is_none());
        assert_eq!(Pixel::FALLBACK.pos, Vec2i::ZERO);
        assert_eq!(Pixel::FALLBACK.color, Color8::BLACK);
        assert_eq!(Pixel::FALLBACK.depth, 1.0);
    }

    #[test]
    fn test_draw_elements_skips_bad_primitives() {
        let vb = VertexBuffer::from_vertices(
            ColoredVertex::layout(),
            &[
                ColoredVertex::new([-0.5, -0.5, 0.0], [1.0; 4]),
                ColoredVertex::new([0.5, 0.5, 0.0], [1.0; 4]),
            ],
        );
        let mut s = Surface::new(10, 10, PixelFormat::ARGB8888);
        let stats = draw_elements(&mut s, &FloatInterpolator, &vb, PrimitiveKind::Points, [0, 5, 1]);
        assert_eq!(stats, DrawStats { primitives: 2, skipped: 1, fragments: 2 });

        // Trailing partial line is ignored
        let stats = draw_elements(&mut s, &FloatInterpolator, &vb, PrimitiveKind::Lines, [0, 3, 0, 1, 1]);
        assert_eq!(stats.primitives, 1);
        assert_eq!(stats.skipped, 1);
    }
}
