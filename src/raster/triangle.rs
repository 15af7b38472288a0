//! Triangle rasterization: edge-function fill and outlines

use super::interp::Interpolator;
use super::line::draw_line;
use super::Pixel;
use crate::math::Vec2i;
use crate::surface::{PixelStorage, Surface};

/// Fill a triangle with blended vertex colors and depth.
///
/// Every pixel of the bounding box (clamped to the surface, right/bottom exclusive) is
/// tested against the three edge functions and kept when they all share a sign, so both
/// windings fill. Zero-area triangles produce nothing. Returns the fragments written.
pub fn fill_triangle<B: PixelStorage, I: Interpolator>(
    surface: &mut Surface<B>,
    interp: &I,
    v0: &Pixel,
    v1: &Pixel,
    v2: &Pixel,
) -> usize {
    let (a, b, c) = (v0.pos, v1.pos, v2.pos);
    let area = a.cross(b, c);
    if area == 0 {
        return 0;
    }

    let width = surface.width() as i64;
    let height = surface.height() as i64;
    let min_x = (a.x.min(b.x).min(c.x) as i64).max(0);
    let max_x = (a.x.max(b.x).max(c.x) as i64).min(width);
    let min_y = (a.y.min(b.y).min(c.y) as i64).max(0);
    let max_y = (a.y.max(b.y).max(c.y) as i64).min(height);

    let colors = [v0.color, v1.color, v2.color];
    let depths = [v0.depth, v1.depth, v2.depth];

    let mut written = 0;
    for y in min_y..max_y {
        for x in min_x..max_x {
            let p = Vec2i::new(x as i32, y as i32);
            let e01 = a.cross(b, p);
            let e12 = b.cross(c, p);
            let e20 = c.cross(a, p);

            let inside = (e01 >= 0 && e12 >= 0 && e20 >= 0) || (e01 <= 0 && e12 <= 0 && e20 <= 0);
            if !inside {
                continue;
            }

            // Each vertex is weighted by the edge opposite it
            let w = interp.triangle_weights([e12, e20, e01], area);
            let color = interp.blend_color(w, colors);
            let depth = interp.blend_depth(w, depths);
            if surface.set_pixel_with_depth(p, depth, color) {
                written += 1;
            }
        }
    }
    written
}

/// Outline a triangle with three blended lines. Returns the fragments written.
pub fn draw_wireframe<B: PixelStorage, I: Interpolator>(
    surface: &mut Surface<B>,
    interp: &I,
    v0: &Pixel,
    v1: &Pixel,
    v2: &Pixel,
) -> usize {
    draw_line(surface, interp, v0, v1) + draw_line(surface, interp, v1, v2) + draw_line(surface, interp, v2, v0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color8, PixelFormat};
    use crate::raster::interp::{FixedInterpolator, FloatInterpolator};

    fn px(x: i32, y: i32, color: Color8) -> Pixel {
        Pixel::new(Vec2i::new(x, y), color)
    }

    fn lit(s: &Surface) -> usize {
        s.pixels().chunks(4).filter(|p| p.iter().any(|b| *b != 0)).count()
    }

    #[test]
    fn test_degenerate_triangle_draws_nothing() {
        let mut s = Surface::new(16, 16, PixelFormat::ARGB8888);
        let collinear = [px(1, 1, Color8::RED), px(5, 5, Color8::RED), px(9, 9, Color8::RED)];
        assert_eq!(fill_triangle(&mut s, &FloatInterpolator, &collinear[0], &collinear[1], &collinear[2]), 0);
        let point = px(4, 4, Color8::RED);
        assert_eq!(fill_triangle(&mut s, &FixedInterpolator, &point, &point, &point), 0);
        assert_eq!(lit(&s), 0);
    }

    #[test]
    fn test_both_windings_fill_the_same_pixels() {
        let a = px(2, 2, Color8::WHITE);
        let b = px(12, 3, Color8::WHITE);
        let c = px(5, 13, Color8::WHITE);

        let mut cw = Surface::new(16, 16, PixelFormat::ARGB8888);
        let mut ccw = Surface::new(16, 16, PixelFormat::ARGB8888);
        let n_cw = fill_triangle(&mut cw, &FloatInterpolator, &a, &b, &c);
        let n_ccw = fill_triangle(&mut ccw, &FloatInterpolator, &a, &c, &b);
        assert!(n_cw > 0);
        assert_eq!(n_cw, n_ccw);
        assert_eq!(cw.pixels(), ccw.pixels());
    }

    #[test]
    fn test_bbox_end_is_exclusive() {
        let mut s = Surface::new(16, 16, PixelFormat::ARGB8888);
        let a = px(1, 1, Color8::RED);
        let b = px(14, 1, Color8::GREEN);
        let c = px(1, 14, Color8::BLUE);
        fill_triangle(&mut s, &FixedInterpolator, &a, &b, &c);
        assert_eq!(s.get_pixel(a.pos), Some(Color8::RED));
        assert_eq!(s.get_pixel(b.pos), Some(Color8::with_alpha(0, 0, 0, 0)));
        assert_eq!(s.get_pixel(c.pos), Some(Color8::with_alpha(0, 0, 0, 0)));
        let near_b = s.get_pixel(Vec2i::new(13, 1)).unwrap();
        assert!(near_b.g > 200 && near_b.r < 40);
    }

    #[test]
    fn test_fill_is_clipped_to_surface() {
        let mut s = Surface::new(8, 8, PixelFormat::ARGB8888);
        let n = fill_triangle(
            &mut s,
            &FloatInterpolator,
            &px(-100, -100, Color8::WHITE),
            &px(300, -100, Color8::WHITE),
            &px(-100, 300, Color8::WHITE),
        );
        assert_eq!(n, 64);
        assert_eq!(lit(&s), 64);
    }

    #[test]
    fn test_wireframe_outlines_only() {
        let mut s = Surface::new(16, 16, PixelFormat::ARGB8888);
        let a = px(1, 1, Color8::WHITE);
        let b = px(14, 1, Color8::WHITE);
        let c = px(1, 14, Color8::WHITE);
        draw_wireframe(&mut s, &FloatInterpolator, &a, &b, &c);
        assert_eq!(s.get_pixel(Vec2i::new(7, 1)), Some(Color8::WHITE));
        assert_eq!(s.get_pixel(Vec2i::new(1, 7)), Some(Color8::WHITE));
        assert_eq!(s.get_pixel(Vec2i::new(4, 4)), Some(Color8::with_alpha(0, 0, 0, 0)));
    }
}
