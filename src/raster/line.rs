//! Bresenham line rasterization

use super::interp::Interpolator;
use super::Pixel;
use crate::math::Vec2i;
use crate::surface::{PixelStorage, Surface};

/// Integer Bresenham walk from `start` to `end`, both endpoints included.
/// Works in every octant; yields `max(|dx|, |dy|) + 1` positions.
#[derive(Debug, Clone)]
pub struct Bresenham {
    x0: i64,
    y0: i64,
    x: i64,
    y: i64,
    x1: i64,
    y1: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    err: i64,
    done: bool,
}

/// Moves along one axis that keep `start + sign * moves` inside `[0, extent)`
fn axis_moves(start: i64, sign: i64, extent: i64) -> (i64, i64) {
    if sign > 0 {
        (-start, extent - 1 - start)
    } else {
        (start - (extent - 1), start)
    }
}

#[inline]
fn ceil_div(a: i64, b: i64) -> i64 {
    -((-a).div_euclid(b))
}

impl Bresenham {
    pub fn new(start: Vec2i, end: Vec2i) -> Self {
        let (x0, y0) = (start.x as i64, start.y as i64);
        let (x1, y1) = (end.x as i64, end.y as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        Self {
            x0,
            y0,
            x: x0,
            y: y0,
            x1,
            y1,
            dx,
            dy,
            sx: if x0 < x1 { 1 } else { -1 },
            sy: if y0 < y1 { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }

    /// Number of steps between the endpoints
    pub fn steps(&self) -> u32 {
        self.dx.max(-self.dy).min(u32::MAX as i64) as u32
    }

    /// Jump to the state after `step` steps from the start without walking them.
    ///
    /// The major axis advances once per step and the minor axis has moved
    /// `floor((2 * step * minor + major) / (2 * major))` times, which is exactly where
    /// the incremental walk would be.
    pub fn skip_to(&mut self, step: u32) {
        let adx = self.dx;
        let ady = -self.dy;
        let major = adx.max(ady);
        let k = step as i64;
        if k > major {
            self.done = true;
            return;
        }
        let minor_moves = if major == 0 { 0 } else { (2 * k * adx.min(ady) + major).div_euclid(2 * major) };
        let (x_moves, y_moves) = if adx >= ady { (k, minor_moves) } else { (minor_moves, k) };
        self.x = self.x0 + self.sx * x_moves;
        self.y = self.y0 + self.sy * y_moves;
        self.err = adx - ady - x_moves * ady + y_moves * adx;
        self.done = false;
    }

    /// First and last step (inclusive) that land inside a `width` x `height` surface,
    /// or `None` when the whole line is off-surface. Every step in between is inside.
    pub fn visible_steps(&self, width: usize, height: usize) -> Option<(u32, u32)> {
        let adx = self.dx;
        let ady = -self.dy;
        let (w, h) = (width as i64, height as i64);
        let (major, minor, major_axis, minor_axis) = if adx >= ady {
            (adx, ady, (self.x0, self.sx, w), (self.y0, self.sy, h))
        } else {
            (ady, adx, (self.y0, self.sy, h), (self.x0, self.sx, w))
        };

        let (lo, hi) = axis_moves(major_axis.0, major_axis.1, major_axis.2);
        let (mut first, mut last) = (lo.max(0), hi.min(major));

        let (start, _, extent) = minor_axis;
        if minor == 0 {
            if start < 0 || start >= extent {
                return None;
            }
        } else {
            let (lo, hi) = axis_moves(start, minor_axis.1, extent);
            if lo > hi {
                return None;
            }
            // Invert the minor-move count to find the steps where it enters and leaves
            first = first.max(ceil_div(2 * major * lo - major, 2 * minor));
            last = last.min(ceil_div(2 * major * (hi + 1) - major, 2 * minor) - 1);
        }

        (first <= last).then_some((first as u32, last as u32))
    }
}

impl Iterator for Bresenham {
    type Item = Vec2i;

    fn next(&mut self) -> Option<Vec2i> {
        if self.done {
            return None;
        }
        let pos = Vec2i::new(self.x as i32, self.y as i32);
        if self.x == self.x1 && self.y == self.y1 {
            self.done = true;
            return Some(pos);
        }
        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(pos)
    }
}

/// Draw a line with color and depth blended from `p0` to `p1`.
/// Returns the number of fragments written.
pub fn draw_line<B: PixelStorage, I: Interpolator>(
    surface: &mut Surface<B>,
    interp: &I,
    p0: &Pixel,
    p1: &Pixel,
) -> usize {
    if p0.pos == p1.pos {
        return surface.set_pixel_with_depth(p0.pos, p0.depth, p0.color) as usize;
    }

    let colors = [p0.color, p1.color, p1.color];
    let depths = [p0.depth, p1.depth, p1.depth];
    let mut line = Bresenham::new(p0.pos, p1.pos);
    let steps = line.steps();
    let Some((first, last)) = line.visible_steps(surface.width(), surface.height()) else {
        return 0;
    };
    line.skip_to(first);

    // Step indices stay relative to p0 so clipped lines keep their unclipped colors
    let mut written = 0;
    for (step, pos) in (first..=last).zip(line) {
        let w = interp.line_weights(step, steps);
        let color = interp.blend_color(w, colors);
        let depth = interp.blend_depth(w, depths);
        if surface.set_pixel_with_depth(pos, depth, color) {
            written += 1;
        }
    }
    written
}
