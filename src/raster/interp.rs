//! Attribute interpolation strategies
//!
//! Lines and triangles both reduce to a three-way blend: a line point at step `i` of `n`
//! uses weights `(1 - t, t, 0)` with `t = i / n`, a triangle pixel uses its barycentric
//! weights. `FloatInterpolator` blends in `f32`; `FixedInterpolator` uses 8 fractional
//! bits with the three weights summing to exactly [`FIXED_ONE`]. Both round to nearest,
//! so their colors never differ by more than one 8-bit step.

use crate::color::Color8;

pub const FIXED_FRAC_BITS: u32 = 8;
pub const FIXED_ONE: i64 = 1 << FIXED_FRAC_BITS;

pub trait Interpolator {
    type Weights: Copy;

    /// Weights for point `step` of a line that is `steps` Bresenham steps long
    fn line_weights(&self, step: u32, steps: u32) -> Self::Weights;

    /// Weights from per-vertex edge values (the doubled area of the sub-triangle
    /// opposite each vertex) and the doubled area of the whole triangle
    fn triangle_weights(&self, edges: [i64; 3], area: i64) -> Self::Weights;

    fn blend_color(&self, w: Self::Weights, colors: [Color8; 3]) -> Color8;

    fn blend_depth(&self, w: Self::Weights, depths: [f32; 3]) -> f32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatInterpolator;

impl Interpolator for FloatInterpolator {
    type Weights = [f32; 3];

    fn line_weights(&self, step: u32, steps: u32) -> [f32; 3] {
        let dt = if steps > 0 { 1.0 / steps as f32 } else { 1.0 };
        let t = (step as f32 * dt).min(1.0);
        [1.0 - t, t, 0.0]
    }

    fn triangle_weights(&self, edges: [i64; 3], area: i64) -> [f32; 3] {
        let area = area as f64;
        edges.map(|e| (e as f64 / area) as f32)
    }

    fn blend_color(&self, w: [f32; 3], colors: [Color8; 3]) -> Color8 {
        let channel = |f: fn(&Color8) -> u8| {
            let v: f32 = w.iter().zip(colors.iter()).map(|(w, c)| w * f(c) as f32).sum();
            v.round().clamp(0.0, 255.0) as u8
        };
        Color8::with_alpha(channel(|c| c.r), channel(|c| c.g), channel(|c| c.b), channel(|c| c.a))
    }

    fn blend_depth(&self, w: [f32; 3], depths: [f32; 3]) -> f32 {
        w[0] * depths[0] + w[1] * depths[1] + w[2] * depths[2]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FixedInterpolator;

/// `round(num / den)` for `den > 0`
#[inline]
fn div_round(num: i64, den: i64) -> i64 {
    (2 * num + den).div_euclid(2 * den)
}

impl Interpolator for FixedInterpolator {
    type Weights = [i64; 3];

    fn line_weights(&self, step: u32, steps: u32) -> [i64; 3] {
        let t = if steps == 0 {
            FIXED_ONE * step.min(1) as i64
        } else {
            div_round(step as i64 * FIXED_ONE, steps as i64).min(FIXED_ONE)
        };
        [FIXED_ONE - t, t, 0]
    }

    fn triangle_weights(&self, edges: [i64; 3], area: i64) -> [i64; 3] {
        let (edges, area) = if area < 0 { (edges.map(|e| -e), -area) } else { (edges, area) };
        let b0 = div_round(edges[0] * FIXED_ONE, area);
        let b1 = div_round(edges[1] * FIXED_ONE, area);
        [b0, b1, FIXED_ONE - b0 - b1]
    }

    fn blend_color(&self, w: [i64; 3], colors: [Color8; 3]) -> Color8 {
        let channel = |f: fn(&Color8) -> u8| {
            let sum: i64 = w.iter().zip(colors.iter()).map(|(w, c)| w * f(c) as i64).sum();
            ((sum + FIXED_ONE / 2) >> FIXED_FRAC_BITS).clamp(0, 255) as u8
        };
        Color8::with_alpha(channel(|c| c.r), channel(|c| c.g), channel(|c| c.b), channel(|c| c.a))
    }

    fn blend_depth(&self, w: [i64; 3], depths: [f32; 3]) -> f32 {
        let sum: f32 = w.iter().zip(depths.iter()).map(|(w, z)| *w as f32 * z).sum();
        sum / FIXED_ONE as f32
    }
}
