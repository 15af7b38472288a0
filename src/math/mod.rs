//! Vector and matrix math for 3D transforms

mod vector;
mod matrix;
mod transform;

pub use vector::*;
pub use matrix::*;

/// Linear interpolation between a and b by t
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Linear interpolation between two integers, rounded to nearest
#[inline]
pub fn lerp_i32(a: i32, b: i32, t: f32) -> i32 {
    lerp(a as f32, b as f32, t).round() as i32
}

#[inline]
pub fn min3(a: f32, b: f32, c: f32) -> f32 {
    a.min(b).min(c)
}

#[inline]
pub fn max3(a: f32, b: f32, c: f32) -> f32 {
    a.max(b).max(c)
}
