//! Fixed-size vectors for 3D transforms and screen-space positions

use std::ops::{Add, Div, Mul, Neg, Sub};
use serde::{Serialize, Deserialize};

/// 2D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Vec2 {
        let l = self.len();
        if l == 0.0 {
            return Vec2::ZERO;
        }
        self / l
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        self / l
    }

    pub fn distance(self, other: Vec3) -> f32 {
        (other - self).len()
    }

    /// Extend to homogeneous coordinates
    pub fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// 4D Vector (homogeneous positions, RGBA colors)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Vec4 = Vec4 { x: 0.0, y: 0.0, z: 0.0, w: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn dot(self, other: Vec4) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn truncate(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Build from up to four components, filling the rest from `(0, 0, 0, 1)`
    pub fn from_slice_or_default(values: &[f32]) -> Vec4 {
        let mut out = [0.0, 0.0, 0.0, 1.0];
        for (slot, v) in out.iter_mut().zip(values) {
            *slot = *v;
        }
        Vec4::new(out[0], out[1], out[2], out[3])
    }
}

macro_rules! impl_vector_ops {
    ($ty:ident { $($f:ident),+ }) => {
        impl Add for $ty {
            type Output = $ty;
            fn add(self, other: $ty) -> $ty {
                $ty { $($f: self.$f + other.$f),+ }
            }
        }

        impl Sub for $ty {
            type Output = $ty;
            fn sub(self, other: $ty) -> $ty {
                $ty { $($f: self.$f - other.$f),+ }
            }
        }

        impl Mul<f32> for $ty {
            type Output = $ty;
            fn mul(self, s: f32) -> $ty {
                $ty { $($f: self.$f * s),+ }
            }
        }

        impl Div<f32> for $ty {
            type Output = $ty;
            fn div(self, s: f32) -> $ty {
                $ty { $($f: self.$f / s),+ }
            }
        }

        impl Neg for $ty {
            type Output = $ty;
            fn neg(self) -> $ty {
                $ty { $($f: -self.$f),+ }
            }
        }
    };
}

impl_vector_ops!(Vec2 { x, y });
impl_vector_ops!(Vec3 { x, y, z });
impl_vector_ops!(Vec4 { x, y, z, w });

/// Integer 2D position (screen space, origin top-left)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2i {
    pub const ZERO: Vec2i = Vec2i { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Vector from `self` to `other`, widened so edge products cannot overflow
    pub fn delta(self, other: Vec2i) -> (i64, i64) {
        (other.x as i64 - self.x as i64, other.y as i64 - self.y as i64)
    }

    /// 2D cross product of `self -> a` and `self -> b`
    pub fn cross(self, a: Vec2i, b: Vec2i) -> i64 {
        let (abx, aby) = self.delta(a);
        let (acx, acy) = self.delta(b);
        abx * acy - aby * acx
    }

    pub fn distance(self, other: Vec2i) -> f32 {
        let (dx, dy) = self.delta(other);
        ((dx * dx + dy * dy) as f64).sqrt() as f32
    }
}

impl Add for Vec2i {
    type Output = Vec2i;
    fn add(self, other: Vec2i) -> Vec2i {
        Vec2i::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2i {
    type Output = Vec2i;
    fn sub(self, other: Vec2i) -> Vec2i {
        Vec2i::new(self.x - other.x, self.y - other.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!((c.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_zero_stays_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        let n = Vec3::new(3.0, 0.0, 4.0).normalize();
        assert!((n.len() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_vec4_defaults_missing_components() {
        let v = Vec4::from_slice_or_default(&[0.5, 0.25]);
        assert_eq!(v, Vec4::new(0.5, 0.25, 0.0, 1.0));
    }

    #[test]
    fn test_vec2i_cross_sign() {
        let a = Vec2i::new(0, 0);
        let b = Vec2i::new(10, 0);
        assert!(a.cross(b, Vec2i::new(0, 10)) > 0);
        assert!(a.cross(b, Vec2i::new(0, -10)) < 0);
        assert_eq!(a.cross(b, Vec2i::new(5, 0)), 0);
    }

    #[test]
    fn test_vec2i_cross_large_coords() {
        let a = Vec2i::new(-(1 << 24), -(1 << 24));
        let b = Vec2i::new(1 << 24, -(1 << 24));
        let c = Vec2i::new(0, 1 << 24);
        assert_eq!(a.cross(b, c), (1i64 << 25) * (1i64 << 25));
    }
}
