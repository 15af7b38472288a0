//! Row-major matrices: 2x2, 3x3, 3x4, 4x3 and 4x4
//!
//! Every shape stores its components in a flat row-major array, so `m[r * COLS + c]`
//! is row `r`, column `c`. Vectors are columns: `M * v` transforms `v`.

use std::ops::{Add, Div, Mul, Sub};
use serde::{Serialize, Deserialize};

use super::vector::{Vec2, Vec3, Vec4};

/// Below this absolute determinant a matrix is treated as singular
pub const SINGULAR_EPSILON: f32 = 1e-6;

macro_rules! matrix_type {
    ($(#[$meta:meta])* $name:ident, $rows:expr, $cols:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            pub m: [f32; $rows * $cols],
        }

        impl $name {
            pub const ROWS: usize = $rows;
            pub const COLS: usize = $cols;
            pub const ZERO: $name = $name { m: [0.0; $rows * $cols] };

            pub const fn new(m: [f32; $rows * $cols]) -> Self {
                Self { m }
            }

            #[inline]
            pub fn at(&self, row: usize, col: usize) -> f32 {
                self.m[row * $cols + col]
            }

            #[inline]
            pub fn set(&mut self, row: usize, col: usize, value: f32) {
                self.m[row * $cols + col] = value;
            }

            /// Component-wise comparison with an absolute-or-relative tolerance
            pub fn approx_eq(&self, other: &$name, eps: f32) -> bool {
                self.m.iter().zip(other.m.iter()).all(|(a, b)| approx_eq(*a, *b, eps))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ZERO
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, other: $name) -> $name {
                let mut out = self;
                for (o, b) in out.m.iter_mut().zip(other.m.iter()) {
                    *o += *b;
                }
                out
            }
        }

        impl Sub for $name {
            type Output = $name;
            fn sub(self, other: $name) -> $name {
                let mut out = self;
                for (o, b) in out.m.iter_mut().zip(other.m.iter()) {
                    *o -= *b;
                }
                out
            }
        }

        impl Mul<f32> for $name {
            type Output = $name;
            fn mul(self, s: f32) -> $name {
                $name { m: self.m.map(|v| v * s) }
            }
        }

        impl Div<f32> for $name {
            type Output = $name;
            fn div(self, s: f32) -> $name {
                $name { m: self.m.map(|v| v / s) }
            }
        }
    };
}

matrix_type!(
    /// 2x2 matrix
    Mat2, 2, 2
);
matrix_type!(
    /// 3x3 matrix
    Mat3, 3, 3
);
matrix_type!(
    /// 3x4 matrix (three rows, four columns)
    Mat3x4, 3, 4
);
matrix_type!(
    /// 4x3 matrix (four rows, three columns)
    Mat4x3, 4, 3
);
matrix_type!(
    /// 4x4 matrix
    Mat4, 4, 4
);

/// Row-by-column product `A (R x K) * B (K x C) -> (R x C)`
macro_rules! impl_mat_mul {
    ($lhs:ident * $rhs:ident => $out:ident, $r:expr, $k:expr, $c:expr) => {
        impl Mul<$rhs> for $lhs {
            type Output = $out;
            fn mul(self, rhs: $rhs) -> $out {
                let mut out = $out::ZERO;
                for row in 0..$r {
                    for col in 0..$c {
                        let mut sum = 0.0;
                        for i in 0..$k {
                            sum += self.m[row * $k + i] * rhs.m[i * $c + col];
                        }
                        out.m[row * $c + col] = sum;
                    }
                }
                out
            }
        }
    };
}

impl_mat_mul!(Mat2 * Mat2 => Mat2, 2, 2, 2);
impl_mat_mul!(Mat3 * Mat3 => Mat3, 3, 3, 3);
impl_mat_mul!(Mat4 * Mat4 => Mat4, 4, 4, 4);
impl_mat_mul!(Mat3 * Mat3x4 => Mat3x4, 3, 3, 4);
impl_mat_mul!(Mat3x4 * Mat4 => Mat3x4, 3, 4, 4);
impl_mat_mul!(Mat4x3 * Mat3x4 => Mat4, 4, 3, 4);
impl_mat_mul!(Mat4 * Mat4x3 => Mat4x3, 4, 4, 3);

/// Matrix times column vector
macro_rules! impl_mat_vec {
    ($mat:ident * $vec:ident => $out:ident { $($of:ident),+ }, $cols:expr) => {
        impl Mul<$vec> for $mat {
            type Output = $out;
            fn mul(self, v: $vec) -> $out {
                let input = v.to_array();
                let mut result = [0.0f32; $mat::ROWS];
                for (row, slot) in result.iter_mut().enumerate() {
                    *slot = (0..$cols).map(|i| self.m[row * $cols + i] * input[i]).sum();
                }
                let mut it = result.into_iter();
                $out { $($of: it.next().unwrap_or_default()),+ }
            }
        }
    };
}

impl_mat_vec!(Mat2 * Vec2 => Vec2 { x, y }, 2);
impl_mat_vec!(Mat3 * Vec3 => Vec3 { x, y, z }, 3);
impl_mat_vec!(Mat3x4 * Vec4 => Vec3 { x, y, z }, 4);
impl_mat_vec!(Mat4x3 * Vec3 => Vec4 { x, y, z, w }, 3);
impl_mat_vec!(Mat4 * Vec4 => Vec4 { x, y, z, w }, 4);

macro_rules! impl_transpose {
    ($from:ident => $to:ident, $r:expr, $c:expr) => {
        impl $from {
            pub fn transpose(&self) -> $to {
                let mut out = $to::ZERO;
                for row in 0..$r {
                    for col in 0..$c {
                        out.m[col * $r + row] = self.m[row * $c + col];
                    }
                }
                out
            }
        }
    };
}

impl_transpose!(Mat2 => Mat2, 2, 2);
impl_transpose!(Mat3 => Mat3, 3, 3);
impl_transpose!(Mat4 => Mat4, 4, 4);
impl_transpose!(Mat3x4 => Mat4x3, 3, 4);
impl_transpose!(Mat4x3 => Mat3x4, 4, 3);

impl Mat2 {
    pub const IDENTITY: Mat2 = Mat2::new([
        1.0, 0.0,
        0.0, 1.0,
    ]);

    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0] * m[3] - m[1] * m[2]
    }

    /// Returns `None` when the matrix is singular
    pub fn inverse(&self) -> Option<Mat2> {
        let det = self.determinant();
        if det.abs() < SINGULAR_EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let m = &self.m;
        Some(Mat2::new([
             m[3] * inv, -m[1] * inv,
            -m[2] * inv,  m[0] * inv,
        ]))
    }
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3::new([
        1.0, 0.0, 0.0,
        0.0, 1.0, 0.0,
        0.0, 0.0, 1.0,
    ]);

    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0] * (m[4] * m[8] - m[5] * m[7])
            - m[1] * (m[3] * m[8] - m[5] * m[6])
            + m[2] * (m[3] * m[7] - m[4] * m[6])
    }

    /// Returns `None` when the matrix is singular
    pub fn inverse(&self) -> Option<Mat3> {
        let det = self.determinant();
        if det.abs() < SINGULAR_EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let m = &self.m;
        Some(Mat3::new([
             (m[4] * m[8] - m[5] * m[7]) * inv,
            -(m[1] * m[8] - m[2] * m[7]) * inv,
             (m[1] * m[5] - m[2] * m[4]) * inv,

            -(m[3] * m[8] - m[5] * m[6]) * inv,
             (m[0] * m[8] - m[2] * m[6]) * inv,
            -(m[0] * m[5] - m[2] * m[3]) * inv,

             (m[3] * m[7] - m[4] * m[6]) * inv,
            -(m[0] * m[7] - m[1] * m[6]) * inv,
             (m[0] * m[4] - m[1] * m[3]) * inv,
        ]))
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4::new([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// 3x3 minor with `row` and `col` removed
    pub fn minor(&self, row: usize, col: usize) -> Mat3 {
        let mut out = Mat3::ZERO;
        let mut i = 0;
        for r in (0..4).filter(|r| *r != row) {
            for c in (0..4).filter(|c| *c != col) {
                out.m[i] = self.at(r, c);
                i += 1;
            }
        }
        out
    }

    pub fn cofactor(&self, row: usize, col: usize) -> f32 {
        let d = self.minor(row, col).determinant();
        if (row + col) % 2 == 0 { d } else { -d }
    }

    /// Cofactor expansion along the first row
    pub fn determinant(&self) -> f32 {
        (0..4).map(|col| self.at(0, col) * self.cofactor(0, col)).sum()
    }

    /// Adjugate over determinant. Returns `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Mat4> {
        let det = self.determinant();
        if det.abs() < SINGULAR_EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let mut out = Mat4::ZERO;
        for row in 0..4 {
            for col in 0..4 {
                out.set(col, row, self.cofactor(row, col) * inv);
            }
        }
        Some(out)
    }
}

/// Absolute tolerance near zero, relative tolerance elsewhere
pub fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    let diff = (a - b).abs();
    if diff < eps {
        return true;
    }
    diff / a.abs().max(b.abs()) < eps
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn sample4() -> Mat4 {
        Mat4::new([
            4.0, 7.0, 2.0, 3.0,
            0.0, 5.0, 0.0, 1.0,
            1.0, 0.0, 3.0, 0.0,
            2.0, 1.0, 0.0, 6.0,
        ])
    }

    #[test]
    fn test_mat2_add() {
        let a = Mat2::new([1.5, -2.3, 4.1, 3.2]);
        let b = Mat2::new([0.5, 1.3, -1.1, 2.8]);
        assert!((a + b).approx_eq(&Mat2::new([2.0, -1.0, 3.0, 6.0]), EPS));
    }

    #[test]
    fn test_mat3_sub_and_scalar() {
        let a = Mat3::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let zero = a - a;
        assert_eq!(zero, Mat3::ZERO);
        let doubled = a * 2.0;
        assert!((doubled / 2.0).approx_eq(&a, EPS));
    }

    #[test]
    fn test_transpose_twice_is_identity_op() {
        let a = sample4();
        assert_eq!(a.transpose().transpose(), a);
        let m3 = Mat3::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(m3.transpose().transpose(), m3);
        let m2 = Mat2::new([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m2.transpose().transpose(), m2);
    }

    #[test]
    fn test_rectangular_transpose() {
        let a = Mat3x4::new([
            1.0, 2.0, 3.0, 4.0,
            5.0, 6.0, 7.0, 8.0,
            9.0, 10.0, 11.0, 12.0,
        ]);
        let t = a.transpose();
        assert_eq!(t.at(3, 0), 4.0);
        assert_eq!(t.at(0, 2), 9.0);
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn test_identity_is_neutral() {
        let a = sample4();
        assert_eq!(a * Mat4::IDENTITY, a);
        assert_eq!(Mat4::IDENTITY * a, a);
        let m3 = Mat3::new([2.0, 0.0, 1.0, 1.0, 3.0, 0.0, 0.0, 1.0, 4.0]);
        assert_eq!(m3 * Mat3::IDENTITY, m3);
        let m2 = Mat2::new([2.0, 1.0, 1.0, 3.0]);
        assert_eq!(m2 * Mat2::IDENTITY, m2);
    }

    #[test]
    fn test_mixed_products() {
        let a = Mat4x3::new([
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,
            0.0, 0.0, 0.0,
        ]);
        let b = Mat3x4::new([
            1.0, 2.0, 3.0, 4.0,
            5.0, 6.0, 7.0, 8.0,
            9.0, 10.0, 11.0, 12.0,
        ]);
        let p: Mat4 = a * b;
        assert_eq!(p.at(0, 3), 4.0);
        assert_eq!(p.at(2, 0), 9.0);
        assert_eq!(p.at(3, 3), 0.0);

        let q: Mat3x4 = Mat3::IDENTITY * b;
        assert_eq!(q, b);
        let r: Mat3x4 = b * Mat4::IDENTITY;
        assert_eq!(r, b);
        let s: Mat4x3 = Mat4::IDENTITY * a;
        assert_eq!(s, a);
    }

    #[test]
    fn test_mat_vec_products() {
        let m = Mat4::new([
            1.0, 0.0, 0.0, 5.0,
            0.0, 1.0, 0.0, 6.0,
            0.0, 0.0, 1.0, 7.0,
            0.0, 0.0, 0.0, 1.0,
        ]);
        let v = m * Vec4::new(1.0, 2.0, 3.0, 1.0);
        assert_eq!(v, Vec4::new(6.0, 8.0, 10.0, 1.0));

        let m34 = Mat3x4::new([
            1.0, 0.0, 0.0, 1.0,
            0.0, 2.0, 0.0, 0.0,
            0.0, 0.0, 3.0, 0.0,
        ]);
        assert_eq!(m34 * Vec4::new(1.0, 1.0, 1.0, 1.0), Vec3::new(2.0, 2.0, 3.0));

        let m43 = m34.transpose();
        assert_eq!(m43 * Vec3::new(1.0, 1.0, 1.0), Vec4::new(1.0, 2.0, 3.0, 1.0));

        let r = Mat2::new([0.0, -1.0, 1.0, 0.0]);
        assert_eq!(r * Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_determinants() {
        assert!((Mat2::new([3.0, 8.0, 4.0, 6.0]).determinant() + 14.0).abs() < EPS);
        let m3 = Mat3::new([6.0, 1.0, 1.0, 4.0, -2.0, 5.0, 2.0, 8.0, 7.0]);
        assert!((m3.determinant() + 306.0).abs() < 1e-3);
        assert!((Mat4::IDENTITY.determinant() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_zero_row_has_zero_determinant() {
        let mut m = sample4();
        for col in 0..4 {
            m.set(2, col, 0.0);
        }
        assert_eq!(m.determinant(), 0.0);
        assert!(m.inverse().is_none());

        let m3 = Mat3::new([1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 4.0, 5.0, 6.0]);
        assert_eq!(m3.determinant(), 0.0);
        assert!(m3.inverse().is_none());
    }

    #[test]
    fn test_inverse_round_trip() {
        let a = sample4();
        let inv = a.inverse().expect("invertible");
        assert!((a * inv).approx_eq(&Mat4::IDENTITY, EPS));
        assert!((inv * a).approx_eq(&Mat4::IDENTITY, EPS));

        let m3 = Mat3::new([2.0, 0.0, 1.0, 1.0, 3.0, 0.0, 0.0, 1.0, 4.0]);
        let inv3 = m3.inverse().expect("invertible");
        assert!((m3 * inv3).approx_eq(&Mat3::IDENTITY, EPS));

        let m2 = Mat2::new([4.0, 7.0, 2.0, 6.0]);
        let inv2 = m2.inverse().expect("invertible");
        assert!((m2 * inv2).approx_eq(&Mat2::IDENTITY, EPS));
    }

    #[test]
    fn test_near_singular_is_rejected() {
        let m = Mat2::new([1e-4, 0.0, 0.0, 1e-4]);
        assert!(m.inverse().is_none());
    }
}
