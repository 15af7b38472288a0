//! Model, view and projection constructors for `Mat4`
//!
//! All matrices act on column vectors (`M * v`). Model helpers right-multiply the new
//! transform onto `self`, so `m.translate(t).rotate(r)` rotates first, then translates.

use super::matrix::Mat4;
use super::vector::{Vec3, Vec4};

impl Mat4 {
    pub fn from_translation(v: Vec3) -> Mat4 {
        Mat4::new([
            1.0, 0.0, 0.0, v.x,
            0.0, 1.0, 0.0, v.y,
            0.0, 0.0, 1.0, v.z,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn from_scale(v: Vec3) -> Mat4 {
        Mat4::new([
            v.x, 0.0, 0.0, 0.0,
            0.0, v.y, 0.0, 0.0,
            0.0, 0.0, v.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotation by Euler angles in radians, composed as `Rz * Ry * Rx`
    pub fn from_rotation(angles: Vec3) -> Mat4 {
        let (sx, cx) = angles.x.sin_cos();
        let (sy, cy) = angles.y.sin_cos();
        let (sz, cz) = angles.z.sin_cos();

        let rx = Mat4::new([
            1.0, 0.0, 0.0, 0.0,
            0.0, cx,  -sx, 0.0,
            0.0, sx,  cx,  0.0,
            0.0, 0.0, 0.0, 1.0,
        ]);
        let ry = Mat4::new([
            cy,  0.0, sy,  0.0,
            0.0, 1.0, 0.0, 0.0,
            -sy, 0.0, cy,  0.0,
            0.0, 0.0, 0.0, 1.0,
        ]);
        let rz = Mat4::new([
            cz,  -sz, 0.0, 0.0,
            sz,  cz,  0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]);

        rz * ry * rx
    }

    pub fn translate(&self, v: Vec3) -> Mat4 {
        *self * Mat4::from_translation(v)
    }

    pub fn scale(&self, v: Vec3) -> Mat4 {
        *self * Mat4::from_scale(v)
    }

    pub fn rotate(&self, angles: Vec3) -> Mat4 {
        *self * Mat4::from_rotation(angles)
    }

    /// View matrix for a camera at `eye` looking at `target` (right-handed, -Z forward)
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(up).normalize();
        let true_up = right.cross(forward);

        Mat4::new([
            right.x,    right.y,    right.z,    -right.dot(eye),
            true_up.x,  true_up.y,  true_up.z,  -true_up.dot(eye),
            -forward.x, -forward.y, -forward.z, forward.dot(eye),
            0.0,        0.0,        0.0,        1.0,
        ])
    }

    /// Symmetric perspective projection; `fov_y` in radians. Maps `[-near, -far]` to NDC z `[-1, 1]`.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let f = 1.0 / (fov_y * 0.5).tan();

        Mat4::new([
            f / aspect, 0.0, 0.0,                         0.0,
            0.0,        f,   0.0,                         0.0,
            0.0,        0.0, (far + near) / (near - far), (2.0 * far * near) / (near - far),
            0.0,        0.0, -1.0,                        0.0,
        ])
    }

    /// Off-center perspective projection from near-plane bounds
    pub fn frustum(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new([
            (2.0 * near) / (right - left), 0.0, (right + left) / (right - left), 0.0,
            0.0, (2.0 * near) / (top - bottom), (top + bottom) / (top - bottom), 0.0,
            0.0, 0.0, -(far + near) / (far - near), (-2.0 * far * near) / (far - near),
            0.0, 0.0, -1.0, 0.0,
        ])
    }

    /// Transform a point and apply the perspective divide when `w` is usable
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let v: Vec4 = *self * p.extend(1.0);
        if v.w.abs() > f32::EPSILON {
            Vec3::new(v.x / v.w, v.y / v.w, v.z / v.w)
        } else {
            v.truncate()
        }
    }
}
