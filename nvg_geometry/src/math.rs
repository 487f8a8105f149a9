// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small geometric helpers shared by the tessellation stages.

use core::ops::Mul;

use bytemuck::{Pod, Zeroable};
use peniko::kurbo;

/// Affine transformation matrix in single precision.
///
/// Applied to path coordinates as they are appended to a
/// [`CommandBuffer`](crate::CommandBuffer).
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Transform {
    /// 2x2 matrix.
    pub matrix: [f32; 4],
    /// Translation.
    pub translation: [f32; 2],
}

impl Transform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        matrix: [1.0, 0.0, 0.0, 1.0],
        translation: [0.0; 2],
    };

    /// Creates a transform from a kurbo affine matrix.
    pub fn from_kurbo(transform: &kurbo::Affine) -> Self {
        let c = transform.as_coeffs().map(|x| x as f32);
        Self {
            matrix: [c[0], c[1], c[2], c[3]],
            translation: [c[4], c[5]],
        }
    }

    /// Converts the transform to a kurbo affine matrix.
    pub fn to_kurbo(&self) -> kurbo::Affine {
        kurbo::Affine::new(
            [
                self.matrix[0],
                self.matrix[1],
                self.matrix[2],
                self.matrix[3],
                self.translation[0],
                self.translation[1],
            ]
            .map(f64::from),
        )
    }

    /// Maps a point through the transform.
    #[inline]
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d] = self.matrix;
        let [e, f] = self.translation;
        (x * a + y * c + e, x * b + y * d + f)
    }

    /// Mean of the scale factors along the two axes.
    ///
    /// Used to bring a user-space stroke width into device space.
    pub fn average_scale(&self) -> f32 {
        let [a, b, c, d] = self.matrix;
        let sx = (a * a + c * c).sqrt();
        let sy = (b * b + d * d).sqrt();
        (sx + sy) * 0.5
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Self;

    #[inline]
    fn mul(self, other: Self) -> Self {
        Self {
            matrix: [
                self.matrix[0] * other.matrix[0] + self.matrix[2] * other.matrix[1],
                self.matrix[1] * other.matrix[0] + self.matrix[3] * other.matrix[1],
                self.matrix[0] * other.matrix[2] + self.matrix[2] * other.matrix[3],
                self.matrix[1] * other.matrix[2] + self.matrix[3] * other.matrix[3],
            ],
            translation: [
                self.matrix[0] * other.translation[0]
                    + self.matrix[2] * other.translation[1]
                    + self.translation[0],
                self.matrix[1] * other.translation[0]
                    + self.matrix[3] * other.translation[1]
                    + self.translation[1],
            ],
        }
    }
}

/// Normalizes `(dx, dy)` in place and returns its original length.
///
/// Vectors shorter than `1e-6` are left untouched so that degenerate segments never
/// produce infinities.
#[inline]
pub fn normalize(dx: &mut f32, dy: &mut f32) -> f32 {
    let d = (*dx * *dx + *dy * *dy).sqrt();
    if d > 1e-6 {
        let id = 1.0 / d;
        *dx *= id;
        *dy *= id;
    }
    d
}

/// Returns true if the two points are closer than `tol`.
#[inline]
pub fn pt_equals(x1: f32, y1: f32, x2: f32, y2: f32, tol: f32) -> bool {
    let dx = x2 - x1;
    let dy = y2 - y1;
    dx * dx + dy * dy < tol * tol
}

/// Squared distance from `(x, y)` to the segment `(px, py)`–`(qx, qy)`.
pub fn dist_pt_seg_sq(x: f32, y: f32, px: f32, py: f32, qx: f32, qy: f32) -> f32 {
    let pqx = qx - px;
    let pqy = qy - py;
    let d = pqx * pqx + pqy * pqy;
    let mut t = pqx * (x - px) + pqy * (y - py);
    if d > 0.0 {
        t /= d;
    }
    let t = t.clamp(0.0, 1.0);
    let dx = px + t * pqx - x;
    let dy = py + t * pqy - y;
    dx * dx + dy * dy
}

/// Twice the signed area of the triangle `a`, `b`, `c`.
///
/// Positive for counter-clockwise triangles in a y-down coordinate system.
#[inline]
pub fn triarea2(ax: f32, ay: f32, bx: f32, by: f32, cx: f32, cy: f32) -> f32 {
    let abx = bx - ax;
    let aby = by - ay;
    let acx = cx - ax;
    let acy = cy - ay;
    acx * aby - abx * acy
}

/// 2D cross product.
#[inline]
pub fn cross(dx0: f32, dy0: f32, dx1: f32, dy1: f32) -> f32 {
    dx1 * dy0 - dx0 * dy1
}
