// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column-major 4×4 transform used for content-to-target and draw transforms.

use core::ops::Mul;
#[cfg(not(any(test, feature = "std")))]
use kurbo::common::FloatFuncs as _;

/// A column-major 4×4 matrix stored as `[[f64; 4]; 4]`.
///
/// `a * b` maps a point through `b` first and then through `a`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a transform from four columns.
    #[inline]
    #[must_use]
    pub const fn from_cols(col0: [f64; 4], col1: [f64; 4], col2: [f64; 4], col3: [f64; 4]) -> Self {
        Self {
            cols: [col0, col1, col2, col3],
        }
    }

    /// Pure translation.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        let mut t = Self::IDENTITY;
        t.cols[3] = [x, y, z, 1.0];
        t
    }

    /// Non-uniform scale.
    #[inline]
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64, sz: f64) -> Self {
        let mut t = Self::IDENTITY;
        t.cols[0][0] = sx;
        t.cols[1][1] = sy;
        t.cols[2][2] = sz;
        t
    }

    /// Rotation around the Z axis, in radians.
    #[inline]
    #[must_use]
    pub fn from_rotation_z(radians: f64) -> Self {
        #[cfg(feature = "std")]
        let (s, c) = radians.sin_cos();
        #[cfg(not(feature = "std"))]
        let (s, c) = (radians.sin(), radians.cos());
        let mut t = Self::IDENTITY;
        t.cols[0] = [c, s, 0.0, 0.0];
        t.cols[1] = [-s, c, 0.0, 0.0];
        t
    }

    /// Returns `true` if every element matches the identity exactly.
    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Returns `true` if points on the `z = 0` plane can map to a `w` other
    /// than one.
    #[inline]
    #[must_use]
    pub fn has_perspective(&self) -> bool {
        self.cols[0][3] != 0.0 || self.cols[1][3] != 0.0 || self.cols[3][3] != 1.0
    }

    /// Returns `true` if no element is infinite or NaN.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }

    /// Maps the point `(x, y, 0, 1)` and returns the homogeneous result
    /// `[x, y, z, w]` without dividing by `w`.
    #[inline]
    #[must_use]
    pub fn map_point(&self, x: f64, y: f64) -> [f64; 4] {
        let c = &self.cols;
        let mut out = [0.0; 4];
        for (i, v) in out.iter_mut().enumerate() {
            *v = c[0][i] * x + c[1][i] * y + c[3][i];
        }
        out
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        for (j, col) in out.iter_mut().enumerate() {
            for (i, v) in col.iter_mut().enumerate() {
                *v = a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
            }
        }
        Self { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_neutral() {
        let t = Transform3d::from_translation(4.0, 5.0, 0.0);
        assert_eq!(Transform3d::IDENTITY * t, t);
        assert_eq!(t * Transform3d::IDENTITY, t);
        assert!(Transform3d::default().is_identity());
        assert!(!t.is_identity());
    }

    #[test]
    fn product_applies_right_operand_first() {
        let scale = Transform3d::from_scale(2.0, 2.0, 1.0);
        let shift = Transform3d::from_translation(10.0, 0.0, 0.0);
        // Scale, then shift.
        assert_eq!((shift * scale).map_point(1.0, 1.0), [12.0, 2.0, 0.0, 1.0]);
        // Shift, then scale.
        assert_eq!((scale * shift).map_point(1.0, 1.0), [22.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn quarter_turn() {
        let r = Transform3d::from_rotation_z(core::f64::consts::FRAC_PI_2);
        let p = r.map_point(1.0, 0.0);
        assert!(p[0].abs() < 1e-9);
        assert!((p[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn perspective_detection() {
        assert!(!Transform3d::from_scale(3.0, 3.0, 1.0).has_perspective());
        let mut t = Transform3d::IDENTITY;
        t.cols[0][3] = -0.01;
        assert!(t.has_perspective());
        assert_eq!(t.map_point(100.0, 0.0)[3], 0.0);
    }

    #[test]
    fn non_finite_detected() {
        let mut t = Transform3d::IDENTITY;
        assert!(t.is_finite());
        t.cols[1][2] = f64::NAN;
        assert!(!t.is_finite());
    }
}
