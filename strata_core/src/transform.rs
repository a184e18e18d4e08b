// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column-major 4×4 transform and 3-D origin point.
//!
//! This type covers the subset of 3-D affine math that property-tree
//! construction needs (identity, multiply, translation queries, flattening,
//! inversion) without pulling in a full linear-algebra crate.

use core::ops::Mul;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Vec2;

/// A point in 3-D layer space, used for transform origins.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3 {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl Point3 {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a point from its coordinates.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the x/y components as a 2-D vector.
    #[inline]
    #[must_use]
    pub const fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A column-major 4×4 affine transform stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column* of the matrix, so `cols[3]` holds the
/// translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a transform from a column-major 2-D array.
    #[inline]
    #[must_use]
    pub const fn from_cols_array_2d(cols: [[f64; 4]; 4]) -> Self {
        Self { cols }
    }

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f64; 4] {
        self.cols[i]
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a 2-D translation transform from a vector.
    #[inline]
    #[must_use]
    pub const fn from_vec2(v: Vec2) -> Self {
        Self::from_translation(v.x, v.y, 0.0)
    }

    /// Creates a non-uniform scale transform.
    #[inline]
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            cols: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a uniform x/y scale, leaving z untouched.
    #[inline]
    #[must_use]
    pub const fn from_scale_2d(s: f64) -> Self {
        Self::from_scale(s, s, 1.0)
    }

    /// Creates a rotation around the Z axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_z(radians: f64) -> Self {
        #[cfg(feature = "std")]
        let (s, c) = radians.sin_cos();
        #[cfg(not(feature = "std"))]
        let (s, c) = (radians.sin(), radians.cos());
        Self {
            cols: [
                [c, s, 0.0, 0.0],
                [-s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Returns `true` if this is exactly the identity.
    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Returns `true` if this is the identity or a translation in x/y only.
    ///
    /// Layers whose transform passes this test can be folded into an offset
    /// instead of needing their own transform node.
    #[must_use]
    pub fn is_identity_or_2d_translation(&self) -> bool {
        let mut probe = *self;
        probe.cols[3][0] = 0.0;
        probe.cols[3][1] = 0.0;
        probe.is_identity()
    }

    /// Returns the x/y translation component.
    #[inline]
    #[must_use]
    pub const fn to_2d_translation(&self) -> Vec2 {
        Vec2::new(self.cols[3][0], self.cols[3][1])
    }

    /// Collapses the z axis, producing the 2-D projection of this transform.
    ///
    /// Row 2 and column 2 are cleared except for the diagonal, which becomes 1.
    #[must_use]
    pub const fn flatten_to_2d(self) -> Self {
        let mut c = self.cols;
        c[0][2] = 0.0;
        c[1][2] = 0.0;
        c[3][2] = 0.0;
        c[2][0] = 0.0;
        c[2][1] = 0.0;
        c[2][3] = 0.0;
        c[2][2] = 1.0;
        Self { cols: c }
    }

    /// Returns the inverse, or `None` if the matrix is singular.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let [
            [a00, a01, a02, a03],
            [a10, a11, a12, a13],
            [a20, a21, a22, a23],
            [a30, a31, a32, a33],
        ] = self.cols;

        let b00 = a00 * a11 - a01 * a10;
        let b01 = a00 * a12 - a02 * a10;
        let b02 = a00 * a13 - a03 * a10;
        let b03 = a01 * a12 - a02 * a11;
        let b04 = a01 * a13 - a03 * a11;
        let b05 = a02 * a13 - a03 * a12;
        let b06 = a20 * a31 - a21 * a30;
        let b07 = a20 * a32 - a22 * a30;
        let b08 = a20 * a33 - a23 * a30;
        let b09 = a21 * a32 - a22 * a31;
        let b10 = a21 * a33 - a23 * a31;
        let b11 = a22 * a33 - a23 * a32;

        let det = b00 * b11 - b01 * b10 + b02 * b09 + b03 * b08 - b04 * b07 + b05 * b06;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;

        Some(Self {
            cols: [
                [
                    (a11 * b11 - a12 * b10 + a13 * b09) * inv,
                    (a02 * b10 - a01 * b11 - a03 * b09) * inv,
                    (a31 * b05 - a32 * b04 + a33 * b03) * inv,
                    (a22 * b04 - a21 * b05 - a23 * b03) * inv,
                ],
                [
                    (a12 * b08 - a10 * b11 - a13 * b07) * inv,
                    (a00 * b11 - a02 * b08 + a03 * b07) * inv,
                    (a32 * b02 - a30 * b05 - a33 * b01) * inv,
                    (a20 * b05 - a22 * b02 + a23 * b01) * inv,
                ],
                [
                    (a10 * b10 - a11 * b08 + a13 * b06) * inv,
                    (a01 * b08 - a00 * b10 - a03 * b06) * inv,
                    (a30 * b04 - a31 * b02 + a33 * b00) * inv,
                    (a21 * b02 - a20 * b04 - a23 * b00) * inv,
                ],
                [
                    (a11 * b07 - a10 * b09 - a12 * b06) * inv,
                    (a00 * b09 - a01 * b07 + a02 * b06) * inv,
                    (a31 * b01 - a30 * b03 - a32 * b00) * inv,
                    (a20 * b03 - a21 * b01 + a22 * b00) * inv,
                ],
            ],
        })
    }

    /// Is this transform [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
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
        let mut j = 0;
        while j < 4 {
            let mut i = 0;
            while i < 4 {
                out[j][i] =
                    a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
                i += 1;
            }
            j += 1;
        }
        Self { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Transform3d, b: Transform3d) {
        for (ca, cb) in a.cols.iter().zip(b.cols.iter()) {
            for (x, y) in ca.iter().zip(cb.iter()) {
                assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
            }
        }
    }

    #[test]
    fn default_is_identity() {
        assert_eq!(Transform3d::default(), Transform3d::IDENTITY);
        assert!(Transform3d::IDENTITY.is_identity());
    }

    #[test]
    fn translation_composition() {
        let a = Transform3d::from_translation(1.0, 0.0, 0.0);
        let b = Transform3d::from_translation(0.0, 2.0, 0.0);
        assert_eq!((a * b).col(3), [1.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn scale_then_translate() {
        let s = Transform3d::from_scale(2.0, 2.0, 2.0);
        let t = Transform3d::from_translation(3.0, 4.0, 0.0);
        let combined = t * s;
        assert_eq!(combined.col(0), [2.0, 0.0, 0.0, 0.0]);
        assert_eq!(combined.col(3), [3.0, 4.0, 0.0, 1.0]);
    }

    #[test]
    fn two_d_translation_classification() {
        assert!(Transform3d::IDENTITY.is_identity_or_2d_translation());
        assert!(Transform3d::from_translation(5.0, -3.0, 0.0).is_identity_or_2d_translation());
        assert!(!Transform3d::from_translation(0.0, 0.0, 1.0).is_identity_or_2d_translation());
        assert!(!Transform3d::from_scale_2d(2.0).is_identity_or_2d_translation());
        assert!(!Transform3d::from_rotation_z(0.3).is_identity_or_2d_translation());
        assert_eq!(
            Transform3d::from_translation(5.0, -3.0, 0.0).to_2d_translation(),
            Vec2::new(5.0, -3.0)
        );
    }

    #[test]
    fn inverse_round_trips() {
        let t = Transform3d::from_translation(10.0, -4.0, 2.0)
            * Transform3d::from_rotation_z(0.7)
            * Transform3d::from_scale(2.0, 3.0, 1.0);
        let inv = t.inverse().unwrap();
        assert_close(t * inv, Transform3d::IDENTITY);
        assert_close(inv * t, Transform3d::IDENTITY);
    }

    #[test]
    fn singular_has_no_inverse() {
        assert!(Transform3d::from_scale(0.0, 1.0, 1.0).inverse().is_none());
    }

    #[test]
    fn flatten_clears_z() {
        let mut t = Transform3d::from_translation(1.0, 2.0, 3.0);
        t.cols[0][2] = 0.5;
        t.cols[2][0] = 0.25;
        let flat = t.flatten_to_2d();
        assert_eq!(flat.col(3), [1.0, 2.0, 0.0, 1.0]);
        assert_eq!(flat.col(2), [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(flat.col(0)[2], 0.0);
    }

    #[test]
    fn infinity_detected() {
        let mut t = Transform3d::IDENTITY;
        t.cols[0][3] = f64::INFINITY;
        assert!(!t.is_finite());
    }
}
