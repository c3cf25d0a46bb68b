use std::ops::{Deref, DerefMut, Mul};

use crate::{LinalgError, Vec2F64};

/// 2x2 matrix (f64), column-major.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(transparent)]
pub struct Mat2F64(pub glam::DMat2);

impl Mat2F64 {
    /// All zeros.
    pub const ZERO: Self = Self(glam::DMat2::ZERO);

    /// Create a new matrix from two column vectors.
    #[inline]
    pub fn from_cols(x_axis: Vec2F64, y_axis: Vec2F64) -> Self {
        Self(glam::DMat2::from_cols(x_axis.0, y_axis.0))
    }

    /// Create a new matrix from a column-major array.
    #[inline]
    pub fn from_cols_array(arr: &[f64; 4]) -> Self {
        Self(glam::DMat2::from_cols_array(arr))
    }

    /// Inverse of the matrix.
    ///
    /// Returns [`LinalgError::Singular`] when the determinant is zero or not finite, so the
    /// result never carries infinities or NaNs.
    pub fn try_inverse(&self) -> Result<Self, LinalgError> {
        let det = self.0.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(LinalgError::Singular);
        }
        Ok(Self(self.0.inverse()))
    }

    /// Solve `self * x = rhs` for `x`.
    pub fn solve(&self, rhs: Vec2F64) -> Result<Vec2F64, LinalgError> {
        Ok(self.try_inverse()? * rhs)
    }
}

impl Deref for Mat2F64 {
    type Target = glam::DMat2;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Mat2F64 {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<glam::DMat2> for Mat2F64 {
    #[inline]
    fn from(m: glam::DMat2) -> Self {
        Self(m)
    }
}

impl From<Mat2F64> for glam::DMat2 {
    #[inline]
    fn from(m: Mat2F64) -> Self {
        m.0
    }
}

// Matrix-matrix multiplication
impl Mul<Mat2F64> for Mat2F64 {
    type Output = Mat2F64;

    #[inline]
    fn mul(self, rhs: Mat2F64) -> Self::Output {
        Mat2F64(self.0 * rhs.0)
    }
}

// Matrix-vector multiplication
impl Mul<Vec2F64> for Mat2F64 {
    type Output = Vec2F64;

    #[inline]
    fn mul(self, rhs: Vec2F64) -> Self::Output {
        Vec2F64(self.0 * rhs.0)
    }
}
