use std::ops::{Add, Deref, DerefMut, Mul, Neg, Sub};

/// 2D vector (f64).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(transparent)]
pub struct Vec2F64(pub glam::DVec2);

impl Vec2F64 {
    /// All zeros.
    pub const ZERO: Self = Self(glam::DVec2::ZERO);

    /// Create a new vector from its components.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self(glam::DVec2::new(x, y))
    }

    /// Create a new vector from an array.
    #[inline]
    pub fn from_array(arr: [f64; 2]) -> Self {
        Self(glam::DVec2::from_array(arr))
    }

    /// Convert to an array.
    #[inline]
    pub fn to_array(&self) -> [f64; 2] {
        self.0.to_array()
    }
}

impl Deref for Vec2F64 {
    type Target = glam::DVec2;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Vec2F64 {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<glam::DVec2> for Vec2F64 {
    #[inline]
    fn from(v: glam::DVec2) -> Self {
        Self(v)
    }
}

impl From<Vec2F64> for glam::DVec2 {
    #[inline]
    fn from(v: Vec2F64) -> Self {
        v.0
    }
}

impl From<[f64; 2]> for Vec2F64 {
    #[inline]
    fn from(arr: [f64; 2]) -> Self {
        Self::from_array(arr)
    }
}

impl Add for Vec2F64 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Vec2F64 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Vec2F64 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<f64> for Vec2F64 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}
