use std::fmt::Display;
use std::ops::{Add, Mul, Neg, Sub};

/// A 3D cartesian vector in metres (or a unitless direction once normalized).
///
/// Positions handed around by the geometry layer are always expressed in the frame held by
/// the [`GeometryContext`](super::GeometryContext).
#[derive(Debug, PartialEq, Clone, Copy, serde::Deserialize, serde::Serialize)]
pub struct Vec3D {
    /// The x-component of the vector.
    x: f64,
    /// The y-component of the vector.
    y: f64,
    /// The z-component of the vector.
    z: f64,
}

impl Vec3D {
    /// Creates a new vector with the given components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self { Self { x, y, z } }

    /// The zero vector.
    pub const fn zero() -> Self { Self::new(0.0, 0.0, 0.0) }

    /// Returns the x-component of the vector.
    pub const fn x(&self) -> f64 { self.x }
    /// Returns the y-component of the vector.
    pub const fn y(&self) -> f64 { self.y }
    /// Returns the z-component of the vector.
    pub const fn z(&self) -> f64 { self.z }

    /// Computes the magnitude (absolute value) of the vector.
    pub fn abs(&self) -> f64 { self.dot(self).sqrt() }

    /// Computes the dot product with `other`.
    pub fn dot(&self, other: &Self) -> f64 { self.x * other.x + self.y * other.y + self.z * other.z }

    /// Creates a vector pointing from `self` to `other`.
    pub fn to(&self, other: &Self) -> Self { *other - *self }

    /// Normalizes the vector to have a magnitude of 1.
    ///
    /// # Returns
    /// `None` if the vector has zero or non-finite length and therefore no direction.
    pub fn normalize(self) -> Option<Self> {
        let magnitude = self.abs();
        if magnitude == 0.0 || !magnitude.is_finite() {
            None
        } else {
            Some(self * (1.0 / magnitude))
        }
    }

    /// Angle between `self` and `other` in degrees, in the range `[0, 180]`.
    ///
    /// # Returns
    /// `None` if one of the vectors has no direction.
    pub fn angle_to_deg(&self, other: &Self) -> Option<f64> {
        let a = self.normalize()?;
        let b = other.normalize()?;
        // rounding can push the dot product marginally outside of [-1, 1]
        Some(a.dot(&b).clamp(-1.0, 1.0).acos().to_degrees())
    }

    /// Returns `true` if every component is finite.
    pub fn is_finite(&self) -> bool { self.x.is_finite() && self.y.is_finite() && self.z.is_finite() }
}

impl Add for Vec3D {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output { Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z) }
}

impl Sub for Vec3D {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output { Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z) }
}

impl Mul<f64> for Vec3D {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output { Self::new(self.x * rhs, self.y * rhs, self.z * rhs) }
}

impl Neg for Vec3D {
    type Output = Self;
    fn neg(self) -> Self::Output { Self::new(-self.x, -self.y, -self.z) }
}

impl From<(f64, f64, f64)> for Vec3D {
    fn from(value: (f64, f64, f64)) -> Self { Self::new(value.0, value.1, value.2) }
}

impl Display for Vec3D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.1}, {:.1}, {:.1}]", self.x, self.y, self.z)
    }
}
