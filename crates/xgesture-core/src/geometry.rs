#![forbid(unsafe_code)]

//! Geometric primitives for touch positions.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A 2D position or displacement in logical pixels.
///
/// Uses surface coordinates as delivered by the host (origin at top-left,
/// y axis pointing down).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Offset {
    /// The origin, also the zero displacement.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new offset.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared length, compared against squared-distance tolerances.
    #[inline]
    #[must_use]
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Euclidean length.
    #[inline]
    #[must_use]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Squared Euclidean distance to another offset.
    #[inline]
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        (self - other).length_squared()
    }

    /// Euclidean distance to another offset.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Point halfway between `self` and `other`.
    #[inline]
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Angle of this vector in radians, as returned by `atan2(y, x)`.
    #[inline]
    #[must_use]
    pub fn direction(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Returns true if both components are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Offset {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl Add for Offset {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Offset {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Offset {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Offset {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Offset {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Wrap an angle in degrees into the half-open range `(-180, 180]`.
#[must_use]
pub fn normalize_degrees_180(degrees: f64) -> f64 {
    let wrapped = degrees % 360.0;
    if wrapped > 180.0 {
        wrapped - 360.0
    } else if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Signed rotation of the line `first - second` between two reference
/// snapshots, in radians within `(-PI, PI]`.
///
/// Positive values mean the line turned counter-clockwise as seen on a
/// y-down surface.
#[must_use]
pub fn rotation_between(
    first_start: Offset,
    second_start: Offset,
    first_now: Offset,
    second_now: Offset,
) -> f64 {
    let start_angle = (first_start - second_start).direction();
    let current_angle = (first_now - second_now).direction();
    // Converting 180 degrees back may round just past PI.
    normalize_degrees_180((start_angle - current_angle).to_degrees())
        .to_radians()
        .min(std::f64::consts::PI)
}
