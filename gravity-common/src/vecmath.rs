use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

/// An immutable 2D vector used for particle velocities and forces.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    /// Creates a new Vector2.
    pub const fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }

    /// Creates a zero vector.
    pub const fn zero() -> Self {
        Vector2 { x: 0.0, y: 0.0 }
    }

    /// Euclidean length of the vector.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Returns the unit vector pointing the same way.
    /// A vector with a magnitude of exactly zero yields the zero vector.
    pub fn unit(&self) -> Self {
        let magnitude = self.magnitude();
        if magnitude == 0.0 {
            Vector2::zero()
        } else {
            Vector2 { x: self.x / magnitude, y: self.y / magnitude }
        }
    }

    /// Direction of the vector in radians, measured through its unit vector.
    /// The zero vector has an angle of 0.
    pub fn angle(&self) -> f64 {
        let unit = self.unit();
        unit.y.atan2(unit.x)
    }

    /// Calculates the dot product with another vector.
    pub fn dot_product(&self, other: Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Adds another vector to this vector.
    pub fn add(&self, other: Vector2) -> Self {
        Vector2 { x: self.x + other.x, y: self.y + other.y }
    }

    /// Scales the vector by a scalar value.
    pub fn scale(&self, factor: f64) -> Self {
        Vector2 { x: self.x * factor, y: self.y * factor }
    }
}

impl Add for Vector2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self { x: self.x + other.x, y: self.y + other.y }
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;
    fn mul(self, factor: f64) -> Self {
        Self { x: self.x * factor, y: self.y * factor }
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector2({}, {})", self.x, self.y)
    }
}

/// Builds a vector of the given length along an angle (in radians).
pub fn angle_to_vec(angle_rad: f64, length: f64) -> Vector2 {
    Vector2::new(angle_rad.cos() * length, angle_rad.sin() * length)
}
