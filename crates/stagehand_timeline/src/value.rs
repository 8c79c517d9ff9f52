// SPDX-License-Identifier: MIT OR Apache-2.0
//! Value types carried by animatable properties.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A 2D vector (positions, scale pairs)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component
    pub x: f64,
    /// Vertical component
    pub y: f64,
}

impl Vec2 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    /// Unit vector on both axes
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    /// Create a new vector
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same value on both axes
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v }
    }

    /// Component-wise product
    pub fn mul_components(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x * other.x, self.y * other.y)
    }

    /// Component-wise quotient
    pub fn div_components(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x / other.x, self.y / other.y)
    }

    /// Multiply both components by a scalar
    pub fn scale(self, factor: f64) -> Vec2 {
        Vec2::new(self.x * factor, self.y * factor)
    }

    /// Rotate counter-clockwise (in math orientation) by `degrees`
    pub fn rotate(self, degrees: f64) -> Vec2 {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Clamp each component into `[min, max]`
    pub fn clamp_components(self, min: Option<f64>, max: Option<f64>) -> Vec2 {
        Vec2::new(clamp_opt(self.x, min, max), clamp_opt(self.y, min, max))
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Kind of value a track stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Single number
    Scalar,
    /// Pair of numbers
    Vector2,
    /// String (never interpolated)
    Text,
}

impl ValueKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar => "Scalar",
            Self::Vector2 => "Vector2",
            Self::Text => "Text",
        }
    }

    /// Whether values of this kind can be blended and clamped
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value stored in a keyframe or used as a track default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Single number
    Scalar(f64),
    /// 2D vector
    Vector2(Vec2),
    /// String value
    Text(String),
}

impl Value {
    /// Kind tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Vector2(_) => ValueKind::Vector2,
            Value::Text(_) => ValueKind::Text,
        }
    }

    /// Get as scalar if possible
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as vector if possible
    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            Value::Vector2(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as text if possible
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Clamp numeric values into optional bounds; text passes through
    pub fn clamped(self, min: Option<f64>, max: Option<f64>) -> Value {
        match self {
            Value::Scalar(v) => Value::Scalar(clamp_opt(v, min, max)),
            Value::Vector2(v) => Value::Vector2(v.clamp_components(min, max)),
            text @ Value::Text(_) => text,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Value::Vector2(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

fn clamp_opt(v: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let v = match min {
        Some(lo) if v < lo => lo,
        _ => v,
    };
    match max {
        Some(hi) if v > hi => hi,
        _ => v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_quarter_turn() {
        let v = Vec2::new(100.0, 0.0).rotate(90.0);
        assert!(v.x.abs() < 1e-9);
        assert!((v.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_component_wise_product_and_quotient() {
        let v = Vec2::new(3.0, -4.0);
        assert_eq!(v.mul_components(Vec2::new(2.0, 0.5)), Vec2::new(6.0, -2.0));
        assert_eq!(v.div_components(Vec2::new(3.0, -2.0)), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_clamp_only_numeric() {
        assert_eq!(Value::Scalar(150.0).clamped(Some(0.0), Some(100.0)), Value::Scalar(100.0));
        assert_eq!(
            Value::Vector2(Vec2::new(-5.0, 5.0)).clamped(Some(0.0), None),
            Value::Vector2(Vec2::new(0.0, 5.0))
        );
        assert_eq!(Value::from("hi").clamped(Some(0.0), Some(1.0)), Value::from("hi"));
    }
}
