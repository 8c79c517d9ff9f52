// SPDX-License-Identifier: MIT OR Apache-2.0
//! 2D transform composition through the layer hierarchy.
//!
//! A parent contributes `translate(position); rotate(rotation); scale(scale)`,
//! applied from the root down. Scale here is a unit factor (1.0 = 100%);
//! tracks store percent and are converted at the boundary.

use crate::value::Vec2;
use serde::{Deserialize, Serialize};

/// Position, scale and rotation of a layer in some space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldTransform {
    /// Position in composition pixels
    pub position: Vec2,
    /// Unit scale per axis
    pub scale: Vec2,
    /// Rotation in degrees
    pub rotation: f64,
}

impl WorldTransform {
    /// Identity transform (parent of root layers)
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        scale: Vec2::ONE,
        rotation: 0.0,
    };

    /// Build from track values (scale in percent)
    pub fn from_tracks(position: Vec2, scale_percent: Vec2, rotation: f64) -> Self {
        Self {
            position,
            scale: scale_percent.div_components(Vec2::splat(100.0)),
            rotation,
        }
    }

    /// Scale in percent, for presentation
    pub fn scale_percent(&self) -> Vec2 {
        self.scale.scale(100.0)
    }

    /// Place a local transform inside this (parent) transform
    pub fn compose(&self, local: &WorldTransform) -> WorldTransform {
        WorldTransform {
            position: self.position + local.position.mul_components(self.scale).rotate(self.rotation),
            scale: self.scale.mul_components(local.scale),
            rotation: self.rotation + local.rotation,
        }
    }

    /// Whether a scale component is zero, which makes the transform non-invertible
    pub fn is_degenerate(&self) -> bool {
        self.scale.x.abs() < f64::EPSILON || self.scale.y.abs() < f64::EPSILON
    }

    /// Local transform that yields `world` when composed into this (parent) transform.
    ///
    /// `None` when this transform is degenerate.
    pub fn solve_local(&self, world: &WorldTransform) -> Option<WorldTransform> {
        if self.is_degenerate() {
            return None;
        }
        Some(WorldTransform {
            position: (world.position - self.position)
                .rotate(-self.rotation)
                .div_components(self.scale),
            scale: world.scale.div_components(self.scale),
            rotation: world.rotation - self.rotation,
        })
    }

    /// Component-wise comparison within `tolerance`
    pub fn approx_eq(&self, other: &WorldTransform, tolerance: f64) -> bool {
        (self.position.x - other.position.x).abs() <= tolerance
            && (self.position.y - other.position.y).abs() <= tolerance
            && (self.scale.x - other.scale.x).abs() <= tolerance
            && (self.scale.y - other.scale.y).abs() <= tolerance
            && (self.rotation - other.rotation).abs() <= tolerance
    }
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_then_translate() {
        let parent = WorldTransform { rotation: 90.0, ..WorldTransform::IDENTITY };
        let child = WorldTransform { position: Vec2::new(100.0, 0.0), ..WorldTransform::IDENTITY };

        let world = parent.compose(&child);
        assert!(world.position.x.abs() < 1e-9);
        assert!((world.position.y - 100.0).abs() < 1e-9);
        assert_eq!(world.rotation, 90.0);
    }

    #[test]
    fn test_solve_local_inverts_compose() {
        let parent = WorldTransform {
            position: Vec2::new(40.0, -12.0),
            scale: Vec2::new(2.0, 0.5),
            rotation: 33.0,
        };
        let local = WorldTransform {
            position: Vec2::new(-7.0, 19.0),
            scale: Vec2::new(1.5, 3.0),
            rotation: -80.0,
        };

        let solved = parent.solve_local(&parent.compose(&local)).unwrap();
        assert!(solved.approx_eq(&local, 1e-9));
    }

    #[test]
    fn test_zero_scale_parent_has_no_local_solution() {
        let parent = WorldTransform {
            scale: Vec2::new(0.0, 1.0),
            ..WorldTransform::IDENTITY
        };
        assert!(parent.is_degenerate());
        assert!(parent.solve_local(&WorldTransform::IDENTITY).is_none());
        assert!(!WorldTransform::IDENTITY.is_degenerate());
    }

    #[test]
    fn test_percent_conversion() {
        let t = WorldTransform::from_tracks(Vec2::ZERO, Vec2::new(50.0, 200.0), 0.0);
        assert_eq!(t.scale, Vec2::new(0.5, 2.0));
        assert_eq!(t.scale_percent(), Vec2::new(50.0, 200.0));
    }
}
