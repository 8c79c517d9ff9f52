// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for layer tracks.

use crate::value::{Value, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use uuid::Uuid;

/// Unique identifier for a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyframeId(pub Uuid);

impl KeyframeId {
    /// Create a new random keyframe ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpolation mode from a keyframe to the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InterpolationMode {
    /// Blend towards the next keyframe
    #[default]
    Linear,
    /// Keep this value until the next keyframe (step)
    Hold,
}

/// A keyframe in a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Unique keyframe ID
    pub id: KeyframeId,
    /// Time in seconds
    pub time: f64,
    /// Value at this keyframe
    pub value: Value,
    /// Interpolation mode to next keyframe
    pub interpolation: InterpolationMode,
    /// Ease into this keyframe
    pub ease_in: bool,
    /// Ease out of this keyframe
    pub ease_out: bool,
}

impl Keyframe {
    /// Create a new linear keyframe without easing
    pub fn new(time: f64, value: impl Into<Value>) -> Self {
        Self {
            id: KeyframeId::new(),
            time,
            value: value.into(),
            interpolation: InterpolationMode::Linear,
            ease_in: false,
            ease_out: false,
        }
    }

    /// Set interpolation mode
    pub fn with_interpolation(mut self, mode: InterpolationMode) -> Self {
        self.interpolation = mode;
        self
    }

    /// Set easing flags
    pub fn with_easing(mut self, ease_in: bool, ease_out: bool) -> Self {
        self.ease_in = ease_in;
        self.ease_out = ease_out;
        self
    }

    /// Explicit structural copy used for history snapshots
    pub fn snapshot(&self) -> Keyframe {
        Keyframe {
            id: self.id,
            time: self.time,
            value: self.value.clone(),
            interpolation: self.interpolation,
            ease_in: self.ease_in,
            ease_out: self.ease_out,
        }
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + (b - a) * t
    }

    /// Interpolate Vec2 component-wise
    pub fn lerp_vec2(a: Vec2, b: Vec2, t: f64) -> Vec2 {
        Vec2::new(Self::lerp(a.x, b.x, t), Self::lerp(a.y, b.y, t))
    }

    /// Reshape a normalized segment time.
    ///
    /// `out_of_start` is the ease-out flag of the segment's first key and
    /// `into_end` the ease-in flag of its second key.
    pub fn ease(t: f64, out_of_start: bool, into_end: bool) -> f64 {
        match (out_of_start, into_end) {
            (true, true) => 0.5 * (1.0 - (t * PI).cos()),
            (false, true) => 1.0 - (1.0 - t) * (1.0 - t),
            (true, false) => t * t,
            (false, false) => t,
        }
    }
}
