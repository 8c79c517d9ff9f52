// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compositions: ordered layer stacks with their own canvas and frame rate.
//!
//! Index 0 of the layer list is the topmost layer. Parent links are IDs into
//! the same list; every walk along them is bounded by the layer count so a
//! corrupted hierarchy cannot hang evaluation.

use crate::asset::AssetId;
use crate::error::{CycleError, Result, TimelineError};
use crate::layer::{transform_track, Layer, LayerContent, LayerId, OPACITY, POSITION, ROTATION, SCALE, VOLUME};
use crate::transform::WorldTransform;
use crate::value::{Value, Vec2};
use serde::{Deserialize, Serialize};

/// Fraction of a frame within which two times address the same keyframe
const SUBFRAME_TOLERANCE: f64 = 0.5;

/// A composition (canvas + layers)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    /// Unique composition ID (also its asset ID)
    pub id: AssetId,
    /// Composition name
    pub name: String,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Duration in seconds
    pub duration: f64,
    /// Frame rate
    pub frames_per_second: f64,
    /// Layers, topmost first
    layers: Vec<Layer>,
}

impl Composition {
    /// Create a new empty composition
    pub fn new(name: impl Into<String>, width: u32, height: u32, duration: f64, frames_per_second: f64) -> Self {
        Self {
            id: AssetId::new(),
            name: name.into(),
            width,
            height,
            duration: duration.max(0.0),
            frames_per_second: if frames_per_second > 0.0 { frames_per_second } else { 30.0 },
            layers: Vec::new(),
        }
    }

    /// Canvas centre
    pub fn center(&self) -> Vec2 {
        Vec2::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Length of one frame in seconds
    pub fn frame_duration(&self) -> f64 {
        1.0 / self.frames_per_second
    }

    /// Round a time to the nearest frame boundary
    pub fn snap_time(&self, time: f64) -> f64 {
        (time * self.frames_per_second).round() / self.frames_per_second
    }

    /// Tolerance for matching a snapped time against existing keyframes
    pub fn subframe_tolerance(&self) -> f64 {
        SUBFRAME_TOLERANCE * self.frame_duration()
    }

    /// Convert time to frame number
    pub fn time_to_frame(&self, time: f64) -> u64 {
        (time.max(0.0) * self.frames_per_second).round() as u64
    }

    /// Convert frame number to time
    pub fn frame_to_time(&self, frame: u64) -> f64 {
        frame as f64 / self.frames_per_second
    }

    /// Get all layers, topmost first
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Get layer count
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Get a layer
    pub fn layer(&self, layer_id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == layer_id)
    }

    /// Get a mutable layer
    pub fn layer_mut(&mut self, layer_id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == layer_id)
    }

    /// Paint-order index of a layer
    pub fn layer_index(&self, layer_id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == layer_id)
    }

    /// Create a layer with default tracks on top of the stack
    pub fn create_layer(&mut self, name: impl Into<String>, content: LayerContent) -> LayerId {
        let layer = Layer::new(name, content, self.center(), self.duration);
        self.insert_layer(0, layer)
    }

    /// Insert a layer at a paint-order index (clamped to the stack size)
    pub fn insert_layer(&mut self, index: usize, layer: Layer) -> LayerId {
        let id = layer.id;
        let index = index.min(self.layers.len());
        self.layers.insert(index, layer);
        id
    }

    /// Remove a layer; its children become root layers
    pub fn remove_layer(&mut self, layer_id: LayerId) -> Option<Layer> {
        let index = self.layer_index(layer_id)?;
        let removed = self.layers.remove(index);
        for layer in &mut self.layers {
            if layer.parent == Some(layer_id) {
                layer.parent = None;
            }
        }
        Some(removed)
    }

    /// Move a layer to a new paint-order index
    pub fn move_layer(&mut self, layer_id: LayerId, new_index: usize) -> Result<()> {
        let index = self
            .layer_index(layer_id)
            .ok_or(TimelineError::LayerNotFound(layer_id))?;
        let layer = self.layers.remove(index);
        let new_index = new_index.min(self.layers.len());
        self.layers.insert(new_index, layer);
        Ok(())
    }

    /// Parent of a layer, if the reference resolves
    pub fn parent_of(&self, layer: &Layer) -> Option<&Layer> {
        layer.parent.and_then(|id| self.layer(id))
    }

    /// Check that `new_parent` is a valid parent for `child`
    pub fn check_parent(&self, child: LayerId, new_parent: Option<LayerId>) -> Result<()> {
        if self.layer(child).is_none() {
            return Err(TimelineError::LayerNotFound(child));
        }
        let Some(parent) = new_parent else {
            return Ok(());
        };
        if self.layer(parent).is_none() {
            return Err(TimelineError::LayerNotFound(parent));
        }

        let mut current = Some(parent);
        for _ in 0..=self.layers.len() {
            match current {
                Some(id) if id == child => {
                    return Err(CycleError { child, parent }.into());
                }
                Some(id) => current = self.layer(id).and_then(|l| l.parent),
                None => break,
            }
        }
        Ok(())
    }

    /// Value used when a layer has no track for `property`
    pub fn fallback_value(&self, property: &str) -> Option<Value> {
        match property {
            POSITION => Some(Value::Vector2(self.center())),
            SCALE => Some(Value::Vector2(Vec2::splat(100.0))),
            ROTATION => Some(Value::Scalar(0.0)),
            OPACITY | VOLUME => Some(Value::Scalar(100.0)),
            _ => None,
        }
    }

    /// Sample a layer property, falling back to the kind default when the track is missing
    pub fn sample(&self, layer: &Layer, property: &str, time: f64) -> Option<Value> {
        layer
            .sample(property, time)
            .or_else(|| self.fallback_value(property))
    }

    /// Local (parent-relative) transform of a layer
    pub fn local_transform(&self, layer: &Layer, time: f64) -> WorldTransform {
        let position = self
            .sample(layer, POSITION, time)
            .and_then(|v| v.as_vec2())
            .unwrap_or_else(|| self.center());
        let scale = match self.sample(layer, SCALE, time) {
            Some(Value::Vector2(v)) => v,
            Some(Value::Scalar(s)) => Vec2::splat(s),
            _ => Vec2::splat(100.0),
        };
        let rotation = self
            .sample(layer, ROTATION, time)
            .and_then(|v| v.as_scalar())
            .unwrap_or(0.0);
        WorldTransform::from_tracks(position, scale, rotation)
    }

    /// World transform of a layer, composed through its parent chain
    pub fn world_transform(&self, layer_id: LayerId, time: f64) -> Option<WorldTransform> {
        let layer = self.layer(layer_id)?;

        let mut chain = vec![layer];
        let mut current = layer;
        for _ in 0..self.layers.len() {
            match self.parent_of(current) {
                Some(parent) => {
                    chain.push(parent);
                    current = parent;
                }
                None => break,
            }
        }
        if chain.len() > self.layers.len() {
            tracing::warn!("Parent chain of {:?} loops; composing a truncated chain", layer_id);
        }

        Some(chain.iter().rev().fold(WorldTransform::IDENTITY, |parent, layer| {
            parent.compose(&self.local_transform(layer, time))
        }))
    }

    /// Re-parent a layer without moving it on screen at time `now`.
    ///
    /// The local position, rotation and scale curves are shifted as a whole so
    /// that the world transform at `now` is unchanged. A visual layer missing
    /// one of those tracks gets it, holding the corrected value. When the old
    /// or new parent has a zero scale component at `now` only rotation is
    /// corrected.
    pub fn set_parent(&mut self, child: LayerId, new_parent: Option<LayerId>, now: f64) -> Result<()> {
        self.check_parent(child, new_parent)?;

        let (world_before, current, old_parent, is_visual) = {
            let layer = self.layer(child).ok_or(TimelineError::LayerNotFound(child))?;
            let world = self
                .world_transform(child, now)
                .ok_or(TimelineError::LayerNotFound(child))?;
            (world, self.local_transform(layer, now), layer.parent, layer.kind().is_visual())
        };
        let parent_before = self.parent_world_transform(old_parent, now);

        self.layer_mut(child)
            .ok_or(TimelineError::LayerNotFound(child))?
            .parent = new_parent;

        let parent_after = self.parent_world_transform(new_parent, now);
        let solved = if parent_before.is_degenerate() {
            None
        } else {
            parent_after.solve_local(&world_before)
        };

        let rotation_delta = world_before.rotation - parent_after.rotation - current.rotation;
        let (position_delta, scale_ratio) = match solved {
            Some(solved) => (
                solved.position - current.position,
                Vec2::new(
                    ratio(solved.scale.x, current.scale.x),
                    ratio(solved.scale.y, current.scale.y),
                ),
            ),
            None => {
                tracing::warn!(
                    "Zero parent scale while re-parenting {:?}; keeping position and scale",
                    child
                );
                (Vec2::ZERO, Vec2::ONE)
            }
        };

        let missing = |value: Value| is_visual.then_some(value);
        let layer = self.layer_mut(child).ok_or(TimelineError::LayerNotFound(child))?;
        correct_track(
            layer,
            POSITION,
            missing(Value::Vector2(current.position + position_delta)),
            |v| match v {
                Value::Vector2(p) => Value::Vector2(*p + position_delta),
                other => other.clone(),
            },
        );
        correct_track(
            layer,
            ROTATION,
            missing(Value::Scalar(current.rotation + rotation_delta)),
            |v| match v {
                Value::Scalar(r) => Value::Scalar(r + rotation_delta),
                other => other.clone(),
            },
        );
        correct_track(
            layer,
            SCALE,
            missing(Value::Vector2(current.scale_percent().mul_components(scale_ratio))),
            |v| match v {
                Value::Vector2(s) => Value::Vector2(s.mul_components(scale_ratio)),
                Value::Scalar(s) => Value::Scalar(s * scale_ratio.x),
                other => other.clone(),
            },
        );

        tracing::debug!(
            "Re-parented {:?} to {:?} (offset {:?}, rotation {}, scale ratio {:?})",
            child,
            new_parent,
            position_delta,
            rotation_delta,
            scale_ratio
        );
        Ok(())
    }

    fn parent_world_transform(&self, parent: Option<LayerId>, time: f64) -> WorldTransform {
        parent
            .and_then(|id| self.world_transform(id, time))
            .unwrap_or(WorldTransform::IDENTITY)
    }

    /// Explicit structural copy used for history snapshots
    pub fn snapshot(&self) -> Composition {
        Composition {
            id: self.id,
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            duration: self.duration,
            frames_per_second: self.frames_per_second,
            layers: self.layers.iter().map(Layer::snapshot).collect(),
        }
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self::new("Untitled Composition", 1280, 720, 10.0, 30.0)
    }
}

/// Rewrite a transform track, or create it at `missing` when the layer has none
fn correct_track(layer: &mut Layer, property: &str, missing: Option<Value>, f: impl Fn(&Value) -> Value) {
    if let Some(track) = layer.track_mut(property) {
        track.map_values(f);
    } else if let Some(value) = missing {
        layer
            .tracks
            .insert(property.to_string(), transform_track(property, value));
    }
}

/// Multiplicative correction; a degenerate current scale stays untouched
fn ratio(target: f64, current: f64) -> f64 {
    if current.abs() < f64::EPSILON {
        1.0
    } else {
        target / current
    }
}
