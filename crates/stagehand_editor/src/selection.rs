// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe selection state.

use serde::{Deserialize, Serialize};
use stagehand_timeline::{Composition, KeyframeId, LayerId};

/// Address of a keyframe inside the active composition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyframeRef {
    /// Owning layer
    pub layer: LayerId,
    /// Property (track) name
    pub property: String,
    /// Keyframe ID
    pub keyframe: KeyframeId,
}

impl KeyframeRef {
    /// Create a keyframe reference
    pub fn new(layer: LayerId, property: impl Into<String>, keyframe: KeyframeId) -> Self {
        Self {
            layer,
            property: property.into(),
            keyframe,
        }
    }

    /// Whether the referenced keyframe exists in `composition`
    pub fn resolves_in(&self, composition: &Composition) -> bool {
        composition
            .layer(self.layer)
            .and_then(|layer| layer.track(&self.property))
            .is_some_and(|track| track.keyframe(self.keyframe).is_some())
    }
}

/// Keyframe selection state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyframeSelection {
    /// Currently selected keyframes
    pub keys: Vec<KeyframeRef>,
}

impl KeyframeSelection {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a keyframe is selected
    pub fn contains(&self, key: &KeyframeRef) -> bool {
        self.keys.contains(key)
    }

    /// Add a keyframe to the selection (idempotent)
    pub fn add(&mut self, key: KeyframeRef) {
        if !self.contains(&key) {
            self.keys.push(key);
        }
    }

    /// Remove a keyframe from the selection
    pub fn remove(&mut self, key: &KeyframeRef) {
        self.keys.retain(|k| k != key);
    }

    /// Toggle a keyframe in the selection
    pub fn toggle(&mut self, key: KeyframeRef) {
        if self.contains(&key) {
            self.remove(&key);
        } else {
            self.add(key);
        }
    }

    /// Drop keys that no longer exist in `composition`
    pub fn prune(&mut self, composition: &Composition) {
        self.keys.retain(|k| k.resolves_in(composition));
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Check if the selection is empty
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Get the number of selected keyframes
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Iterate over selected keyframes
    pub fn iter(&self) -> impl Iterator<Item = &KeyframeRef> {
        self.keys.iter()
    }
}
