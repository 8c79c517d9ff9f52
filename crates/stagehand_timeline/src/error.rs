// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for timeline editing.

use crate::keyframe::KeyframeId;
use crate::layer::LayerId;
use crate::value::ValueKind;
use thiserror::Error;

/// Error when a parent assignment would close a loop in the layer hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parenting {child:?} to {parent:?} would create a cycle")]
pub struct CycleError {
    /// Layer being re-parented
    pub child: LayerId,
    /// Proposed parent
    pub parent: LayerId,
}

/// Errors raised by structural edits on compositions, layers and tracks
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    /// Parent assignment rejected
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// Layer not found in the composition
    #[error("Layer not found: {0:?}")]
    LayerNotFound(LayerId),

    /// Layer has no track for the property
    #[error("Layer {layer:?} has no '{property}' track")]
    TrackNotFound {
        /// Layer that was addressed
        layer: LayerId,
        /// Requested property name
        property: String,
    },

    /// Keyframe not found on the track
    #[error("Keyframe not found: {0:?}")]
    KeyframeNotFound(KeyframeId),

    /// Value kind does not match the track kind
    #[error("Expected a {expected} value, got {found}")]
    KindMismatch {
        /// Kind of the track
        expected: ValueKind,
        /// Kind of the offered value
        found: ValueKind,
    },
}

/// Result type for timeline edits
pub type Result<T> = std::result::Result<T, TimelineError>;
