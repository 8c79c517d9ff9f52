// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe timeline engine for the Stagehand event editor.
//!
//! This crate provides the animation core shared by the editor and the
//! playback tester:
//! - Typed property values and keyframe tracks
//! - Track sampling with hold steps and easing
//! - Layers with time windows and parent links
//! - World transform composition through the layer hierarchy
//! - Re-parenting that keeps layers visually in place
//! - Per-frame evaluation for renderers
//!
//! ## Architecture
//!
//! Everything here is plain data plus pure functions of time. Editing
//! sessions, history and persistence live in `stagehand_editor`.

pub mod asset;
pub mod composition;
pub mod error;
pub mod evaluator;
pub mod frame;
pub mod keyframe;
pub mod layer;
pub mod track;
pub mod transform;
pub mod value;

pub use asset::{
    Asset, AssetData, AssetId, AssetLibrary, AudioAsset, ImageAsset, Resource, SpriteAnimation,
};
pub use composition::Composition;
pub use error::{CycleError, Result, TimelineError};
pub use frame::{FrameSample, LayerSample, SampledContent};
pub use keyframe::{Interpolation, InterpolationMode, Keyframe, KeyframeId};
pub use layer::{Layer, LayerContent, LayerId, LayerKind, ShapeKind};
pub use track::Track;
pub use transform::WorldTransform;
pub use value::{Value, ValueKind, Vec2};
