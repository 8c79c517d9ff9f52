// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layers: time-bounded visual or audio elements with animatable properties.

use crate::asset::AssetId;
use crate::keyframe::{Keyframe, KeyframeId};
use crate::track::Track;
use crate::value::{Value, Vec2};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Position track name (Vector2, composition pixels)
pub const POSITION: &str = "position";
/// Scale track name (Vector2, percent)
pub const SCALE: &str = "scale";
/// Rotation track name (Scalar, degrees)
pub const ROTATION: &str = "rotation";
/// Opacity track name (Scalar, 0..=100)
pub const OPACITY: &str = "opacity";
/// Text content track name (Text)
pub const TEXT: &str = "text";
/// Shape width track name
pub const WIDTH: &str = "width";
/// Shape height track name
pub const HEIGHT: &str = "height";
/// Audio volume track name (Scalar, 0..=100)
pub const VOLUME: &str = "volume";

/// Unique identifier for a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub Uuid);

impl LayerId {
    /// Create a new random layer ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind of layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    /// Still image
    Image,
    /// Text block
    Text,
    /// Vector shape
    Shape,
    /// Sprite-sheet animation
    AnimatedSprite,
    /// Audio clip
    Audio,
}

impl LayerKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Text => "Text",
            Self::Shape => "Shape",
            Self::AnimatedSprite => "Animated Sprite",
            Self::Audio => "Audio",
        }
    }

    /// Whether the layer is painted (has a transform)
    pub fn is_visual(&self) -> bool {
        !matches!(self, Self::Audio)
    }
}

/// Primitive shape type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShapeKind {
    /// Axis-aligned rectangle
    #[default]
    Rectangle,
    /// Ellipse inscribed in the rectangle
    Ellipse,
}

/// Kind-specific layer payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerContent {
    /// Image referencing an image asset
    Image {
        /// Image asset
        source: Option<AssetId>,
    },
    /// Text block
    Text {
        /// Initial string; the animated string lives in the `text` track
        #[serde(default)]
        text: String,
        /// Font family
        font: String,
        /// Font size in pixels
        font_size: f64,
    },
    /// Filled shape
    Shape {
        /// Shape type
        shape: ShapeKind,
        /// Fill color (RGBA)
        fill: [u8; 4],
    },
    /// Sprite-sheet animation
    AnimatedSprite {
        /// Sprite animation asset
        animation: Option<AssetId>,
        /// Composition time of the animation's first frame
        start_time: f64,
    },
    /// Audio clip
    Audio {
        /// Audio asset
        asset: Option<AssetId>,
        /// Composition time the clip starts playing
        start_time: f64,
    },
}

impl LayerContent {
    /// Kind tag of this payload
    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Image { .. } => LayerKind::Image,
            Self::Text { .. } => LayerKind::Text,
            Self::Shape { .. } => LayerKind::Shape,
            Self::AnimatedSprite { .. } => LayerKind::AnimatedSprite,
            Self::Audio { .. } => LayerKind::Audio,
        }
    }

    /// Start time of time-based media
    pub fn start_time(&self) -> Option<f64> {
        match self {
            Self::AnimatedSprite { start_time, .. } | Self::Audio { start_time, .. } => Some(*start_time),
            _ => None,
        }
    }

    fn start_time_mut(&mut self) -> Option<&mut f64> {
        match self {
            Self::AnimatedSprite { start_time, .. } | Self::Audio { start_time, .. } => Some(start_time),
            _ => None,
        }
    }
}

/// A layer in a composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique layer ID
    pub id: LayerId,
    /// Display name
    pub name: String,
    /// Kind-specific payload
    pub content: LayerContent,
    /// Parent layer in the same composition
    #[serde(default)]
    pub parent: Option<LayerId>,
    /// Start of the visible/audible window (seconds)
    pub in_point: f64,
    /// End of the visible/audible window (seconds)
    pub out_point: f64,
    /// Animatable properties by name
    pub tracks: IndexMap<String, Track>,
}

impl Layer {
    /// Create a layer with the default tracks for its kind.
    ///
    /// `center` becomes the default position, `duration` the out point.
    pub fn new(name: impl Into<String>, content: LayerContent, center: Vec2, duration: f64) -> Self {
        let tracks = default_tracks(&content, center);
        Self {
            id: LayerId::new(),
            name: name.into(),
            content,
            parent: None,
            in_point: 0.0,
            out_point: duration.max(0.0),
            tracks,
        }
    }

    /// Kind of this layer
    pub fn kind(&self) -> LayerKind {
        self.content.kind()
    }

    /// Get a track by property name
    pub fn track(&self, property: &str) -> Option<&Track> {
        self.tracks.get(property)
    }

    /// Get a mutable track by property name
    pub fn track_mut(&mut self, property: &str) -> Option<&mut Track> {
        self.tracks.get_mut(property)
    }

    /// Sample a property, `None` if the layer has no such track
    pub fn sample(&self, property: &str, time: f64) -> Option<Value> {
        self.track(property).map(|track| track.sample(time))
    }

    /// Whether `time` falls inside the layer's window
    pub fn is_active_at(&self, time: f64) -> bool {
        self.in_point <= time && time <= self.out_point
    }

    /// Find a keyframe on any track, with the owning property name
    pub fn find_keyframe(&self, keyframe_id: KeyframeId) -> Option<(&str, &Keyframe)> {
        self.tracks.iter().find_map(|(name, track)| {
            track.keyframe(keyframe_id).map(|kf| (name.as_str(), kf))
        })
    }

    /// Set trim points, keeping `in_point <= out_point`.
    ///
    /// Crossing the opposite point pushes it by `min_frame`.
    pub fn set_trim_points(&mut self, in_point: Option<f64>, out_point: Option<f64>, min_frame: f64) {
        if let Some(in_point) = in_point {
            self.in_point = in_point.max(0.0);
            if self.in_point > self.out_point {
                self.out_point = self.in_point + min_frame;
            }
        }
        if let Some(out_point) = out_point {
            self.out_point = out_point.max(0.0);
            if self.out_point < self.in_point {
                self.in_point = (self.out_point - min_frame).max(0.0);
            }
        }
    }

    /// Translate the window, media start time and every keyframe by `delta`
    pub fn shift_window(&mut self, delta: f64) {
        self.in_point += delta;
        self.out_point += delta;
        if let Some(start) = self.content.start_time_mut() {
            *start += delta;
        }
        for track in self.tracks.values_mut() {
            track.offset_time(delta);
        }
    }

    /// Explicit structural copy used for history snapshots
    pub fn snapshot(&self) -> Layer {
        Layer {
            id: self.id,
            name: self.name.clone(),
            content: self.content.clone(),
            parent: self.parent,
            in_point: self.in_point,
            out_point: self.out_point,
            tracks: self
                .tracks
                .iter()
                .map(|(name, track)| (name.clone(), track.snapshot()))
                .collect(),
        }
    }
}

/// Track for a transform property (position, scale or rotation) starting at `default_value`
pub(crate) fn transform_track(property: &str, default_value: Value) -> Track {
    match property {
        POSITION => Track::new("Position", default_value),
        SCALE => Track::new("Scale", default_value).with_linked(true),
        ROTATION => Track::new("Rotation", default_value),
        other => Track::new(other, default_value),
    }
}

fn default_tracks(content: &LayerContent, center: Vec2) -> IndexMap<String, Track> {
    let mut tracks = IndexMap::new();

    if content.kind().is_visual() {
        tracks.insert(POSITION.to_string(), transform_track(POSITION, Value::Vector2(center)));
        tracks.insert(SCALE.to_string(), transform_track(SCALE, Value::Vector2(Vec2::splat(100.0))));
        tracks.insert(ROTATION.to_string(), transform_track(ROTATION, Value::Scalar(0.0)));
        tracks.insert(
            OPACITY.to_string(),
            Track::new("Opacity", 100.0).with_bounds(Some(0.0), Some(100.0)),
        );
    }

    match content {
        LayerContent::Text { text, .. } => {
            tracks.insert(TEXT.to_string(), Track::new("Text", text.as_str()));
        }
        LayerContent::Shape { .. } => {
            tracks.insert(WIDTH.to_string(), Track::new("Width", 100.0).with_bounds(Some(0.0), None));
            tracks.insert(HEIGHT.to_string(), Track::new("Height", 100.0).with_bounds(Some(0.0), None));
        }
        LayerContent::Audio { .. } => {
            tracks.insert(
                VOLUME.to_string(),
                Track::new("Volume", 100.0).with_bounds(Some(0.0), Some(100.0)),
            );
        }
        LayerContent::Image { .. } | LayerContent::AnimatedSprite { .. } => {}
    }

    tracks
}
