// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-frame evaluation handed to renderers and the audio mixer.

use crate::asset::{AssetId, AssetLibrary};
use crate::composition::Composition;
use crate::layer::{Layer, LayerContent, LayerId, ShapeKind, HEIGHT, OPACITY, TEXT, VOLUME, WIDTH};
use crate::transform::WorldTransform;
use serde::Serialize;

/// Everything needed to draw and mix one instant of a composition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSample {
    /// Sampled time
    pub time: f64,
    /// Active layers, back to front
    pub layers: Vec<LayerSample>,
}

/// One active layer at the sampled time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSample {
    /// Layer ID
    pub layer_id: LayerId,
    /// Layer name
    pub name: String,
    /// World transform; `None` for audio layers
    pub transform: Option<WorldTransform>,
    /// Opacity in percent
    pub opacity: f64,
    /// Kind-specific sampled data
    pub content: SampledContent,
}

/// Kind-specific sampled data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SampledContent {
    /// Image layer
    Image {
        /// Image asset
        source: Option<AssetId>,
        /// Decoded image is available
        ready: bool,
    },
    /// Text layer
    Text {
        /// Current string
        text: String,
        /// Font family
        font: String,
        /// Font size in pixels
        font_size: f64,
    },
    /// Shape layer
    Shape {
        /// Shape type
        shape: ShapeKind,
        /// Fill color
        fill: [u8; 4],
        /// Width in pixels
        width: f64,
        /// Height in pixels
        height: f64,
    },
    /// Sprite layer
    Sprite {
        /// Sprite animation asset
        animation: Option<AssetId>,
        /// Frame to draw; `None` when the animation does not resolve
        frame: Option<u32>,
        /// Decoded sheet is available
        ready: bool,
    },
    /// Audio layer
    Audio {
        /// Audio asset
        asset: Option<AssetId>,
        /// Playback position inside the clip
        offset: f64,
        /// Volume in percent
        volume: f64,
        /// Decoded audio is available
        ready: bool,
    },
}

impl Composition {
    /// Evaluate every layer active at `time`.
    ///
    /// Unresolved assets and unloaded resources are reported, never fatal.
    pub fn evaluate_frame(&self, time: f64, library: &AssetLibrary) -> FrameSample {
        let layers = self
            .layers()
            .iter()
            .rev()
            .filter(|layer| layer.is_active_at(time))
            .map(|layer| self.sample_layer(layer, time, library))
            .collect();

        FrameSample { time, layers }
    }

    fn sample_layer(&self, layer: &Layer, time: f64, library: &AssetLibrary) -> LayerSample {
        let scalar = |property: &str, fallback: f64| {
            self.sample(layer, property, time)
                .and_then(|v| v.as_scalar())
                .unwrap_or(fallback)
        };

        let ready = |id: &Option<AssetId>| id.is_some_and(|id| library.resource(id).is_some());

        let content = match &layer.content {
            LayerContent::Image { source } => SampledContent::Image {
                source: *source,
                ready: ready(source),
            },
            LayerContent::Text { font, font_size, .. } => SampledContent::Text {
                text: layer
                    .sample(TEXT, time)
                    .and_then(|v| v.as_text().map(str::to_string))
                    .unwrap_or_default(),
                font: font.clone(),
                font_size: *font_size,
            },
            LayerContent::Shape { shape, fill } => SampledContent::Shape {
                shape: *shape,
                fill: *fill,
                width: scalar(WIDTH, 0.0),
                height: scalar(HEIGHT, 0.0),
            },
            LayerContent::AnimatedSprite { animation, start_time } => SampledContent::Sprite {
                animation: *animation,
                frame: animation
                    .and_then(|id| library.sprite_animation(id))
                    .and_then(|anim| anim.frame_at(time - start_time)),
                ready: ready(animation),
            },
            LayerContent::Audio { asset, start_time } => SampledContent::Audio {
                asset: *asset,
                offset: (time - start_time).max(0.0),
                volume: scalar(VOLUME, 100.0),
                ready: ready(asset),
            },
        };

        LayerSample {
            layer_id: layer.id,
            name: layer.name.clone(),
            transform: if layer.kind().is_visual() {
                self.world_transform(layer.id, time)
            } else {
                None
            },
            opacity: scalar(OPACITY, 100.0),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{Asset, AssetData, Resource, SpriteAnimation};
    use crate::keyframe::Keyframe;
    use std::sync::Arc;

    #[test]
    fn test_only_active_layers_back_to_front() {
        let mut comp = Composition::new("Main", 320, 240, 4.0, 30.0);
        let bottom = comp.create_layer("Bottom", LayerContent::Image { source: None });
        let top = comp.create_layer("Top", LayerContent::Image { source: None });
        let late = comp.create_layer("Late", LayerContent::Image { source: None });
        comp.layer_mut(late).unwrap().set_trim_points(Some(2.0), None, 1.0 / 30.0);

        let frame = comp.evaluate_frame(1.0, &AssetLibrary::new());
        let ids: Vec<LayerId> = frame.layers.iter().map(|l| l.layer_id).collect();
        assert_eq!(ids, vec![bottom, top]);
    }

    #[test]
    fn test_sprite_frame_and_readiness() {
        let mut library = AssetLibrary::new();
        let walk = library.insert(Asset::new(
            "Walk",
            AssetData::SpriteAnimation(SpriteAnimation {
                sheet: "walk.png".to_string(),
                frame_count: 6,
                frames_per_second: 12.0,
                looping: true,
            }),
        ));

        let mut comp = Composition::new("Main", 320, 240, 4.0, 30.0);
        let sprite = comp.create_layer(
            "Hero",
            LayerContent::AnimatedSprite { animation: Some(walk), start_time: 1.0 },
        );
        let missing = comp.create_layer(
            "Ghost",
            LayerContent::AnimatedSprite { animation: Some(AssetId::new()), start_time: 0.0 },
        );

        let frame = comp.evaluate_frame(1.25, &library);
        let find = |id| frame.layers.iter().find(|l| l.layer_id == id).unwrap().content.clone();
        assert_eq!(
            find(sprite),
            SampledContent::Sprite { animation: Some(walk), frame: Some(3), ready: false }
        );
        assert!(matches!(find(missing), SampledContent::Sprite { frame: None, .. }));

        library.attach_resource(walk, Arc::new(Resource::SpriteSheet { frame_width: 16, frame_height: 16 }));
        let frame = comp.evaluate_frame(1.25, &library);
        assert!(frame
            .layers
            .iter()
            .any(|l| matches!(l.content, SampledContent::Sprite { ready: true, .. })));
    }

    #[test]
    fn test_audio_has_no_transform() {
        let mut comp = Composition::new("Main", 320, 240, 4.0, 30.0);
        let music = comp.create_layer("Music", LayerContent::Audio { asset: None, start_time: 0.5 });
        comp.layer_mut(music)
            .unwrap()
            .track_mut(VOLUME)
            .unwrap()
            .add_keyframe(Keyframe::new(0.0, 40.0))
            .unwrap();

        let frame = comp.evaluate_frame(2.0, &AssetLibrary::new());
        let sample = &frame.layers[0];
        assert!(sample.transform.is_none());
        assert_eq!(
            sample.content,
            SampledContent::Audio { asset: None, offset: 1.5, volume: 40.0, ready: false }
        );
    }
}
