// SPDX-License-Identifier: MIT OR Apache-2.0
//! Asset library: images, audio, sprite animations and compositions by ID.
//!
//! Descriptors are plain data. Decoded media arrive later as [`Resource`]
//! handles attached by the loader; they are never serialized and never
//! copied into history snapshots.

use crate::composition::Composition;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub Uuid);

impl AssetId {
    /// Create a new random asset ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

/// Image file descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Source path, relative to the project
    pub path: String,
}

/// Audio file descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioAsset {
    /// Source path, relative to the project
    pub path: String,
}

/// Sprite-sheet animation descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteAnimation {
    /// Sprite sheet path, relative to the project
    pub sheet: String,
    /// Number of frames in the animation
    pub frame_count: u32,
    /// Playback rate
    pub frames_per_second: f64,
    /// Restart after the last frame
    pub looping: bool,
}

impl SpriteAnimation {
    /// Frame index shown `local_time` seconds after the animation starts.
    ///
    /// `None` for an empty animation.
    pub fn frame_at(&self, local_time: f64) -> Option<u32> {
        if self.frame_count == 0 {
            return None;
        }
        if local_time <= 0.0 || self.frames_per_second <= 0.0 {
            return Some(0);
        }
        let frame = (local_time * self.frames_per_second).floor() as u64;
        let count = u64::from(self.frame_count);
        let frame = if self.looping { frame % count } else { frame.min(count - 1) };
        u32::try_from(frame).ok()
    }
}

/// Descriptor payload of an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssetData {
    /// Still image
    Image(ImageAsset),
    /// Audio clip
    Audio(AudioAsset),
    /// Sprite-sheet animation
    SpriteAnimation(SpriteAnimation),
    /// Composition (editable timeline)
    Composition(Composition),
}

/// Decoded media attached after loading
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// Decoded image
    Image {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// Decoded audio
    Audio {
        /// Clip length in seconds
        duration: f64,
    },
    /// Decoded sprite sheet
    SpriteSheet {
        /// Single frame width in pixels
        frame_width: u32,
        /// Single frame height in pixels
        frame_height: u32,
    },
}

/// An entry in the asset library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Unique asset ID
    pub id: AssetId,
    /// Display name
    pub name: String,
    /// Descriptor
    pub data: AssetData,
    /// Decoded media, once loaded
    #[serde(skip)]
    pub resource: Option<Arc<Resource>>,
}

impl Asset {
    /// Create an asset descriptor without a loaded resource
    pub fn new(name: impl Into<String>, data: AssetData) -> Self {
        Self {
            id: AssetId::new(),
            name: name.into(),
            data,
            resource: None,
        }
    }

    /// Explicit structural copy; the resource handle is left behind
    pub fn snapshot(&self) -> Asset {
        let data = match &self.data {
            AssetData::Composition(comp) => AssetData::Composition(comp.snapshot()),
            other => other.clone(),
        };
        Asset {
            id: self.id,
            name: self.name.clone(),
            data,
            resource: None,
        }
    }
}

/// All assets of a project, in insertion order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetLibrary {
    assets: IndexMap<AssetId, Asset>,
}

impl AssetLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset
    pub fn insert(&mut self, asset: Asset) -> AssetId {
        let id = asset.id;
        self.assets.insert(id, asset);
        id
    }

    /// Add a composition; its ID doubles as the asset ID
    pub fn add_composition(&mut self, composition: Composition) -> AssetId {
        let id = composition.id;
        self.assets.insert(
            id,
            Asset {
                id,
                name: composition.name.clone(),
                data: AssetData::Composition(composition),
                resource: None,
            },
        );
        id
    }

    /// Remove an asset
    pub fn remove(&mut self, id: AssetId) -> Option<Asset> {
        self.assets.shift_remove(&id)
    }

    /// Get an asset
    pub fn get(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(&id)
    }

    /// Get all assets
    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    /// Get asset count
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the library has no assets
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Get a composition
    pub fn composition(&self, id: AssetId) -> Option<&Composition> {
        match self.assets.get(&id).map(|a| &a.data) {
            Some(AssetData::Composition(comp)) => Some(comp),
            _ => None,
        }
    }

    /// Get a mutable composition
    pub fn composition_mut(&mut self, id: AssetId) -> Option<&mut Composition> {
        match self.assets.get_mut(&id).map(|a| &mut a.data) {
            Some(AssetData::Composition(comp)) => Some(comp),
            _ => None,
        }
    }

    /// Get all compositions
    pub fn compositions(&self) -> impl Iterator<Item = &Composition> {
        self.assets.values().filter_map(|a| match &a.data {
            AssetData::Composition(comp) => Some(comp),
            _ => None,
        })
    }

    /// Get a sprite animation descriptor
    pub fn sprite_animation(&self, id: AssetId) -> Option<&SpriteAnimation> {
        match self.assets.get(&id).map(|a| &a.data) {
            Some(AssetData::SpriteAnimation(anim)) => Some(anim),
            _ => None,
        }
    }

    /// Attach a decoded resource; returns `false` for an unknown asset
    pub fn attach_resource(&mut self, id: AssetId, resource: Arc<Resource>) -> bool {
        match self.assets.get_mut(&id) {
            Some(asset) => {
                asset.resource = Some(resource);
                true
            }
            None => false,
        }
    }

    /// Decoded resource of an asset, if it is loaded
    pub fn resource(&self, id: AssetId) -> Option<&Arc<Resource>> {
        self.assets.get(&id).and_then(|a| a.resource.as_ref())
    }

    /// Explicit structural copy without resource handles
    pub fn snapshot(&self) -> AssetLibrary {
        AssetLibrary {
            assets: self
                .assets
                .iter()
                .map(|(id, asset)| (*id, asset.snapshot()))
                .collect(),
        }
    }

    /// Re-attach handles from `other` to assets with the same ID
    pub fn reattach_resources(&mut self, other: &AssetLibrary) {
        for (id, asset) in &mut self.assets {
            if let Some(resource) = other.resource(*id) {
                asset.resource = Some(Arc::clone(resource));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_cycle(looping: bool) -> SpriteAnimation {
        SpriteAnimation {
            sheet: "sprites/walk.png".to_string(),
            frame_count: 4,
            frames_per_second: 8.0,
            looping,
        }
    }

    #[test]
    fn test_sprite_frames() {
        let anim = walk_cycle(true);
        assert_eq!(anim.frame_at(-1.0), Some(0));
        assert_eq!(anim.frame_at(0.13), Some(1));
        assert_eq!(anim.frame_at(0.5), Some(0));

        let once = walk_cycle(false);
        assert_eq!(once.frame_at(10.0), Some(3));
    }

    #[test]
    fn test_snapshot_drops_and_reattach_restores_resources() {
        let mut library = AssetLibrary::new();
        let image = library.insert(Asset::new(
            "Logo",
            AssetData::Image(ImageAsset { path: "img/logo.png".to_string() }),
        ));
        assert!(library.attach_resource(image, Arc::new(Resource::Image { width: 64, height: 32 })));

        let mut copy = library.snapshot();
        assert!(copy.resource(image).is_none());

        copy.reattach_resources(&library);
        assert_eq!(
            copy.resource(image).map(|r| r.as_ref()),
            Some(&Resource::Image { width: 64, height: 32 })
        );
    }

    #[test]
    fn test_remove_keeps_order_of_the_rest() {
        let mut library = AssetLibrary::new();
        let ids: Vec<AssetId> = ["a.png", "b.png", "c.png"]
            .iter()
            .map(|path| {
                library.insert(Asset::new(
                    *path,
                    AssetData::Image(ImageAsset { path: path.to_string() }),
                ))
            })
            .collect();

        let removed = library.remove(ids[1]).unwrap();
        assert_eq!(removed.name, "b.png");
        assert!(library.get(ids[1]).is_none());
        assert!(library.remove(ids[1]).is_none());

        let names: Vec<&str> = library.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "c.png"]);
    }

    #[test]
    fn test_attach_unknown_asset() {
        let mut library = AssetLibrary::new();
        assert!(!library.attach_resource(AssetId::new(), Arc::new(Resource::Audio { duration: 1.0 })));
    }
}
