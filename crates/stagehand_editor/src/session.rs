// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing session.
//!
//! An [`EditorSession`] owns the asset library, the active composition, the
//! play-head, the keyframe selection and the undo history. Every mutating
//! method validates first, then records a history snapshot, then mutates;
//! rejected edits leave both the state and the history untouched.

use crate::error::{EditorError, Result};
use crate::history::{History, Snapshot};
use crate::project::{EditorSettings, ProjectFile, PROJECT_FORMAT_VERSION};
use crate::selection::{KeyframeRef, KeyframeSelection};
use stagehand_timeline::{
    Asset, AssetData, AssetId, AssetLibrary, Composition, FrameSample, InterpolationMode, KeyframeId, Layer,
    LayerContent, LayerId, Resource, TimelineError, Value, WorldTransform,
};
use std::sync::Arc;

/// Main editing session
#[derive(Debug)]
pub struct EditorSession {
    /// All project assets
    library: AssetLibrary,
    /// Composition being edited
    active: AssetId,
    /// Current sampling time
    play_head: f64,
    /// Selected keyframes in the active composition
    selection: KeyframeSelection,
    /// Undo/redo history
    history: History,
    /// Editor settings
    settings: EditorSettings,
}

impl EditorSession {
    /// Create a session with one empty composition
    pub fn new(settings: EditorSettings) -> Self {
        let mut library = AssetLibrary::new();
        let active = library.add_composition(settings.composition.create("Main"));
        Self::with_library(library, active, settings)
    }

    /// Create a session over an existing library.
    ///
    /// An `active` ID that does not name a composition falls back to the
    /// first composition, or to a new empty one.
    pub fn with_library(mut library: AssetLibrary, active: AssetId, settings: EditorSettings) -> Self {
        let active = match resolve_active(&library, active) {
            Some(id) => id,
            None => {
                tracing::warn!("Library has no compositions, creating one");
                library.add_composition(settings.composition.create("Main"))
            }
        };

        Self {
            library,
            active,
            play_head: 0.0,
            selection: KeyframeSelection::new(),
            history: History::with_max_depth(settings.history_capacity),
            settings,
        }
    }

    /// Open a loaded project
    pub fn from_project(project: ProjectFile, settings: EditorSettings) -> Self {
        let mut session = Self::with_library(project.library, project.active, settings);
        session.set_play_head(project.play_head);
        session
    }

    /// Capture the session as a project file
    pub fn to_project(&self) -> ProjectFile {
        ProjectFile {
            version: PROJECT_FORMAT_VERSION,
            active: self.active,
            play_head: self.play_head,
            library: self.library.snapshot(),
        }
    }

    /// Get the asset library
    pub fn library(&self) -> &AssetLibrary {
        &self.library
    }

    /// Get the editor settings
    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Get the undo history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// ID of the composition being edited
    pub fn active_id(&self) -> AssetId {
        self.active
    }

    /// Composition being edited
    pub fn active_composition(&self) -> Result<&Composition> {
        self.library
            .composition(self.active)
            .ok_or(EditorError::CompositionNotFound(self.active))
    }

    fn active_composition_mut(&mut self) -> Result<&mut Composition> {
        let active = self.active;
        self.library
            .composition_mut(active)
            .ok_or(EditorError::CompositionNotFound(active))
    }

    /// Switch the composition being edited (not an undoable edit)
    pub fn set_active_composition(&mut self, id: AssetId) -> Result<()> {
        if self.library.composition(id).is_none() {
            return Err(EditorError::CompositionNotFound(id));
        }
        self.active = id;
        self.selection.clear();
        self.play_head = 0.0;
        tracing::info!("Switched to composition {:?}", id);
        Ok(())
    }

    /// Current play-head time
    pub fn play_head(&self) -> f64 {
        self.play_head
    }

    /// Move the play-head, snapped to the frame grid and kept inside the composition
    pub fn set_play_head(&mut self, time: f64) {
        if let Ok(comp) = self.active_composition() {
            self.play_head = comp.snap_time(time.clamp(0.0, comp.duration));
        }
    }

    /// Get the keyframe selection
    pub fn selection(&self) -> &KeyframeSelection {
        &self.selection
    }

    /// Get the mutable keyframe selection
    pub fn selection_mut(&mut self) -> &mut KeyframeSelection {
        &mut self.selection
    }

    /// Attach decoded media to an asset (not an undoable edit)
    pub fn attach_resource(&mut self, id: AssetId, resource: Arc<Resource>) -> bool {
        self.library.attach_resource(id, resource)
    }

    /// Evaluate the active composition at the play-head
    pub fn frame(&self) -> Result<FrameSample> {
        Ok(self.active_composition()?.evaluate_frame(self.play_head, &self.library))
    }

    /// World transform of a layer at the play-head
    pub fn world_transform(&self, layer: LayerId) -> Result<WorldTransform> {
        self.active_composition()?
            .world_transform(layer, self.play_head)
            .ok_or_else(|| TimelineError::LayerNotFound(layer).into())
    }

    /// Record the current state before an edit
    pub fn push_history(&mut self, description: &str) {
        let snapshot = Snapshot::capture(description, &self.library, self.active, self.play_head);
        self.history.push(snapshot);
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Restore the state before the last edit
    pub fn undo(&mut self) -> Result<()> {
        let current = Snapshot::capture("", &self.library, self.active, self.play_head);
        let snapshot = self.history.undo(current)?;
        tracing::info!("Undo: {}", snapshot.description);
        self.restore(snapshot);
        Ok(())
    }

    /// Re-apply the last undone edit
    pub fn redo(&mut self) -> Result<()> {
        let current = Snapshot::capture("", &self.library, self.active, self.play_head);
        let snapshot = self.history.redo(current)?;
        tracing::info!("Redo: {}", snapshot.description);
        self.restore(snapshot);
        Ok(())
    }

    /// Swap in a snapshot and rebuild everything derived from the live state
    fn restore(&mut self, snapshot: Snapshot) {
        let mut library = snapshot.library;
        library.reattach_resources(&self.library);
        self.library = library;

        self.active = match resolve_active(&self.library, snapshot.active) {
            Some(id) => id,
            None => {
                tracing::warn!("Snapshot has no compositions, creating one");
                self.library
                    .add_composition(self.settings.composition.create("Main"))
            }
        };
        self.play_head = snapshot.play_head;

        if let Some(comp) = self.library.composition(self.active) {
            self.selection.prune(comp);
        }
    }

    // ------------------------------------------------------------------
    // Compositions and layers
    // ------------------------------------------------------------------

    /// Add an empty composition using the settings defaults
    pub fn add_composition(&mut self, name: &str) -> AssetId {
        self.push_history(&format!("Add composition {name}"));
        let id = self
            .library
            .add_composition(self.settings.composition.create(name));
        tracing::info!("Added composition {:?} ({})", id, name);
        id
    }

    /// Register a media asset descriptor
    pub fn import_asset(&mut self, name: &str, data: AssetData) -> AssetId {
        self.push_history(&format!("Import {name}"));
        let id = self.library.insert(Asset::new(name, data));
        tracing::info!("Imported asset {:?} ({})", id, name);
        id
    }

    /// Add a layer on top of the active composition
    pub fn add_layer(&mut self, name: &str, content: LayerContent) -> Result<LayerId> {
        self.active_composition()?;
        self.push_history(&format!("Add layer {name}"));
        let id = self.active_composition_mut()?.create_layer(name, content);
        tracing::info!("Added layer {:?} ({})", id, name);
        Ok(id)
    }

    /// Remove a layer; its children become root layers
    pub fn remove_layer(&mut self, layer: LayerId) -> Result<Layer> {
        self.require_layer(layer)?;
        self.push_history("Remove layer");
        let removed = self
            .active_composition_mut()?
            .remove_layer(layer)
            .ok_or(TimelineError::LayerNotFound(layer))?;
        self.selection.keys.retain(|k| k.layer != layer);
        tracing::info!("Removed layer {:?} ({})", layer, removed.name);
        Ok(removed)
    }

    /// Move a layer to a new paint-order index (0 = topmost)
    pub fn move_layer(&mut self, layer: LayerId, new_index: usize) -> Result<()> {
        self.require_layer(layer)?;
        self.push_history("Reorder layer");
        self.active_composition_mut()?.move_layer(layer, new_index)?;
        Ok(())
    }

    /// Rename a layer
    pub fn rename_layer(&mut self, layer: LayerId, name: &str) -> Result<()> {
        let old = self.require_layer(layer)?.name.clone();
        if old == name {
            return Ok(());
        }
        self.push_history(&format!("Rename {old} to {name}"));
        self.layer_mut(layer)?.name = name.to_string();
        Ok(())
    }

    /// Assign a new parent while keeping the layer in place at the play-head
    pub fn set_parent(&mut self, layer: LayerId, parent: Option<LayerId>) -> Result<()> {
        let comp = self.active_composition()?;
        if let Err(err) = comp.check_parent(layer, parent) {
            tracing::warn!("Rejected parent change for {:?}: {}", layer, err);
            return Err(err.into());
        }
        if comp.layer(layer).is_some_and(|l| l.parent == parent) {
            return Ok(());
        }

        self.push_history("Set parent");
        let now = self.play_head;
        self.active_composition_mut()?.set_parent(layer, parent, now)?;
        tracing::info!("Parented {:?} to {:?}", layer, parent);
        Ok(())
    }

    /// Set the layer window; crossing points push the other by one frame
    pub fn set_trim_points(&mut self, layer: LayerId, in_point: Option<f64>, out_point: Option<f64>) -> Result<()> {
        self.require_layer(layer)?;
        self.push_history("Trim layer");
        let comp = self.active_composition_mut()?;
        let in_point = in_point.map(|t| comp.snap_time(t));
        let out_point = out_point.map(|t| comp.snap_time(t));
        let frame = comp.frame_duration();
        comp.layer_mut(layer)
            .ok_or(TimelineError::LayerNotFound(layer))?
            .set_trim_points(in_point, out_point, frame);
        Ok(())
    }

    /// Move the whole layer so it starts at `new_in_point`
    pub fn shift_layer_window(&mut self, layer: LayerId, new_in_point: f64) -> Result<()> {
        let current = self.require_layer(layer)?.in_point;
        self.shift_layer(layer, current, new_in_point)
    }

    /// Move the whole layer so it ends at `new_out_point`
    pub fn shift_layer_out(&mut self, layer: LayerId, new_out_point: f64) -> Result<()> {
        let current = self.require_layer(layer)?.out_point;
        self.shift_layer(layer, current, new_out_point)
    }

    fn shift_layer(&mut self, layer: LayerId, from: f64, to: f64) -> Result<()> {
        self.push_history("Move layer in time");
        let comp = self.active_composition_mut()?;
        let delta = comp.snap_time(to) - from;
        comp.layer_mut(layer)
            .ok_or(TimelineError::LayerNotFound(layer))?
            .shift_window(delta);
        tracing::debug!("Shifted layer {:?} by {}s", layer, delta);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Keyframes
    // ------------------------------------------------------------------

    /// Insert or overwrite the keyframe at the snapped `time`
    pub fn add_or_update_keyframe(
        &mut self,
        layer: LayerId,
        property: &str,
        time: f64,
        value: impl Into<Value>,
    ) -> Result<KeyframeId> {
        let value = value.into();
        self.require_track(layer, property)?.check_kind(&value)?;

        self.push_history(&format!("Set {property} keyframe"));
        let comp = self.active_composition_mut()?;
        let time = comp.snap_time(time);
        let tolerance = comp.subframe_tolerance();
        let id = track_mut(comp, layer, property)?.set_keyframe_at(time, value, tolerance)?;
        tracing::debug!("Keyed {} of {:?} at {}s", property, layer, time);
        Ok(id)
    }

    /// Key the property's current value at the play-head
    pub fn add_keyframe_at_play_head(&mut self, layer: LayerId, property: &str) -> Result<KeyframeId> {
        let value = self.require_track(layer, property)?.sample(self.play_head);
        self.add_or_update_keyframe(layer, property, self.play_head, value)
    }

    /// Remove keyframes; unknown references are skipped. Returns the removed count.
    pub fn delete_keyframes(&mut self, keys: &[KeyframeRef]) -> Result<usize> {
        let present: Vec<&KeyframeRef> = {
            let comp = self.active_composition()?;
            keys.iter().filter(|k| k.resolves_in(comp)).collect()
        };
        if present.is_empty() {
            return Ok(0);
        }

        self.push_history("Delete keyframes");
        let active = self.active;
        let comp = self
            .library
            .composition_mut(active)
            .ok_or(EditorError::CompositionNotFound(active))?;
        let mut removed = 0;
        for key in &present {
            if track_mut(comp, key.layer, &key.property)?
                .remove_keyframe(key.keyframe)
                .is_some()
            {
                removed += 1;
            }
        }
        self.selection.keys.retain(|k| !keys.contains(k));
        tracing::debug!("Deleted {} keyframes", removed);
        Ok(removed)
    }

    /// Remove every selected keyframe
    pub fn delete_selected_keyframes(&mut self) -> Result<usize> {
        let keys = self.selection.keys.clone();
        self.delete_keyframes(&keys)
    }

    /// Move a keyframe to a new (snapped, non-negative) time
    pub fn move_keyframe(&mut self, key: &KeyframeRef, new_time: f64) -> Result<()> {
        self.require_keyframe(key)?;
        self.push_history("Move keyframe");
        let comp = self.active_composition_mut()?;
        let time = comp.snap_time(new_time.max(0.0));
        let tolerance = comp.subframe_tolerance();
        track_mut(comp, key.layer, &key.property)?.move_keyframe(key.keyframe, time, tolerance)?;
        if let Some(comp) = self.library.composition(self.active) {
            self.selection.prune(comp);
        }
        Ok(())
    }

    /// Switch a keyframe between linear and hold
    pub fn set_keyframe_interpolation(&mut self, key: &KeyframeRef, mode: InterpolationMode) -> Result<()> {
        self.require_keyframe(key)?;
        self.push_history("Set interpolation");
        let comp = self.active_composition_mut()?;
        track_mut(comp, key.layer, &key.property)?.set_interpolation(key.keyframe, mode)?;
        Ok(())
    }

    /// Set the ease flags of a keyframe
    pub fn set_keyframe_easing(&mut self, key: &KeyframeRef, ease_in: bool, ease_out: bool) -> Result<()> {
        self.require_keyframe(key)?;
        self.push_history("Set easing");
        let comp = self.active_composition_mut()?;
        track_mut(comp, key.layer, &key.property)?.set_easing(key.keyframe, ease_in, ease_out)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Validation helpers
    // ------------------------------------------------------------------

    fn require_layer(&self, layer: LayerId) -> Result<&Layer> {
        self.active_composition()?
            .layer(layer)
            .ok_or_else(|| TimelineError::LayerNotFound(layer).into())
    }

    fn require_track(&self, layer: LayerId, property: &str) -> Result<&stagehand_timeline::Track> {
        self.require_layer(layer)?.track(property).ok_or_else(|| {
            TimelineError::TrackNotFound {
                layer,
                property: property.to_string(),
            }
            .into()
        })
    }

    fn require_keyframe(&self, key: &KeyframeRef) -> Result<()> {
        self.require_track(key.layer, &key.property)?
            .keyframe(key.keyframe)
            .map(|_| ())
            .ok_or_else(|| TimelineError::KeyframeNotFound(key.keyframe).into())
    }

    fn layer_mut(&mut self, layer: LayerId) -> Result<&mut Layer> {
        self.active_composition_mut()?
            .layer_mut(layer)
            .ok_or_else(|| TimelineError::LayerNotFound(layer).into())
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

fn resolve_active(library: &AssetLibrary, active: AssetId) -> Option<AssetId> {
    if library.composition(active).is_some() {
        Some(active)
    } else {
        library.compositions().next().map(|c| c.id)
    }
}

fn track_mut<'a>(
    comp: &'a mut Composition,
    layer: LayerId,
    property: &str,
) -> std::result::Result<&'a mut stagehand_timeline::Track, TimelineError> {
    comp.layer_mut(layer)
        .ok_or(TimelineError::LayerNotFound(layer))?
        .track_mut(property)
        .ok_or_else(|| TimelineError::TrackNotFound {
            layer,
            property: property.to_string(),
        })
}
