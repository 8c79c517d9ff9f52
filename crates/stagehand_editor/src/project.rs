// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor settings and project files.
//!
//! Settings are stored as RON next to the user's projects. Projects are
//! plain JSON trees: the asset library, the active composition and the
//! play-head. Decoded media are never written; loaders re-resolve them from
//! the stored asset paths.

use crate::error::{EditorError, Result};
use serde::{Deserialize, Serialize};
use stagehand_timeline::{AssetId, AssetLibrary, Composition};
use std::path::Path;

/// Current project file format version
pub const PROJECT_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "stagehand.ron";

/// Defaults for newly created compositions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionDefaults {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Duration in seconds
    pub duration: f64,
    /// Frame rate
    pub frames_per_second: f64,
}

impl Default for CompositionDefaults {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            duration: 10.0,
            frames_per_second: 30.0,
        }
    }
}

impl CompositionDefaults {
    /// Create an empty composition with these defaults
    pub fn create(&self, name: impl Into<String>) -> Composition {
        Composition::new(name, self.width, self.height, self.duration, self.frames_per_second)
    }
}

/// Editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Maximum undo depth
    pub history_capacity: usize,
    /// Defaults for new compositions
    pub composition: CompositionDefaults,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history_capacity: crate::history::MAX_HISTORY,
            composition: CompositionDefaults::default(),
        }
    }
}

impl EditorSettings {
    /// Load settings from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = ron::from_str(&content)?;
        tracing::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No settings at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save settings to a RON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let ron_str = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, ron_str)?;
        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// On-disk project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Format version
    pub version: u32,
    /// Composition open for editing
    pub active: AssetId,
    /// Play-head time
    #[serde(default)]
    pub play_head: f64,
    /// All assets, compositions included
    pub library: AssetLibrary,
}

impl ProjectFile {
    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let project: ProjectFile = serde_json::from_str(json)?;
        if project.version > PROJECT_FORMAT_VERSION {
            return Err(EditorError::UnsupportedVersion {
                found: project.version,
                expected: PROJECT_FORMAT_VERSION,
            });
        }
        Ok(project)
    }

    /// Write the project to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!("Saved project to {:?}", path);
        Ok(())
    }

    /// Read a project from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let project = Self::from_json(&content)?;
        tracing::info!(
            "Loaded project from {:?} ({} assets)",
            path,
            project.library.len()
        );
        Ok(project)
    }
}
