// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor error type.

use crate::history::HistoryError;
use stagehand_timeline::{AssetId, TimelineError};
use thiserror::Error;

/// Errors surfaced by the editing session and project files
#[derive(Debug, Error)]
pub enum EditorError {
    /// Rejected timeline edit
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    /// History error
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// Composition not found in the asset library
    #[error("Composition not found: {0:?}")]
    CompositionNotFound(AssetId),

    /// Project written by an unknown format version
    #[error("Unsupported project version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Version this build writes
        expected: u32,
    },

    /// File I/O error
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// Project (JSON) error
    #[error("Project format error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings (RON) parse error
    #[error("Settings parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),

    /// Settings (RON) write error
    #[error("Settings write error: {0}")]
    Ron(#[from] ron::Error),
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;
