// SPDX-License-Identifier: MIT OR Apache-2.0
//! Snapshot-based undo/redo history.
//!
//! Every entry is a full copy of the asset library together with the active
//! composition and play-head, taken before the edit it guards.

use stagehand_timeline::{AssetId, AssetLibrary};
use std::collections::VecDeque;
use thiserror::Error;

/// Default maximum undo history depth
pub const MAX_HISTORY: usize = 100;

/// History errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// Nothing to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Nothing to redo
    #[error("Nothing to redo")]
    NothingToRedo,
}

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Editor state captured before an edit
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Human-readable description of the edit
    pub description: String,
    /// Asset library copy, without resource handles
    pub library: AssetLibrary,
    /// Active composition
    pub active: AssetId,
    /// Play-head time
    pub play_head: f64,
}

impl Snapshot {
    /// Capture a snapshot of the given state
    pub fn capture(description: impl Into<String>, library: &AssetLibrary, active: AssetId, play_head: f64) -> Self {
        Self {
            description: description.into(),
            library: library.snapshot(),
            active,
            play_head,
        }
    }
}

/// History statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    /// Entries in undo stack
    pub undo_count: usize,
    /// Entries in redo stack
    pub redo_count: usize,
    /// Maximum history depth
    pub max_depth: usize,
}

/// Undo/redo history manager
#[derive(Debug)]
pub struct History {
    /// Undo stack
    undo_stack: VecDeque<Snapshot>,
    /// Redo stack
    redo_stack: VecDeque<Snapshot>,
    /// Maximum history depth
    max_depth: usize,
}

impl History {
    /// Create a new history manager
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY)
    }

    /// Create with custom maximum depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record the state before an edit
    pub fn push(&mut self, snapshot: Snapshot) {
        self.redo_stack.clear();
        self.undo_stack.push_back(snapshot);

        // Enforce history limit
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    /// Undo the last edit.
    ///
    /// `current` is the live state, kept for redo. Returns the state to restore.
    pub fn undo(&mut self, mut current: Snapshot) -> Result<Snapshot> {
        let snapshot = self
            .undo_stack
            .pop_back()
            .ok_or(HistoryError::NothingToUndo)?;

        current.description.clone_from(&snapshot.description);
        self.redo_stack.push_back(current);
        Ok(snapshot)
    }

    /// Redo the last undone edit.
    ///
    /// `current` is the live state, kept for undo. Returns the state to restore.
    pub fn redo(&mut self, mut current: Snapshot) -> Result<Snapshot> {
        let snapshot = self
            .redo_stack
            .pop_back()
            .ok_or(HistoryError::NothingToRedo)?;

        current.description.clone_from(&snapshot.description);
        self.undo_stack.push_back(current);
        Ok(snapshot)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get undo stack depth
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Get history statistics
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            undo_count: self.undo_stack.len(),
            redo_count: self.redo_stack.len(),
            max_depth: self.max_depth,
        }
    }

    /// Get description of next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|s| s.description.as_str())
    }

    /// Get description of next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|s| s.description.as_str())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
