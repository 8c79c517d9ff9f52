// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stagehand event editor core.
//!
//! Wraps the `stagehand_timeline` engine in an editing session:
//! - [`EditorSession`]: the mutation API used by the UI, with undo/redo
//! - Snapshot history bounded by [`EditorSettings::history_capacity`]
//! - Keyframe selection
//! - RON settings and JSON project files
//! - A playback clock for headless preview
//!
//! ## Architecture
//!
//! The session is the single owner of editor state. Renderers read frames
//! through [`EditorSession::frame`] and never mutate.

pub mod error;
pub mod history;
pub mod playback;
pub mod project;
pub mod selection;
pub mod session;

pub use error::{EditorError, Result};
pub use history::{History, HistoryError, HistoryStats, Snapshot, MAX_HISTORY};
pub use playback::{PlaybackClock, PlaybackState};
pub use project::{
    CompositionDefaults, EditorSettings, ProjectFile, PROJECT_FORMAT_VERSION, SETTINGS_FILE_NAME,
};
pub use selection::{KeyframeRef, KeyframeSelection};
pub use session::EditorSession;
