//! Interactive tool sessions
//!
//! A session owns the picks and the candidate list of one fillet or trim
//! interaction and moves through `Open -> Kept | Cancelled`. Hosts (GUI, the
//! headless harness, tests) drive it and render the preview callbacks it emits.

pub mod fillet;
pub mod settings;
pub mod trim;

use std::collections::VecDeque;

use serde::Serialize;

use crate::error::ToolError;

pub use fillet::{run_fillet, FilletSession};
pub use settings::{FilletSettings, PreviewSettings, ToolSettings};
pub use trim::{run_trim, TrimSession};

/// Lifecycle of a tool session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SessionState {
    #[default]
    Open,
    Kept,
    Cancelled,
}

impl SessionState {
    pub fn is_open(&self) -> bool {
        *self == SessionState::Open
    }
}

/// Result of a finished tool run, handed back to the host
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub accepted: bool,
    /// Element the replacement takes the place of (trim only)
    pub replace_index: Option<usize>,
    pub replacement: Option<String>,
    pub status: String,
    pub error: Option<ToolError>,
}

impl ToolOutcome {
    pub fn accepted(replace_index: Option<usize>, replacement: String, status: impl Into<String>) -> Self {
        Self {
            accepted: true,
            replace_index,
            replacement: Some(replacement),
            status: status.into(),
            error: None,
        }
    }

    pub fn rejected(error: ToolError) -> Self {
        Self {
            accepted: false,
            replace_index: None,
            replacement: None,
            status: error.to_string(),
            error: Some(error),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            accepted: false,
            replace_index: None,
            replacement: None,
            status: "Cancelled".to_string(),
            error: None,
        }
    }
}

/// One step a driver asks a session to take
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// New radius text (fillet only; ignored by trim)
    SetRadius(String),
    Next,
    Prev,
    Keep,
    Cancel,
}

/// What a driver sees before choosing its next action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub id: String,
    pub state: SessionState,
    pub candidate_count: usize,
    pub cursor: Option<usize>,
    pub current_label: Option<String>,
    pub status: String,
}

/// Source of user actions for a modal tool run
pub trait SessionDriver {
    /// `None` ends the run as a cancel
    fn next_action(&mut self, view: &SessionView) -> Option<SessionAction>;
}

/// Replays a fixed list of actions
#[derive(Debug, Clone, Default)]
pub struct ScriptedDriver {
    actions: VecDeque<SessionAction>,
    /// Views seen so far, oldest first
    pub seen: Vec<SessionView>,
}

impl ScriptedDriver {
    pub fn new(actions: impl IntoIterator<Item = SessionAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            seen: Vec::new(),
        }
    }
}

impl SessionDriver for ScriptedDriver {
    fn next_action(&mut self, view: &SessionView) -> Option<SessionAction> {
        self.seen.push(view.clone());
        self.actions.pop_front()
    }
}

/// Cursor after one step forward, wrapping; `None` when there is nothing to cycle
pub(crate) fn step_forward(cursor: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match cursor {
        Some(i) => (i + 1) % len,
        None => 0,
    })
}

pub(crate) fn step_back(cursor: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match cursor {
        Some(0) | None => len - 1,
        Some(i) => (i - 1).min(len - 1),
    })
}
