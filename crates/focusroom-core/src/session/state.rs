use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskSummary;

/// One of the two countdown phases of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Focus,
    Break,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Focus => f.write_str("focus"),
            Stage::Break => f.write_str("break"),
        }
    }
}

/// Observable state of a [`FocusSession`](super::FocusSession).
///
/// Derived from the session fields on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "stage", rename_all = "snake_case")]
pub enum SessionState {
    /// No task bound.
    Idle,
    /// Task bound, countdown configured but not running.
    StageReady(Stage),
    /// Countdown running.
    StageRunning(Stage),
    /// Break finished; waiting for the user's rating.
    AwaitingFeedback,
}

impl SessionState {
    pub fn stage(&self) -> Option<Stage> {
        match self {
            SessionState::StageReady(stage) | SessionState::StageRunning(stage) => Some(*stage),
            SessionState::Idle | SessionState::AwaitingFeedback => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::StageReady(stage) => write!(f, "ready ({stage})"),
            SessionState::StageRunning(stage) => write!(f, "running ({stage})"),
            SessionState::AwaitingFeedback => f.write_str("awaiting feedback"),
        }
    }
}

/// Point-in-time view of a session, handed to the host for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: SessionState,
    pub stage: Option<Stage>,
    pub running: bool,
    pub remaining_secs: u64,
    pub stage_duration_secs: u64,
    pub task: Option<TaskSummary>,
    pub at: DateTime<Utc>,
}

impl Snapshot {
    /// True when a running countdown has reached zero and the host should
    /// call `complete_stage`.
    pub fn is_expired(&self) -> bool {
        self.running && self.remaining_secs == 0
    }

    /// Remaining time formatted as `MM:SS`.
    pub fn remaining_display(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}
