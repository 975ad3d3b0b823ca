use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Stage;
use crate::suggestion::{BreakActivity, SuggestionInput};
use crate::task::Rating;

/// Every state change of a focus session produces an Event.
/// Hosts print them, forward them to a UI, or drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskSubmitted {
        name: String,
        day: NaiveDate,
        focus_secs: u64,
        break_secs: u64,
        /// Suggestion row the durations came from, if any.
        pick: Option<SuggestionInput>,
        /// False when an open task with the same name was updated in place.
        created: bool,
        at: DateTime<Utc>,
    },
    StageStarted {
        stage: Stage,
        duration_secs: u64,
        /// True when resuming a countdown that was stopped part-way.
        resumed: bool,
        at: DateTime<Utc>,
    },
    StageStopped {
        stage: Stage,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    StageCompleted {
        stage: Stage,
        name: String,
        /// Focus seconds credited to the task (always 0 for breaks).
        credited_secs: u64,
        /// Suggested rest for the break that follows; only set for focus.
        break_activity: Option<BreakActivity>,
        at: DateTime<Utc>,
    },
    FeedbackSubmitted {
        name: String,
        day: NaiveDate,
        rating: Rating,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::TaskSubmitted { at, .. }
            | Event::StageStarted { at, .. }
            | Event::StageStopped { at, .. }
            | Event::StageCompleted { at, .. }
            | Event::FeedbackSubmitted { at, .. } => *at,
        }
    }
}
