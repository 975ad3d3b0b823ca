//! Tasks tracked by a focus session.
//!
//! A task is identified by its name and the calendar day it belongs to.
//! Only one task per (name, day) may be open (unrated) at a time.

mod book;
mod rating;

pub use book::{TaskBook, Upsert};
pub use rating::Rating;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::suggestion::SuggestionInput;

/// Weak reference to a task: the session holds this, never the task itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskKey {
    pub name: String,
    pub day: NaiveDate,
}

impl TaskKey {
    pub fn new(name: impl Into<String>, day: NaiveDate) -> Self {
        Self {
            name: name.into(),
            day,
        }
    }
}

/// One named unit of work for a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub day: NaiveDate,
    pub focus_secs: u64,
    pub break_secs: u64,
    /// Only grows, and only when a focus stage runs to completion.
    pub logged_focus_secs: u64,
    pub feedback: Option<Rating>,
    /// Suggestion row the durations came from, if the user picked one.
    pub pick: Option<SuggestionInput>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(key: TaskKey, focus_secs: u64, break_secs: u64, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: key.name,
            day: key.day,
            focus_secs,
            break_secs,
            logged_focus_secs: 0,
            feedback: None,
            pick: None,
            created_at: now,
        }
    }

    pub fn matches(&self, key: &TaskKey) -> bool {
        self.name == key.name && self.day == key.day
    }

    /// A task stays open until it has been rated.
    pub fn is_open(&self) -> bool {
        self.feedback.is_none()
    }

    pub fn summary(&self) -> TaskSummary {
        TaskSummary {
            id: self.id,
            name: self.name.clone(),
            day: self.day,
            focus_secs: self.focus_secs,
            break_secs: self.break_secs,
            logged_focus_secs: self.logged_focus_secs,
            feedback: self.feedback,
            pick: self.pick,
        }
    }
}

/// Rendering view of the task bound to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub id: Uuid,
    pub name: String,
    pub day: NaiveDate,
    pub focus_secs: u64,
    pub break_secs: u64,
    pub logged_focus_secs: u64,
    pub feedback: Option<Rating>,
    pub pick: Option<SuggestionInput>,
}

/// Calendar day that `now` falls on in the zone given by `offset`.
pub fn day_of(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn day_of_follows_the_given_offset() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 23, 30, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let seoul = FixedOffset::east_opt(9 * 3600).unwrap();
        let honolulu = FixedOffset::west_opt(10 * 3600).unwrap();

        assert_eq!(day_of(now, utc), NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(day_of(now, seoul), NaiveDate::from_ymd_opt(2024, 7, 2).unwrap());
        assert_eq!(
            day_of(Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap(), honolulu),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
        );
    }
}
