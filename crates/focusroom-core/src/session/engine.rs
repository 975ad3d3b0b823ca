//! Focus session state machine.
//!
//! Like the timer engine it grew out of, the session is wall-clock based and
//! owns no thread: the host passes `now` into every operation and polls
//! [`FocusSession::tick`] at whatever rate it likes. Remaining time is always
//! recomputed from `(stage_started_at, stage_duration_secs, now)`, so missed
//! or irregular ticks never cause drift.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> StageReady(Focus) -> StageRunning(Focus) -> StageReady(Break)
//!      -> StageRunning(Break) -> AwaitingFeedback -> Idle
//! ```
//!
//! `stop()` moves `StageRunning(s)` back to `StageReady(s)` and freezes the
//! remaining time; the next `start()` resumes from it.
//!
//! Calendar days are counted in the fixed offset the host hands to
//! [`FocusSession::with_offset`]; a plain [`FocusSession::new`] counts in UTC.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = FocusSession::with_offset(*Local::now().offset());
//! session.submit_task("write report", 1500, 300, Utc::now())?;
//! session.start(Utc::now())?;
//! // In a host loop:
//! if session.tick(Utc::now()).is_expired() {
//!     session.complete_stage(Utc::now())?;
//! }
//! ```

use chrono::{DateTime, FixedOffset, Offset, Utc};
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::Serialize;

use super::state::{SessionState, Snapshot, Stage};
use crate::error::{CoreError, Result, ValidationError};
use crate::events::Event;
use crate::suggestion::{suggest, BreakActivity, SuggestionInput};
use crate::task::{day_of, Rating, Task, TaskBook, TaskKey, Upsert};

/// Result of a successful session operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub snapshot: Snapshot,
    pub event: Event,
}

/// A single focus session and the task book it works against.
#[derive(Debug, Clone)]
pub struct FocusSession {
    tasks: TaskBook,
    /// Bound task, by key only.
    active: Option<TaskKey>,
    stage: Stage,
    awaiting_feedback: bool,
    /// Set while the countdown is running.
    stage_started_at: Option<DateTime<Utc>>,
    /// Length of the current countdown segment.
    stage_duration_secs: u64,
    /// `stage_duration_secs` holds a remainder frozen by `stop()`.
    resume_pending: bool,
    /// Zone that decides which day a task belongs to.
    offset: FixedOffset,
    /// Draws break activities.
    rng: Mcg128Xsl64,
}

impl Default for FocusSession {
    fn default() -> Self {
        Self {
            tasks: TaskBook::default(),
            active: None,
            stage: Stage::default(),
            awaiting_feedback: false,
            stage_started_at: None,
            stage_duration_secs: 0,
            resume_pending: false,
            offset: Utc.fix(),
            rng: Mcg128Xsl64::from_entropy(),
        }
    }
}

impl FocusSession {
    /// Session that counts calendar days in UTC.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session that counts calendar days in `offset`.
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    /// Fix the break-activity draws to a seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mcg128Xsl64::seed_from_u64(seed);
        self
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        match (&self.active, self.awaiting_feedback, self.stage_started_at) {
            (None, _, _) => SessionState::Idle,
            (Some(_), true, _) => SessionState::AwaitingFeedback,
            (Some(_), false, Some(_)) => SessionState::StageRunning(self.stage),
            (Some(_), false, None) => SessionState::StageReady(self.stage),
        }
    }

    pub fn is_running(&self) -> bool {
        self.stage_started_at.is_some()
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.active.as_ref().and_then(|key| self.tasks.find_open(key))
    }

    pub fn tasks(&self) -> &TaskBook {
        &self.tasks
    }

    /// All tasks, most recent day first, insertion order within a day.
    pub fn history(&self) -> Vec<Task> {
        self.tasks.history()
    }

    /// Seconds left in the current stage as of `now`.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u64 {
        match self.state() {
            SessionState::Idle | SessionState::AwaitingFeedback => 0,
            SessionState::StageReady(_) => self.stage_duration_secs,
            SessionState::StageRunning(_) => {
                let elapsed = self
                    .stage_started_at
                    .map(|started| elapsed_secs(started, now))
                    .unwrap_or(0);
                self.stage_duration_secs.saturating_sub(elapsed)
            }
        }
    }

    /// Pure query: the state as of `now`. Calling it twice with the same
    /// `now` yields the same snapshot.
    pub fn tick(&self, now: DateTime<Utc>) -> Snapshot {
        let state = self.state();
        Snapshot {
            state,
            stage: state.stage(),
            running: self.is_running(),
            remaining_secs: self.remaining_secs(now),
            stage_duration_secs: match state {
                SessionState::Idle | SessionState::AwaitingFeedback => 0,
                _ => self.stage_duration_secs,
            },
            task: self.active_task().map(Task::summary),
            at: now,
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Snapshot {
        self.tick(now)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Bind a task for today and get ready to focus on it.
    ///
    /// An open task with the same name today is updated in place.
    pub fn submit_task(
        &mut self,
        name: &str,
        focus_secs: u64,
        break_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        self.submit(name, focus_secs, break_secs, None, now)
    }

    /// Like [`submit_task`](Self::submit_task), with durations looked up
    /// from `input`. The pick is recorded on the task.
    pub fn submit_suggested(
        &mut self,
        name: &str,
        input: SuggestionInput,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        let suggestion = suggest(input);
        self.submit(
            name,
            suggestion.focus_secs,
            suggestion.break_secs,
            Some(input),
            now,
        )
    }

    fn submit(
        &mut self,
        name: &str,
        focus_secs: u64,
        break_secs: u64,
        pick: Option<SuggestionInput>,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyTaskName.into());
        }
        if focus_secs == 0 {
            return Err(ValidationError::ZeroDuration { field: "focus" }.into());
        }
        if break_secs == 0 {
            return Err(ValidationError::ZeroDuration { field: "break" }.into());
        }
        if self.is_running() {
            return Err(CoreError::invalid_transition("submit a task", self.state()));
        }

        let key = TaskKey::new(name, day_of(now, self.offset));
        let created =
            self.tasks.upsert_open(&key, focus_secs, break_secs, pick, now) == Upsert::Created;
        if let Some(previous) = self.active.as_ref().filter(|prev| **prev != key) {
            tracing::debug!(task = %previous.name, "unbinding task left open");
        }

        self.active = Some(key.clone());
        self.stage = Stage::Focus;
        self.awaiting_feedback = false;
        self.stage_started_at = None;
        self.stage_duration_secs = focus_secs;
        self.resume_pending = false;

        tracing::info!(
            task = %key.name,
            day = %key.day,
            focus_secs,
            break_secs,
            created,
            "task submitted"
        );

        Ok(self.transition(
            now,
            Event::TaskSubmitted {
                name: key.name,
                day: key.day,
                focus_secs,
                break_secs,
                pick,
                created,
                at: now,
            },
        ))
    }

    /// Start (or resume) the countdown for the current stage.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<Transition> {
        let stage = match self.state() {
            SessionState::StageReady(stage) => stage,
            state => return Err(CoreError::invalid_transition("start", state)),
        };
        let task = self
            .active_task()
            .ok_or_else(|| CoreError::invalid_transition("start", SessionState::Idle))?;

        let resumed = self.resume_pending;
        let duration_secs = if resumed {
            self.stage_duration_secs
        } else {
            match stage {
                Stage::Focus => task.focus_secs,
                Stage::Break => task.break_secs,
            }
        };

        self.stage_duration_secs = duration_secs;
        self.resume_pending = false;
        self.stage_started_at = Some(now);

        tracing::info!(%stage, duration_secs, resumed, "stage started");

        Ok(self.transition(
            now,
            Event::StageStarted {
                stage,
                duration_secs,
                resumed,
                at: now,
            },
        ))
    }

    /// Stop the running countdown, keeping the time that is left.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Result<Transition> {
        let stage = match self.state() {
            SessionState::StageRunning(stage) => stage,
            state => return Err(CoreError::invalid_transition("stop", state)),
        };

        let remaining_secs = self.remaining_secs(now);
        self.stage_duration_secs = remaining_secs;
        self.resume_pending = true;
        self.stage_started_at = None;

        tracing::info!(%stage, remaining_secs, "stage stopped");

        Ok(self.transition(
            now,
            Event::StageStopped {
                stage,
                remaining_secs,
                at: now,
            },
        ))
    }

    /// Finish a stage whose countdown has reached zero.
    ///
    /// Focus time is credited in full here and nowhere else.
    pub fn complete_stage(&mut self, now: DateTime<Utc>) -> Result<Transition> {
        let stage = match self.state() {
            SessionState::StageRunning(stage) => stage,
            state => return Err(CoreError::invalid_transition("complete a stage", state)),
        };
        if self.remaining_secs(now) > 0 {
            return Err(CoreError::invalid_transition(
                "complete a stage before it expires",
                self.state(),
            ));
        }
        let key = self
            .active
            .clone()
            .ok_or_else(|| CoreError::invalid_transition("complete a stage", SessionState::Idle))?;
        let task = self
            .tasks
            .find_open_mut(&key)
            .ok_or_else(|| CoreError::invalid_transition("complete a stage", SessionState::Idle))?;

        let credited_secs = match stage {
            Stage::Focus => {
                task.logged_focus_secs = task.logged_focus_secs.saturating_add(task.focus_secs);
                task.focus_secs
            }
            Stage::Break => 0,
        };
        let break_secs = task.break_secs;
        let break_activity = match stage {
            Stage::Focus => Some(BreakActivity::pick(&mut self.rng)),
            Stage::Break => None,
        };

        self.stage_started_at = None;
        self.resume_pending = false;
        match stage {
            Stage::Focus => {
                self.stage = Stage::Break;
                self.stage_duration_secs = break_secs;
            }
            Stage::Break => {
                self.awaiting_feedback = true;
                self.stage_duration_secs = 0;
            }
        }

        tracing::info!(task = %key.name, %stage, credited_secs, "stage completed");

        Ok(self.transition(
            now,
            Event::StageCompleted {
                stage,
                name: key.name,
                credited_secs,
                break_activity,
                at: now,
            },
        ))
    }

    /// Rate the finished session, close the task and return to idle.
    pub fn submit_feedback(&mut self, rating: Rating, now: DateTime<Utc>) -> Result<Transition> {
        let state = self.state();
        if state != SessionState::AwaitingFeedback {
            return Err(CoreError::invalid_transition("submit feedback", state));
        }
        let key = self
            .active
            .clone()
            .ok_or_else(|| CoreError::invalid_transition("submit feedback", state))?;
        // Only unrated tasks are found, so a miss means it was already rated.
        let task = match self.tasks.find_open_mut(&key) {
            Some(task) => task,
            None => return Err(CoreError::AlreadyFeedback { task: key.name }),
        };
        task.feedback = Some(rating);

        self.active = None;
        self.stage = Stage::Focus;
        self.awaiting_feedback = false;
        self.stage_started_at = None;
        self.stage_duration_secs = 0;
        self.resume_pending = false;

        tracing::info!(task = %key.name, %rating, "feedback submitted");

        Ok(self.transition(
            now,
            Event::FeedbackSubmitted {
                name: key.name,
                day: key.day,
                rating,
                at: now,
            },
        ))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn transition(&self, now: DateTime<Utc>, event: Event) -> Transition {
        Transition {
            snapshot: self.tick(now),
            event,
        }
    }
}

/// Whole seconds between `started` and `now`; a clock that went backwards
/// counts as no time passed.
fn elapsed_secs(started: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((now - started).num_seconds()).unwrap_or(0)
}
