//! # Focusroom Core Library
//!
//! Core logic for the Focusroom focus timer. Everything here is host
//! agnostic: a CLI, a desktop shell or a web server drives the same
//! state machine.
//!
//! ## Architecture
//!
//! - **Session**: a wall-clock-based state machine. The host passes `now`
//!   into every operation and polls `tick()` for progress
//! - **Tasks**: an in-memory book of named tasks, one open task per
//!   (name, day)
//! - **Suggestions**: a fixed lookup table from duration buckets or
//!   complexity labels to focus/break lengths, plus rest activities for
//!   breaks
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`FocusSession`]: Core session state machine
//! - [`SessionHandle`]: Serialized access to a session from many callers
//! - [`TaskBook`]: Task collection and history
//! - [`FocusReport`]: Totals over finished tasks
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod session;
pub mod stats;
pub mod storage;
pub mod suggestion;
pub mod task;

pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use session::{FocusSession, SessionActor, SessionHandle, SessionState, Snapshot, Stage, Transition};
pub use stats::{FocusReport, RatingCount};
pub use storage::Config;
pub use suggestion::{
    parse_duration_secs, suggest, BreakActivity, Complexity, Suggestion, SuggestionInput,
};
pub use task::{Rating, Task, TaskBook, TaskKey, TaskSummary};
