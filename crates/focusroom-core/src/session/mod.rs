mod actor;
mod engine;
mod state;

pub use actor::{SessionActor, SessionHandle};
pub use engine::{FocusSession, Transition};
pub use state::{SessionState, Snapshot, Stage};
