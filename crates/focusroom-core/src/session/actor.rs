//! Single-owner actor that serializes access to a [`FocusSession`].
//!
//! The state machine is not meant for concurrent mutation. Hosts serving
//! several front ends (tabs, sockets, CLI plus tray) talk to one actor task
//! through cloned [`SessionHandle`]s instead of sharing the session.

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};

use super::engine::{FocusSession, Transition};
use super::state::Snapshot;
use crate::error::Result;
use crate::suggestion::SuggestionInput;
use crate::task::{Rating, Task};

const COMMAND_BUFFER: usize = 32;

enum Command {
    SubmitTask {
        name: String,
        focus_secs: u64,
        break_secs: u64,
        now: DateTime<Utc>,
        reply: oneshot::Sender<Result<Transition>>,
    },
    SubmitSuggested {
        name: String,
        input: SuggestionInput,
        now: DateTime<Utc>,
        reply: oneshot::Sender<Result<Transition>>,
    },
    Start {
        now: DateTime<Utc>,
        reply: oneshot::Sender<Result<Transition>>,
    },
    Stop {
        now: DateTime<Utc>,
        reply: oneshot::Sender<Result<Transition>>,
    },
    CompleteStage {
        now: DateTime<Utc>,
        reply: oneshot::Sender<Result<Transition>>,
    },
    SubmitFeedback {
        rating: Rating,
        now: DateTime<Utc>,
        reply: oneshot::Sender<Result<Transition>>,
    },
    Tick {
        now: DateTime<Utc>,
        reply: oneshot::Sender<Snapshot>,
    },
    History {
        reply: oneshot::Sender<Vec<Task>>,
    },
}

/// Owns a session on a tokio task and applies commands one at a time.
pub struct SessionActor {
    session: FocusSession,
    commands: mpsc::Receiver<Command>,
}

impl SessionActor {
    /// Move `session` onto a new tokio task and return a handle to it.
    ///
    /// Must be called from within a tokio runtime. The actor stops once every
    /// handle has been dropped.
    pub fn spawn(session: FocusSession) -> SessionHandle {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let actor = SessionActor {
            session,
            commands: rx,
        };
        tokio::spawn(actor.run());
        SessionHandle { commands: tx }
    }

    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            self.handle(command);
        }
        tracing::debug!("session actor stopped: all handles dropped");
    }

    fn handle(&mut self, command: Command) {
        // A dropped reply receiver only means the caller stopped waiting.
        match command {
            Command::SubmitTask {
                name,
                focus_secs,
                break_secs,
                now,
                reply,
            } => {
                let _ = reply.send(self.session.submit_task(&name, focus_secs, break_secs, now));
            }
            Command::SubmitSuggested {
                name,
                input,
                now,
                reply,
            } => {
                let _ = reply.send(self.session.submit_suggested(&name, input, now));
            }
            Command::Start { now, reply } => {
                let _ = reply.send(self.session.start(now));
            }
            Command::Stop { now, reply } => {
                let _ = reply.send(self.session.stop(now));
            }
            Command::CompleteStage { now, reply } => {
                let _ = reply.send(self.session.complete_stage(now));
            }
            Command::SubmitFeedback { rating, now, reply } => {
                let _ = reply.send(self.session.submit_feedback(rating, now));
            }
            Command::Tick { now, reply } => {
                let _ = reply.send(self.session.tick(now));
            }
            Command::History { reply } => {
                let _ = reply.send(self.session.history());
            }
        }
    }
}

/// Cloneable handle to a [`SessionActor`].
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
}

impl SessionHandle {
    pub async fn submit_task(
        &self,
        name: impl Into<String>,
        focus_secs: u64,
        break_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        let name = name.into();
        self.request(|reply| Command::SubmitTask {
            name,
            focus_secs,
            break_secs,
            now,
            reply,
        })
        .await?
    }

    pub async fn submit_suggested(
        &self,
        name: impl Into<String>,
        input: SuggestionInput,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        let name = name.into();
        self.request(|reply| Command::SubmitSuggested {
            name,
            input,
            now,
            reply,
        })
        .await?
    }

    pub async fn start(&self, now: DateTime<Utc>) -> Result<Transition> {
        self.request(|reply| Command::Start { now, reply }).await?
    }

    pub async fn stop(&self, now: DateTime<Utc>) -> Result<Transition> {
        self.request(|reply| Command::Stop { now, reply }).await?
    }

    pub async fn complete_stage(&self, now: DateTime<Utc>) -> Result<Transition> {
        self.request(|reply| Command::CompleteStage { now, reply })
            .await?
    }

    pub async fn submit_feedback(&self, rating: Rating, now: DateTime<Utc>) -> Result<Transition> {
        self.request(|reply| Command::SubmitFeedback { rating, now, reply })
            .await?
    }

    pub async fn tick(&self, now: DateTime<Utc>) -> Result<Snapshot> {
        self.request(|reply| Command::Tick { now, reply }).await
    }

    pub async fn history(&self) -> Result<Vec<Task>> {
        self.request(|reply| Command::History { reply }).await
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.commands.send(build(tx)).await?;
        Ok(rx.await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::session::SessionState;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn handle_drives_full_cycle() {
        let handle = SessionActor::spawn(FocusSession::new());
        handle.submit_task("write", 60, 30, t0()).await.unwrap();
        handle.start(t0()).await.unwrap();

        let snap = handle.tick(t0() + Duration::seconds(60)).await.unwrap();
        assert!(snap.is_expired());

        handle.complete_stage(t0() + Duration::seconds(60)).await.unwrap();
        handle.start(t0() + Duration::seconds(61)).await.unwrap();
        handle.complete_stage(t0() + Duration::seconds(91)).await.unwrap();
        let done = handle
            .submit_feedback(Rating::VeryGood, t0() + Duration::seconds(92))
            .await
            .unwrap();
        assert_eq!(done.snapshot.state, SessionState::Idle);

        let history = handle.history().await.unwrap();
        assert_eq!(history[0].logged_focus_secs, 60);
    }

    #[tokio::test]
    async fn suggested_submission_goes_through_the_handle() {
        let handle = SessionActor::spawn(FocusSession::new());
        let tr = handle
            .submit_suggested("inbox", SuggestionInput::Minutes(20), t0())
            .await
            .unwrap();
        assert_eq!(tr.snapshot.remaining_secs, 1200);
        assert_eq!(
            handle.history().await.unwrap()[0].pick,
            Some(SuggestionInput::Minutes(20))
        );
    }

    #[tokio::test]
    async fn errors_pass_through_the_handle() {
        let handle = SessionActor::spawn(FocusSession::new());
        let err = handle.start(t0()).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn concurrent_submissions_are_serialized() {
        let handle = SessionActor::spawn(FocusSession::new());
        let mut joins = Vec::new();
        for i in 0..16u64 {
            let h = handle.clone();
            joins.push(tokio::spawn(async move {
                h.submit_task("shared", 60 + i, 30, t0()).await
            }));
        }
        for join in joins {
            join.await.unwrap().unwrap();
        }

        let history = handle.history().await.unwrap();
        assert_eq!(history.len(), 1, "same-name submissions must merge");
    }
}
