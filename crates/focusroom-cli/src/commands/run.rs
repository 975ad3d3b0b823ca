//! Interactive focus session host.
//!
//! One actor owns the session. A ticker task polls it once per interval and
//! completes stages that have run out; stdin commands go through the same
//! handle, so the two never mutate the session at the same time.

use std::time::Duration;

use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand};
use focusroom_core::{
    parse_duration_secs, suggest, Config, CoreError, FocusReport, FocusSession, Rating,
    SessionActor, SessionHandle, SuggestionInput,
};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

#[derive(Args)]
pub struct RunArgs {
    /// Seconds between ticks (defaults to host.tick_interval_secs)
    #[arg(long)]
    tick_interval: Option<u64>,
    /// Leave expired stages for an explicit `complete` command
    #[arg(long)]
    no_auto_complete: bool,
    /// Print a snapshot on every tick while a stage is running
    #[arg(long)]
    watch: bool,
}

/// One line typed into the session.
#[derive(Parser)]
#[command(multicall = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand)]
enum ShellCommand {
    /// Bind a task: task "<name>" [focus] [break]  (e.g. 25m 5m, 90s)
    Task {
        name: String,
        focus: Option<String>,
        #[arg(value_name = "BREAK")]
        brk: Option<String>,
        /// Take durations from the suggestion table (e.g. 35m, deep)
        #[arg(long, value_name = "INPUT", conflicts_with_all = ["focus", "brk"])]
        suggest: Option<String>,
    },
    /// Suggest durations for minutes or a complexity label
    Suggest { input: String },
    /// Start or resume the current stage
    Start,
    /// Stop the running stage, keeping the time left
    Stop,
    /// Print the current state
    Status,
    /// Complete an expired stage
    Complete,
    /// Rate the finished session: very_good, good, neutral, bad, very_bad or 1-5
    Feedback { rating: String },
    /// List all tasks, most recent day first
    History,
    /// Totals over finished tasks
    Report,
    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Defaults {
    focus_secs: u64,
    break_secs: u64,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(host(args, config));
    // Don't wait on the blocking stdin reader.
    runtime.shutdown_background();
    result
}

async fn host(args: RunArgs, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let interval_secs = args
        .tick_interval
        .unwrap_or(config.host.tick_interval_secs)
        .max(1);
    let auto_complete = config.host.auto_complete && !args.no_auto_complete;
    let defaults = Defaults {
        focus_secs: config.durations.focus_secs(),
        break_secs: config.durations.break_secs(),
    };

    // Days follow the host's clock as of startup.
    let offset = *Local::now().offset();
    let handle = SessionActor::spawn(FocusSession::with_offset(offset));
    let ticker = tokio::spawn(tick_loop(
        handle.clone(),
        Duration::from_secs(interval_secs),
        auto_complete,
        args.watch,
    ));
    tracing::info!(interval_secs, auto_complete, %offset, "focus session host started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match handle_line(&handle, &defaults, line).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("error: {e}"),
        }
    }

    ticker.abort();
    tracing::info!("focus session host stopped");
    Ok(())
}

async fn tick_loop(handle: SessionHandle, every: Duration, auto_complete: bool, watch: bool) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        let now = Utc::now();
        let snapshot = match handle.tick(now).await {
            Ok(snapshot) => snapshot,
            Err(_) => return,
        };
        if watch && snapshot.running {
            print_json(&snapshot);
        }
        if auto_complete && snapshot.is_expired() {
            match handle.complete_stage(now).await {
                Ok(transition) => print_json(&transition),
                // A stop can land between the tick and the completion.
                Err(CoreError::InvalidTransition { .. }) => {
                    tracing::debug!("stage changed before auto-complete")
                }
                Err(e) => {
                    tracing::warn!(error = %e, "auto-complete failed");
                }
            }
        }
    }
}

async fn handle_line(
    handle: &SessionHandle,
    defaults: &Defaults,
    line: &str,
) -> Result<Flow, Box<dyn std::error::Error>> {
    let words = split_words(line)?;
    let parsed = match ShellLine::try_parse_from(words) {
        Ok(parsed) => parsed,
        Err(e) if !e.use_stderr() => {
            // --help and friends
            print!("{e}");
            return Ok(Flow::Continue);
        }
        Err(e) => return Err(e.to_string().trim_end().to_string().into()),
    };

    let now = Utc::now();
    match parsed.command {
        ShellCommand::Task {
            name,
            suggest: Some(input),
            ..
        } => {
            let input: SuggestionInput = input.parse()?;
            print_json(&handle.submit_suggested(name, input, now).await?);
        }
        ShellCommand::Task {
            name, focus, brk, ..
        } => {
            let focus_secs = match focus {
                Some(f) => parse_duration_secs(&f)?,
                None => defaults.focus_secs,
            };
            let break_secs = match brk {
                Some(b) => parse_duration_secs(&b)?,
                None => defaults.break_secs,
            };
            print_json(&handle.submit_task(name, focus_secs, break_secs, now).await?);
        }
        ShellCommand::Suggest { input } => {
            let input: SuggestionInput = input.parse()?;
            print_json(&suggest(input));
        }
        ShellCommand::Start => print_json(&handle.start(now).await?),
        ShellCommand::Stop => print_json(&handle.stop(now).await?),
        ShellCommand::Status => print_json(&handle.tick(now).await?),
        ShellCommand::Complete => print_json(&handle.complete_stage(now).await?),
        ShellCommand::Feedback { rating } => {
            let rating: Rating = rating.parse()?;
            print_json(&handle.submit_feedback(rating, now).await?);
        }
        ShellCommand::History => print_json(&handle.history().await?),
        ShellCommand::Report => {
            let history = handle.history().await?;
            print_json(&FocusReport::from_tasks(&history));
        }
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("error: {e}"),
    }
}

/// Split a command line the way a POSIX shell would.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    shlex::split(line).ok_or_else(|| format!("unterminated quote or escape in: {line}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_words_keeps_quoted_names() {
        assert_eq!(
            split_words(r#"task "write report" 25m 5m"#).unwrap(),
            vec!["task", "write report", "25m", "5m"]
        );
        assert_eq!(split_words("  start  ").unwrap(), vec!["start"]);
        assert_eq!(split_words(r#"task """#).unwrap(), vec!["task", ""]);
        assert!(split_words(r#"task "oops"#).is_err());
    }

    #[test]
    fn split_words_handles_single_quotes_and_escapes() {
        assert_eq!(
            split_words("task 'write report' 25m 5m").unwrap(),
            vec!["task", "write report", "25m", "5m"]
        );
        assert_eq!(
            split_words(r#"task "say \"hi\"" 25m"#).unwrap(),
            vec!["task", r#"say "hi""#, "25m"]
        );
        assert_eq!(
            split_words(r"task don\'t 25m").unwrap(),
            vec!["task", "don't", "25m"]
        );
        assert!(split_words("task 'oops").is_err());
    }

    #[test]
    fn task_suggest_conflicts_with_explicit_durations() {
        let line = ShellLine::try_parse_from(["task", "read", "--suggest", "deep"]).unwrap();
        assert!(matches!(
            line.command,
            ShellCommand::Task { suggest: Some(ref s), .. } if s == "deep"
        ));
        assert!(ShellLine::try_parse_from(["task", "read", "40m", "--suggest", "deep"]).is_err());
    }

    #[test]
    fn shell_line_parses_task_with_optional_durations() {
        let line = ShellLine::try_parse_from(["task", "read", "40m"]).unwrap();
        match line.command {
            ShellCommand::Task {
                name, focus, brk, ..
            } => {
                assert_eq!(name, "read");
                assert_eq!(focus.as_deref(), Some("40m"));
                assert!(brk.is_none());
            }
            _ => panic!("Expected Task"),
        }
    }

    #[test]
    fn shell_line_rejects_unknown_commands() {
        assert!(ShellLine::try_parse_from(["dance"]).is_err());
    }

    #[tokio::test]
    async fn handle_line_drives_session() {
        let handle = SessionActor::spawn(FocusSession::new());
        let defaults = Defaults {
            focus_secs: 1500,
            break_secs: 300,
        };

        assert_eq!(
            handle_line(&handle, &defaults, r#"task "write report""#).await.unwrap(),
            Flow::Continue
        );
        let snap = handle.tick(Utc::now()).await.unwrap();
        assert_eq!(snap.remaining_secs, 1500);

        handle_line(&handle, &defaults, "start").await.unwrap();
        assert!(handle.tick(Utc::now()).await.unwrap().running);
        assert!(handle_line(&handle, &defaults, "task 'other task'").await.is_err());

        assert!(handle_line(&handle, &defaults, "feedback good").await.is_err());
        assert!(handle_line(&handle, &defaults, "feedback superb").await.is_err());
        assert_eq!(
            handle_line(&handle, &defaults, "quit").await.unwrap(),
            Flow::Quit
        );
    }
}
