use clap::Args;
use focusroom_core::suggestion::duration_buckets;
use focusroom_core::{suggest, SuggestionInput};
use serde::Serialize;

#[derive(Args)]
pub struct SuggestArgs {
    /// Minutes (e.g. "25", "40m") or a complexity: light, normal, demanding, deep
    input: Option<String>,
    /// Print the whole duration table instead
    #[arg(long, conflicts_with = "input")]
    table: bool,
}

#[derive(Serialize)]
struct SuggestionRow {
    input: SuggestionInput,
    focus_secs: u64,
    break_secs: u64,
}

fn row(input: SuggestionInput) -> SuggestionRow {
    let s = suggest(input);
    SuggestionRow {
        input,
        focus_secs: s.focus_secs,
        break_secs: s.break_secs,
    }
}

pub fn run(args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.table {
        let rows: Vec<_> = duration_buckets()
            .map(|minutes| row(SuggestionInput::Minutes(minutes)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let input: SuggestionInput = args
        .input
        .as_deref()
        .unwrap_or("25")
        .parse()?;
    println!("{}", serde_json::to_string_pretty(&row(input))?);
    Ok(())
}
