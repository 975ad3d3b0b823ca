//! Focus/break suggestions from a fixed lookup table.
//!
//! There is no learning here: the input is a duration bucket or a
//! complexity label, and the answer comes from the first matching row.
//! Finished focus stages also get a rest activity drawn from a fixed list.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Suggested focus and break lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub focus_secs: u64,
    pub break_secs: u64,
}

impl Suggestion {
    const fn minutes(focus: u64, brk: u64) -> Self {
        Self {
            focus_secs: focus * 60,
            break_secs: brk * 60,
        }
    }
}

/// How hard the task at hand feels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Light,
    Normal,
    Demanding,
    Deep,
}

impl Complexity {
    pub const ALL: [Complexity; 4] = [
        Complexity::Light,
        Complexity::Normal,
        Complexity::Demanding,
        Complexity::Deep,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Light => "light",
            Complexity::Normal => "normal",
            Complexity::Demanding => "demanding",
            Complexity::Deep => "deep",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum SuggestionInput {
    Minutes(u32),
    Complexity(Complexity),
}

/// `(upper bound in minutes, suggestion)`, ascending. Inputs above the last
/// bound fall into the last row.
static DURATION_TABLE: [(u32, Suggestion); 8] = [
    (15, Suggestion::minutes(15, 5)),
    (20, Suggestion::minutes(20, 5)),
    (25, Suggestion::minutes(25, 5)),
    (30, Suggestion::minutes(30, 5)),
    (35, Suggestion::minutes(35, 5)),
    (40, Suggestion::minutes(40, 10)),
    (45, Suggestion::minutes(45, 10)),
    (50, Suggestion::minutes(50, 10)),
];

static COMPLEXITY_TABLE: [(Complexity, Suggestion); 4] = [
    (Complexity::Light, Suggestion::minutes(15, 5)),
    (Complexity::Normal, Suggestion::minutes(25, 5)),
    (Complexity::Demanding, Suggestion::minutes(40, 10)),
    (Complexity::Deep, Suggestion::minutes(50, 10)),
];

/// Look up the suggestion for `input`.
pub fn suggest(input: SuggestionInput) -> Suggestion {
    match input {
        SuggestionInput::Minutes(minutes) => DURATION_TABLE
            .iter()
            .find(|(bound, _)| minutes <= *bound)
            .or_else(|| DURATION_TABLE.last())
            .map(|(_, s)| *s)
            .unwrap_or(Suggestion::minutes(25, 5)),
        SuggestionInput::Complexity(level) => COMPLEXITY_TABLE
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, s)| *s)
            .unwrap_or(Suggestion::minutes(25, 5)),
    }
}

/// Duration buckets offered to the user, in minutes.
pub fn duration_buckets() -> impl Iterator<Item = u32> {
    DURATION_TABLE.iter().map(|(bound, _)| *bound)
}

impl fmt::Display for SuggestionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionInput::Minutes(minutes) => write!(f, "{minutes}m"),
            SuggestionInput::Complexity(level) => write!(f, "{level}"),
        }
    }
}

/// Something to do during the break that follows a focus stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakActivity {
    Stretch,
    RestEyes,
    DrinkWater,
    Meditate,
}

impl BreakActivity {
    pub const ALL: [BreakActivity; 4] = [
        BreakActivity::Stretch,
        BreakActivity::RestEyes,
        BreakActivity::DrinkWater,
        BreakActivity::Meditate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BreakActivity::Stretch => "stretch",
            BreakActivity::RestEyes => "rest_eyes",
            BreakActivity::DrinkWater => "drink_water",
            BreakActivity::Meditate => "meditate",
        }
    }

    /// One-line prompt shown to the user.
    pub fn prompt(self) -> &'static str {
        match self {
            BreakActivity::Stretch => "Stand up and stretch for a minute.",
            BreakActivity::RestEyes => "Look out of a window and rest your eyes.",
            BreakActivity::DrinkWater => "Drink a glass of water.",
            BreakActivity::Meditate => "Sit still and take a few slow breaths.",
        }
    }

    /// Draw one activity uniformly from [`BreakActivity::ALL`].
    pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for BreakActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuggestionInput {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lowered = trimmed.to_lowercase();

        if let Some(level) = Complexity::ALL.into_iter().find(|c| c.as_str() == lowered) {
            return Ok(SuggestionInput::Complexity(level));
        }

        let digits = ["min", "m", "분"]
            .iter()
            .find_map(|suffix| lowered.strip_suffix(*suffix))
            .unwrap_or(lowered.as_str())
            .trim();
        match digits.parse::<u32>() {
            Ok(minutes) if minutes > 0 => Ok(SuggestionInput::Minutes(minutes)),
            _ => Err(ValidationError::UnknownSuggestionInput(trimmed.to_string())),
        }
    }
}

/// Parse a user-entered duration into seconds.
///
/// Accepts `90s`, `25m`, `25min` or a bare number, which means minutes.
pub fn parse_duration_secs(s: &str) -> Result<u64, ValidationError> {
    let lowered = s.trim().to_lowercase();
    let invalid = || ValidationError::InvalidDuration(s.trim().to_string());

    let (digits, unit) = if let Some(d) = lowered.strip_suffix('s') {
        (d, 1)
    } else if let Some(d) = lowered.strip_suffix("min").or_else(|| lowered.strip_suffix('m')) {
        (d, 60)
    } else {
        (lowered.as_str(), 60)
    };
    let value: u64 = digits.trim().parse().map_err(|_| invalid())?;
    match value.checked_mul(unit) {
        Some(secs) if secs > 0 => Ok(secs),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    #[test]
    fn bucket_rows_match_table() {
        assert_eq!(suggest(SuggestionInput::Minutes(15)), Suggestion::minutes(15, 5));
        assert_eq!(suggest(SuggestionInput::Minutes(35)), Suggestion::minutes(35, 5));
        assert_eq!(suggest(SuggestionInput::Minutes(40)), Suggestion::minutes(40, 10));
        assert_eq!(suggest(SuggestionInput::Minutes(50)), Suggestion::minutes(50, 10));
    }

    #[test]
    fn between_buckets_rounds_up_and_clamps() {
        assert_eq!(suggest(SuggestionInput::Minutes(1)), Suggestion::minutes(15, 5));
        assert_eq!(suggest(SuggestionInput::Minutes(21)), Suggestion::minutes(25, 5));
        assert_eq!(suggest(SuggestionInput::Minutes(90)), Suggestion::minutes(50, 10));
    }

    #[test]
    fn complexity_labels() {
        assert_eq!(
            suggest(SuggestionInput::Complexity(Complexity::Light)),
            Suggestion::minutes(15, 5)
        );
        assert_eq!(
            suggest(SuggestionInput::Complexity(Complexity::Deep)),
            Suggestion::minutes(50, 10)
        );
    }

    #[test]
    fn focus_is_monotonic_in_minutes() {
        let mut last = 0;
        for minutes in 1..=120 {
            let s = suggest(SuggestionInput::Minutes(minutes));
            assert!(s.focus_secs >= last);
            last = s.focus_secs;
        }
    }

    #[test]
    fn parses_text_inputs() {
        assert_eq!("25".parse::<SuggestionInput>(), Ok(SuggestionInput::Minutes(25)));
        assert_eq!("25m".parse::<SuggestionInput>(), Ok(SuggestionInput::Minutes(25)));
        assert_eq!("40min".parse::<SuggestionInput>(), Ok(SuggestionInput::Minutes(40)));
        assert_eq!("15분".parse::<SuggestionInput>(), Ok(SuggestionInput::Minutes(15)));
        assert_eq!("Deep".parse::<SuggestionInput>(), Ok(SuggestionInput::Complexity(Complexity::Deep)));
        assert_eq!(
            "soon".parse::<SuggestionInput>(),
            Err(ValidationError::UnknownSuggestionInput("soon".into()))
        );
        assert!("0".parse::<SuggestionInput>().is_err());
    }

    #[test]
    fn parses_durations() {
        assert_eq!(parse_duration_secs("90s"), Ok(90));
        assert_eq!(parse_duration_secs("25m"), Ok(1500));
        assert_eq!(parse_duration_secs("5min"), Ok(300));
        assert_eq!(parse_duration_secs("25"), Ok(1500));
        assert_eq!(
            parse_duration_secs("0"),
            Err(ValidationError::InvalidDuration("0".into()))
        );
        assert!(parse_duration_secs("abc").is_err());
        assert!(parse_duration_secs("-5m").is_err());
    }

    #[test]
    fn buckets_are_ascending() {
        let buckets: Vec<_> = duration_buckets().collect();
        assert_eq!(buckets, vec![15, 20, 25, 30, 35, 40, 45, 50]);
    }

    #[test]
    fn break_activity_pick_covers_every_activity() {
        let mut rng = Mcg128Xsl64::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(BreakActivity::pick(&mut rng));
        }
        assert_eq!(seen.len(), BreakActivity::ALL.len());
    }

    #[test]
    fn break_activity_pick_is_reproducible_for_a_seed() {
        let draw = |seed| {
            let mut rng = Mcg128Xsl64::seed_from_u64(seed);
            (0..10).map(|_| BreakActivity::pick(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
    }

    #[test]
    fn suggestion_input_displays_as_it_parses() {
        for text in ["25m", "deep"] {
            let input: SuggestionInput = text.parse().unwrap();
            assert_eq!(input.to_string(), text);
        }
    }
}
