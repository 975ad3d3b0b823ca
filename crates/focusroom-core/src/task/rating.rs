use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How the user felt about a finished focus session.
///
/// Declared best-first so that derived ordering sorts "very good" ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    VeryGood,
    Good,
    Neutral,
    Bad,
    VeryBad,
}

impl Rating {
    pub const ALL: [Rating; 5] = [
        Rating::VeryGood,
        Rating::Good,
        Rating::Neutral,
        Rating::Bad,
        Rating::VeryBad,
    ];

    /// Numeric score, 5 (very good) down to 1 (very bad).
    pub fn score(self) -> u8 {
        match self {
            Rating::VeryGood => 5,
            Rating::Good => 4,
            Rating::Neutral => 3,
            Rating::Bad => 2,
            Rating::VeryBad => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::VeryGood => "very_good",
            Rating::Good => "good",
            Rating::Neutral => "neutral",
            Rating::Bad => "bad",
            Rating::VeryBad => "very_bad",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        if let Ok(score) = normalized.parse::<u8>() {
            return Rating::ALL
                .into_iter()
                .find(|r| r.score() == score)
                .ok_or_else(|| ValidationError::UnknownRating(s.to_string()));
        }
        Rating::ALL
            .into_iter()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownRating(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_scores() {
        assert_eq!("very_good".parse::<Rating>().unwrap(), Rating::VeryGood);
        assert_eq!("Very Good".parse::<Rating>().unwrap(), Rating::VeryGood);
        assert_eq!("very-bad".parse::<Rating>().unwrap(), Rating::VeryBad);
        assert_eq!("3".parse::<Rating>().unwrap(), Rating::Neutral);
        assert_eq!(" good ".parse::<Rating>().unwrap(), Rating::Good);
    }

    #[test]
    fn rejects_unknown_ratings() {
        assert_eq!(
            "amazing".parse::<Rating>(),
            Err(ValidationError::UnknownRating("amazing".into()))
        );
        assert!("0".parse::<Rating>().is_err());
        assert!("6".parse::<Rating>().is_err());
        assert!("".parse::<Rating>().is_err());
    }

    #[test]
    fn ordering_is_best_first() {
        let mut ratings = vec![Rating::Bad, Rating::VeryGood, Rating::Neutral];
        ratings.sort();
        assert_eq!(ratings, vec![Rating::VeryGood, Rating::Neutral, Rating::Bad]);
    }
}
