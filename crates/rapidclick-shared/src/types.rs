use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SharedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                radius: 40.0,
                total_time_secs: 45,
            },
            Difficulty::Medium => DifficultyProfile {
                radius: 30.0,
                total_time_secs: 30,
            },
            Difficulty::Hard => DifficultyProfile {
                radius: 20.0,
                total_time_secs: 20,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(SharedError::InvalidDifficulty(other.to_string())),
        }
    }
}

/// Target size and session length for one difficulty level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Target radius in surface pixels.
    pub radius: f64,
    /// Length of a session in whole seconds.
    pub total_time_secs: i64,
}

/// A validated score: finite and non-negative.
///
/// Serialized as a JSON integer when it has no fractional part so that a
/// stored record reads `{"score": 12}` rather than `{"score": 12.0}`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Score(f64);

impl Score {
    pub const ZERO: Score = Score(0.0);

    pub fn new(value: f64) -> Result<Self, SharedError> {
        if !value.is_finite() {
            return Err(SharedError::InvalidScore(format!("{value} is not finite")));
        }
        if value < 0.0 {
            return Err(SharedError::InvalidScore(format!("{value} is negative")));
        }
        Ok(Self(value))
    }

    /// Validate an untyped JSON value as submitted by a client.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, SharedError> {
        match value {
            serde_json::Value::Number(n) => {
                let v = n
                    .as_f64()
                    .ok_or_else(|| SharedError::InvalidScore(n.to_string()))?;
                Self::new(v)
            }
            serde_json::Value::Null => {
                Err(SharedError::InvalidScore("missing score".to_string()))
            }
            other => Err(SharedError::InvalidScore(format!(
                "expected a number, got {other}"
            ))),
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<u32> for Score {
    fn from(value: u32) -> Self {
        Self(f64::from(value))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract() == 0.0 && self.0 <= u64::MAX as f64 {
            serializer.serialize_u64(self.0 as u64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Score::new(raw).map_err(serde::de::Error::custom)
    }
}

/// The single persisted high score record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScoreRecord {
    pub score: Score,
    pub date: Option<DateTime<Utc>>,
}

impl ScoreRecord {
    pub fn new(score: Score, date: DateTime<Utc>) -> Self {
        Self {
            score,
            date: Some(date),
        }
    }
}

/// One row of the device-local leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub score: u32,
    pub difficulty: Difficulty,
    /// Human readable date of the session.
    pub date: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        assert_eq!(Difficulty::Easy.profile().radius, 40.0);
        assert_eq!(Difficulty::Easy.profile().total_time_secs, 45);
        assert_eq!(Difficulty::Medium.profile().radius, 30.0);
        assert_eq!(Difficulty::Medium.profile().total_time_secs, 30);
        assert_eq!(Difficulty::Hard.profile().radius, 20.0);
        assert_eq!(Difficulty::Hard.profile().total_time_secs, 20);
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(" Hard ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert!("nightmare".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_difficulty_serde_lowercase() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn test_score_validation() {
        assert!(Score::new(0.0).is_ok());
        assert!(Score::new(-1.0).is_err());
        assert!(Score::new(f64::NAN).is_err());
        assert!(Score::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_score_from_json() {
        assert_eq!(
            Score::from_json(&serde_json::json!(10)).unwrap(),
            Score::from(10)
        );
        assert!(Score::from_json(&serde_json::json!("x")).is_err());
        assert!(Score::from_json(&serde_json::json!(-1)).is_err());
        assert!(Score::from_json(&serde_json::Value::Null).is_err());
        assert!(Score::from_json(&serde_json::json!([1])).is_err());
    }

    #[test]
    fn test_score_serializes_integral_as_integer() {
        assert_eq!(serde_json::to_string(&Score::from(12)).unwrap(), "12");
        assert_eq!(
            serde_json::to_string(&Score::new(2.5).unwrap()).unwrap(),
            "2.5"
        );
    }

    #[test]
    fn test_default_record_json() {
        let json = serde_json::to_value(ScoreRecord::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "score": 0, "date": null }));
    }

    #[test]
    fn test_negative_stored_score_rejected() {
        let parsed: Result<ScoreRecord, _> =
            serde_json::from_str(r#"{ "score": -3, "date": null }"#);
        assert!(parsed.is_err());
    }
}
