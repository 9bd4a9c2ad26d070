//! The run level scale.
//!
//! Run levels form a bounded integer scale from `HALTED_PRE` (-1) to
//! `RUNNING_POST` (10). The four major levels (HALTED, STANDBY, CLEANUP,
//! RUNNING) are stable states the system can remain at; the values between
//! them are transitional pre/post markers that exist only so listeners get a
//! notification immediately before and after a major level is reached.
//! Service actions bind to levels by number; transitions only ever target a
//! major level.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// One point on the run level scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RunLevel {
    HaltedPre,
    Halted,
    HaltedPost,
    StandbyPre,
    Standby,
    StandbyPost,
    CleanupPre,
    Cleanup,
    CleanupPost,
    RunningPre,
    Running,
    RunningPost,
}

/// The four major levels, in ascending order.
pub const MAJOR_LEVELS: [RunLevel; 4] = [
    RunLevel::Halted,
    RunLevel::Standby,
    RunLevel::Cleanup,
    RunLevel::Running,
];

impl RunLevel {
    /// Numeric form of the level (-1 through 10).
    pub fn number(&self) -> i32 {
        match self {
            RunLevel::HaltedPre => -1,
            RunLevel::Halted => 0,
            RunLevel::HaltedPost => 1,
            RunLevel::StandbyPre => 2,
            RunLevel::Standby => 3,
            RunLevel::StandbyPost => 4,
            RunLevel::CleanupPre => 5,
            RunLevel::Cleanup => 6,
            RunLevel::CleanupPost => 7,
            RunLevel::RunningPre => 8,
            RunLevel::Running => 9,
            RunLevel::RunningPost => 10,
        }
    }

    /// Map a number back onto the scale. None for out-of-range values.
    pub fn from_number(number: i32) -> Option<RunLevel> {
        let level = match number {
            -1 => RunLevel::HaltedPre,
            0 => RunLevel::Halted,
            1 => RunLevel::HaltedPost,
            2 => RunLevel::StandbyPre,
            3 => RunLevel::Standby,
            4 => RunLevel::StandbyPost,
            5 => RunLevel::CleanupPre,
            6 => RunLevel::Cleanup,
            7 => RunLevel::CleanupPost,
            8 => RunLevel::RunningPre,
            9 => RunLevel::Running,
            10 => RunLevel::RunningPost,
            _ => return None,
        };
        Some(level)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunLevel::HaltedPre => "HALTED_PRE",
            RunLevel::Halted => "HALTED",
            RunLevel::HaltedPost => "HALTED_POST",
            RunLevel::StandbyPre => "STANDBY_PRE",
            RunLevel::Standby => "STANDBY",
            RunLevel::StandbyPost => "STANDBY_POST",
            RunLevel::CleanupPre => "CLEANUP_PRE",
            RunLevel::Cleanup => "CLEANUP",
            RunLevel::CleanupPost => "CLEANUP_POST",
            RunLevel::RunningPre => "RUNNING_PRE",
            RunLevel::Running => "RUNNING",
            RunLevel::RunningPost => "RUNNING_POST",
        }
    }

    /// Whether this is one of the four stable levels a transition may target.
    pub fn is_major(&self) -> bool {
        matches!(
            self,
            RunLevel::Halted | RunLevel::Standby | RunLevel::Cleanup | RunLevel::Running
        )
    }

    /// The next level up the scale. None at the top.
    pub fn next_up(&self) -> Option<RunLevel> {
        RunLevel::from_number(self.number() + 1)
    }

    /// The next level down the scale. None at the bottom.
    pub fn next_down(&self) -> Option<RunLevel> {
        RunLevel::from_number(self.number() - 1)
    }
}

impl std::fmt::Display for RunLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a run level from either its symbolic name or its numeric form
/// (e.g. "STANDBY", "standby", "3"). Unrecognized names and out-of-range
/// numbers are both errors.
pub fn parse_level(s: &str) -> std::result::Result<RunLevel, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Empty run level".to_string());
    }

    if let Ok(number) = s.parse::<i32>() {
        return RunLevel::from_number(number)
            .ok_or_else(|| format!("Run level out of range: {}", number));
    }

    let upper = s.to_uppercase();
    for number in -1..=10 {
        let level = RunLevel::from_number(number)
            .ok_or_else(|| format!("Run level out of range: {}", number))?;
        if level.as_str() == upper {
            return Ok(level);
        }
    }
    Err(format!("Unknown run level: {}", s))
}

impl FromStr for RunLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_level(s)
    }
}

impl Serialize for RunLevel {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RunLevel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(i32),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => {
                RunLevel::from_number(n).ok_or_else(|| {
                    serde::de::Error::custom(format!("Run level out of range: {}", n))
                })
            }
            Repr::Name(s) => parse_level(&s).map_err(serde::de::Error::custom),
        }
    }
}
