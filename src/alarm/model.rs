//! Alarm records.

use std::fmt;
use std::sync::LazyLock;

use chrono::Timelike;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::AlarmError;

/// Label used when the user leaves it empty.
pub const DEFAULT_ALARM_LABEL: &str = "アラーム";

static ALARM_TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-1]?[0-9]|2[0-3]):([0-5][0-9])$").expect("alarm time pattern is valid")
});

// ============================================================================
// AlarmId
// ============================================================================

/// Stable identifier of an alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlarmId(Uuid);

impl AlarmId {
    /// Generates a new random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// AlarmTime
// ============================================================================

/// Time of day an alarm fires at, with minute precision.
///
/// Accepts `H:MM` and `HH:MM` input; always displays zero-padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AlarmTime {
    hour: u8,
    minute: u8,
}

impl AlarmTime {
    /// Parses an `HH:MM` string.
    ///
    /// # Errors
    ///
    /// Returns `AlarmError::InvalidTimeFormat` unless the input matches
    /// `^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$`.
    pub fn parse(input: &str) -> Result<Self, AlarmError> {
        let invalid = || AlarmError::InvalidTimeFormat(input.to_string());
        let captures = ALARM_TIME_PATTERN.captures(input).ok_or_else(invalid)?;
        let hour = captures[1].parse().map_err(|_| invalid())?;
        let minute = captures[2].parse().map_err(|_| invalid())?;
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns true if `time` falls within this alarm's minute.
    pub fn matches<T: Timelike>(&self, time: &T) -> bool {
        time.hour() == u32::from(self.hour) && time.minute() == u32::from(self.minute)
    }
}

impl fmt::Display for AlarmTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl TryFrom<String> for AlarmTime {
    type Error = AlarmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AlarmTime> for String {
    fn from(time: AlarmTime) -> Self {
        time.to_string()
    }
}

// ============================================================================
// Alarm
// ============================================================================

fn default_label() -> String {
    DEFAULT_ALARM_LABEL.to_string()
}

/// A persisted alarm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    /// Stable identifier (generated for records saved without one)
    #[serde(default = "AlarmId::generate")]
    pub id: AlarmId,
    /// Time of day
    pub time: AlarmTime,
    /// User label
    #[serde(default = "default_label")]
    pub label: String,
    /// Whether the alarm is armed
    pub active: bool,
}

impl Alarm {
    /// Creates an active alarm with a fresh id.
    ///
    /// An empty label is replaced with [`DEFAULT_ALARM_LABEL`].
    #[must_use]
    pub fn new(time: AlarmTime, label: Option<&str>) -> Self {
        let label = label
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .unwrap_or_else(default_label);
        Self {
            id: AlarmId::generate(),
            time,
            label,
            active: true,
        }
    }
}
