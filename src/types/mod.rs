//! Core data types for the clock.
//!
//! This module defines the data structures used for:
//! - User preferences (time format, theme, display flags)
//! - World clock entries
//! - Stopwatch and countdown timer state

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// TimeFormat
// ============================================================================

/// Clock display format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    /// 00-23 hours
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    /// 01-12 hours with AM/PM suffix
    #[serde(rename = "12h")]
    TwelveHour,
}

impl TimeFormat {
    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFormat::TwentyFourHour => "24h",
            TimeFormat::TwelveHour => "12h",
        }
    }

    /// Returns true for the 24-hour format.
    pub fn is_24_hour(&self) -> bool {
        matches!(self, TimeFormat::TwentyFourHour)
    }

    /// Returns the other format.
    pub fn toggled(&self) -> Self {
        match self {
            TimeFormat::TwentyFourHour => TimeFormat::TwelveHour,
            TimeFormat::TwelveHour => TimeFormat::TwentyFourHour,
        }
    }
}

impl FromStr for TimeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(TimeFormat::TwentyFourHour),
            "12h" => Ok(TimeFormat::TwelveHour),
            other => Err(format!("不明な時刻形式です: {} (24h または 12h)", other)),
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Theme
// ============================================================================

/// Color theme of the clock face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Returns the persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Returns the other theme.
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("不明なテーマです: {} (dark または light)", other)),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Preferences
// ============================================================================

/// User preferences for the clock.
///
/// Loaded once at startup and persisted key by key on every change
/// (see [`crate::app::Settings`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// 24-hour or 12-hour display
    pub time_format: TimeFormat,
    /// Whether tick and alarm sounds are played
    pub sound_enabled: bool,
    /// Whether the accent color is applied
    pub glow_enabled: bool,
    /// Whether the second hand moves continuously
    pub smooth_motion: bool,
    /// Whether the digital time line is shown
    pub show_digital: bool,
    /// Color theme
    pub theme: Theme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            time_format: TimeFormat::TwentyFourHour,
            sound_enabled: true,
            glow_enabled: true,
            smooth_motion: true,
            show_digital: true,
            theme: Theme::Dark,
        }
    }
}

impl Preferences {
    /// Returns true if the clock displays 24-hour time.
    pub fn use_24_hour(&self) -> bool {
        self.time_format.is_24_hour()
    }
}

// ============================================================================
// WorldClockEntry
// ============================================================================

/// A city shown in the world clock panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldClockEntry {
    /// City display name
    pub city: &'static str,
    /// IANA time zone identifier
    pub timezone: &'static str,
}

impl WorldClockEntry {
    /// Returns the short zone label (the part after the first `/`).
    pub fn zone_label(&self) -> &'static str {
        self.timezone
            .split_once('/')
            .map(|(_, rest)| rest)
            .unwrap_or(self.timezone)
    }
}

/// Cities compiled into the world clock panel.
pub const WORLD_CLOCKS: &[WorldClockEntry] = &[
    WorldClockEntry {
        city: "New York",
        timezone: "America/New_York",
    },
    WorldClockEntry {
        city: "London",
        timezone: "Europe/London",
    },
    WorldClockEntry {
        city: "Tokyo",
        timezone: "Asia/Tokyo",
    },
    WorldClockEntry {
        city: "Sydney",
        timezone: "Australia/Sydney",
    },
    WorldClockEntry {
        city: "Dubai",
        timezone: "Asia/Dubai",
    },
    WorldClockEntry {
        city: "Paris",
        timezone: "Europe/Paris",
    },
];

// ============================================================================
// StopwatchState
// ============================================================================

/// Represents the current phase of the stopwatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopwatchPhase {
    /// Never started, or reset
    #[default]
    Stopped,
    /// Sampling the clock
    Running,
    /// Holding the elapsed time
    Paused,
}

impl StopwatchPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            StopwatchPhase::Stopped => "stopped",
            StopwatchPhase::Running => "running",
            StopwatchPhase::Paused => "paused",
        }
    }
}

/// Snapshot of the stopwatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopwatchState {
    /// Current phase
    pub phase: StopwatchPhase,
    /// Elapsed milliseconds at the last sample
    pub elapsed_ms: u64,
    /// Elapsed milliseconds recorded at each lap
    pub laps: Vec<u64>,
}

impl StopwatchState {
    /// Returns true if the stopwatch is sampling the clock.
    pub fn is_running(&self) -> bool {
        self.phase == StopwatchPhase::Running
    }

    /// Returns true if nothing has been recorded since the last reset.
    pub fn is_pristine(&self) -> bool {
        self.phase == StopwatchPhase::Stopped && self.elapsed_ms == 0 && self.laps.is_empty()
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Duration used by `reset` when no duration has ever been set (25 minutes).
pub const DEFAULT_TIMER_MS: i64 = 25 * 60 * 1000;

/// Amount subtracted from the remaining time on each timer tick.
pub const TIMER_DECREMENT_MS: i64 = 1000;

/// Represents the current phase of the countdown timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Waiting to be started
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Holding the remaining time
    Paused,
    /// Reached zero
    Expired,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Expired => "expired",
        }
    }
}

/// Represents the current state of the countdown timer.
///
/// The remaining time is decremented by a fixed amount per tick instead of
/// being sampled from the clock, so it can drift from real elapsed time when
/// ticks are delayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Current phase
    pub phase: TimerPhase,
    /// Remaining milliseconds (may go below zero on the final tick)
    pub remaining_ms: i64,
    /// Duration restored by `reset`
    #[serde(skip_serializing_if = "Option::is_none")]
    original_ms: Option<i64>,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerState {
    /// Creates an idle timer with no duration.
    pub fn new() -> Self {
        Self {
            phase: TimerPhase::Idle,
            remaining_ms: 0,
            original_ms: None,
        }
    }

    /// Returns the duration `reset` restores.
    pub fn original_ms(&self) -> i64 {
        self.original_ms.unwrap_or(DEFAULT_TIMER_MS)
    }

    /// Sets both the remaining and the original duration and returns to idle.
    pub fn set_duration(&mut self, minutes: u32) {
        let ms = i64::from(minutes) * 60_000;
        self.remaining_ms = ms;
        self.original_ms = Some(ms);
        self.phase = TimerPhase::Idle;
    }

    /// Switches to running. The original duration is captured when starting
    /// from idle.
    pub fn start(&mut self) {
        if self.phase == TimerPhase::Idle {
            self.original_ms = Some(self.remaining_ms);
        }
        self.phase = TimerPhase::Running;
    }

    /// Pauses the timer.
    ///
    /// Only works if timer is currently running.
    pub fn pause(&mut self) {
        if self.phase == TimerPhase::Running {
            self.phase = TimerPhase::Paused;
        }
    }

    /// Returns to idle with the original duration.
    pub fn reset(&mut self) {
        self.phase = TimerPhase::Idle;
        self.remaining_ms = self.original_ms();
    }

    /// Decrements the timer by one fixed step.
    ///
    /// Returns true if this tick expired the timer. Ticks outside the running
    /// phase are ignored.
    pub fn tick(&mut self) -> bool {
        if self.phase != TimerPhase::Running {
            return false;
        }
        self.remaining_ms -= TIMER_DECREMENT_MS;
        if self.remaining_ms <= 0 {
            self.phase = TimerPhase::Expired;
            return true;
        }
        false
    }

    /// Returns true if the timer is counting down.
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Returns true if the timer is paused.
    pub fn is_paused(&self) -> bool {
        self.phase == TimerPhase::Paused
    }
}

// ============================================================================
// Tests
// ============================================================================
