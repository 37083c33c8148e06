//! Wallclock Library
//!
//! This library provides the core functionality for the wallclock CLI.
//! It includes:
//! - Clock face computation (hand angles, digital time, world clocks)
//! - Persisted alarms with once-per-minute firing
//! - Stopwatch and countdown timer engines
//! - Preferences persisted in a small key/value file
//! - Sound cues and desktop notifications for alerts
//! - CLI command parsing, display and interactive loops

pub mod alarm;
pub mod app;
pub mod cli;
pub mod clock;
pub mod engine;
pub mod notification;
pub mod sound;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Preferences, StopwatchPhase, StopwatchState, Theme, TimeFormat, TimerPhase, TimerState,
    WorldClockEntry, WORLD_CLOCKS,
};

pub use alarm::{Alarm, AlarmError, AlarmId, AlarmStore, AlarmTime};

pub use app::{Alert, AlertDispatcher, AppConfig, ClockApp, ClockFrame, Delivery, Settings};

pub use clock::{
    format_countdown, format_stopwatch, rotation_angles, Clock, ClockError, HandAngles,
    ManualClock, SystemClock, WorldClockReading,
};

pub use engine::{StopwatchEngine, StopwatchEvent, TimerEngine, TimerEvent};

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

// Re-export sound types
pub use sound::{MockSoundPlayer, RodioSoundPlayer, SoundCue, SoundError, SoundPlayer};

// Re-export notification types
pub use notification::{
    MockNotifier, NotificationError, NotificationKind, Notifier, PlatformNotifier,
};
