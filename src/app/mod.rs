//! Clock orchestration.
//!
//! [`ClockApp`] owns the preferences, the alarm collection and the world
//! clock list, and turns each one-second tick into a [`ClockFrame`]: hand
//! angles, digital and date lines, world clock readings, fired alarms and
//! the tick cue. Rendering and side effects are left to the caller.

pub mod alert;
pub mod config;
pub mod settings;

use chrono::{DateTime, TimeZone, Timelike, Utc};

use crate::alarm::{Alarm, AlarmStore};
use crate::clock::{
    digital_date, digital_time, rotation_angles, world_clock_readings, HandAngles,
    WorldClockReading,
};
use crate::store::KeyValueStore;
use crate::types::{Preferences, WorldClockEntry, WORLD_CLOCKS};

pub use alert::{Alert, AlertDispatcher, Delivery};
pub use config::{AppConfig, DATA_DIR_ENV};
pub use settings::Settings;

/// The tick cue sounds on every n-th second.
pub const TICK_SOUND_EVERY_SECS: u32 = 5;

/// Display values computed by one clock tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockFrame {
    /// Analog hand rotation (stepped when smooth motion is off)
    pub angles: HandAngles,
    /// `HH:MM:SS`, or None when the digital display is hidden
    pub digital: Option<String>,
    /// `Mon, Oct 19`
    pub date: String,
    /// One reading per world clock entry
    pub world: Vec<WorldClockReading>,
    /// Alarms that fired on this tick
    pub fired: Vec<Alarm>,
    /// Whether the tick cue should sound
    pub tick_sound: bool,
}

/// The clock application state.
pub struct ClockApp<S: KeyValueStore> {
    settings: Settings<S>,
    alarms: AlarmStore<S>,
    world_clocks: &'static [WorldClockEntry],
}

impl<S: KeyValueStore + Clone> ClockApp<S> {
    /// Loads preferences and alarms from `storage`.
    pub fn load(storage: S) -> Self {
        Self {
            settings: Settings::load(storage.clone()),
            alarms: AlarmStore::load(storage),
            world_clocks: WORLD_CLOCKS,
        }
    }
}

impl<S: KeyValueStore> ClockApp<S> {
    /// Replaces the world clock list.
    #[must_use]
    pub fn with_world_clocks(mut self, entries: &'static [WorldClockEntry]) -> Self {
        self.world_clocks = entries;
        self
    }

    pub fn preferences(&self) -> &Preferences {
        self.settings.preferences()
    }

    pub fn settings(&self) -> &Settings<S> {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings<S> {
        &mut self.settings
    }

    pub fn alarms(&self) -> &AlarmStore<S> {
        &self.alarms
    }

    pub fn alarms_mut(&mut self) -> &mut AlarmStore<S> {
        &mut self.alarms
    }

    /// Returns the world clock readings at `now`.
    pub fn world_clocks(&self, now: &DateTime<Utc>) -> Vec<WorldClockReading> {
        world_clock_readings(now, self.world_clocks, self.preferences().use_24_hour())
    }

    /// Computes the frame for `now`.
    ///
    /// `now` is interpreted in its own time zone for the clock face and the
    /// alarm match; world clocks use the underlying instant.
    pub fn tick<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> ClockFrame {
        let local = now.naive_local();
        let prefs = self.settings.preferences();
        let use_24_hour = prefs.use_24_hour();

        let angles = rotation_angles(&local);
        let angles = if prefs.smooth_motion {
            angles
        } else {
            angles.stepped()
        };

        let digital = prefs
            .show_digital
            .then(|| digital_time(&local, use_24_hour));
        let tick_sound = prefs.sound_enabled && local.second() % TICK_SOUND_EVERY_SECS == 0;

        let world = world_clock_readings(&now.with_timezone(&Utc), self.world_clocks, use_24_hour);

        let fired = self
            .alarms
            .matches(&local)
            .into_iter()
            .filter_map(|id| self.alarms.get(id).cloned())
            .collect();

        ClockFrame {
            angles,
            digital,
            date: digital_date(local.date()),
            world,
            fired,
            tick_sound,
        }
    }
}
