//! User preferences backed by the key/value store.

use std::str::FromStr;

use tracing::{debug, warn};

use crate::store::{keys, KeyValueStore, StoreError};
use crate::types::{Preferences, Theme, TimeFormat};

const ON: &str = "on";
const OFF: &str = "off";

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        ON
    } else {
        OFF
    }
}

fn parse_on_off(value: &str) -> Option<bool> {
    match value {
        ON => Some(true),
        OFF => Some(false),
        _ => None,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    value.parse().ok()
}

/// Preferences plus the storage they are persisted to.
///
/// Loaded once; every setter writes its own key through immediately.
#[derive(Debug)]
pub struct Settings<S: KeyValueStore> {
    storage: S,
    prefs: Preferences,
}

impl<S: KeyValueStore> Settings<S> {
    /// Loads preferences, keeping the default for any missing or
    /// unrecognized value.
    pub fn load(storage: S) -> Self {
        let defaults = Preferences::default();

        let prefs = Preferences {
            time_format: read(&storage, keys::TIME_FORMAT, |v| TimeFormat::from_str(v).ok())
                .unwrap_or(defaults.time_format),
            sound_enabled: read(&storage, keys::SOUND, parse_on_off)
                .unwrap_or(defaults.sound_enabled),
            glow_enabled: read(&storage, keys::GLOW, parse_on_off)
                .unwrap_or(defaults.glow_enabled),
            smooth_motion: read(&storage, keys::SMOOTH_MOTION, parse_bool)
                .unwrap_or(defaults.smooth_motion),
            show_digital: read(&storage, keys::SHOW_DIGITAL, parse_bool)
                .unwrap_or(defaults.show_digital),
            theme: read(&storage, keys::THEME, |v| Theme::from_str(v).ok())
                .unwrap_or(defaults.theme),
        };

        debug!("Loaded preferences: {:?}", prefs);

        Self { storage, prefs }
    }

    /// Returns the current preferences.
    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn set_time_format(&mut self, format: TimeFormat) -> Result<(), StoreError> {
        self.prefs.time_format = format;
        self.storage.set(keys::TIME_FORMAT, format.as_str())
    }

    pub fn set_sound(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.prefs.sound_enabled = enabled;
        self.storage.set(keys::SOUND, on_off(enabled))
    }

    pub fn set_glow(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.prefs.glow_enabled = enabled;
        self.storage.set(keys::GLOW, on_off(enabled))
    }

    pub fn set_smooth_motion(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.prefs.smooth_motion = enabled;
        self.storage
            .set(keys::SMOOTH_MOTION, if enabled { "true" } else { "false" })
    }

    pub fn set_show_digital(&mut self, shown: bool) -> Result<(), StoreError> {
        self.prefs.show_digital = shown;
        self.storage
            .set(keys::SHOW_DIGITAL, if shown { "true" } else { "false" })
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), StoreError> {
        self.prefs.theme = theme;
        self.storage.set(keys::THEME, theme.as_str())
    }

    /// Switches between 24-hour and 12-hour display. Returns the new format.
    pub fn toggle_time_format(&mut self) -> Result<TimeFormat, StoreError> {
        let format = self.prefs.time_format.toggled();
        self.set_time_format(format)?;
        Ok(format)
    }

    /// Returns the new state.
    pub fn toggle_sound(&mut self) -> Result<bool, StoreError> {
        let enabled = !self.prefs.sound_enabled;
        self.set_sound(enabled)?;
        Ok(enabled)
    }

    /// Returns the new state.
    pub fn toggle_glow(&mut self) -> Result<bool, StoreError> {
        let enabled = !self.prefs.glow_enabled;
        self.set_glow(enabled)?;
        Ok(enabled)
    }

    /// Returns the new state.
    pub fn toggle_smooth_motion(&mut self) -> Result<bool, StoreError> {
        let enabled = !self.prefs.smooth_motion;
        self.set_smooth_motion(enabled)?;
        Ok(enabled)
    }

    /// Returns the new state.
    pub fn toggle_show_digital(&mut self) -> Result<bool, StoreError> {
        let shown = !self.prefs.show_digital;
        self.set_show_digital(shown)?;
        Ok(shown)
    }

    /// Returns the new theme.
    pub fn toggle_theme(&mut self) -> Result<Theme, StoreError> {
        let theme = self.prefs.theme.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }
}

fn read<S, T>(storage: &S, key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T>
where
    S: KeyValueStore,
{
    let value = storage.get(key)?;
    let parsed = parse(&value);
    if parsed.is_none() {
        warn!("Ignoring unrecognized value for '{}': {:?}", key, value);
    }
    parsed
}
