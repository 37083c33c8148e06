//! Persisted alarms and per-minute matching.
//!
//! Alarms are addressed by a stable [`AlarmId`]. Positional access
//! (`toggle_at`, `delete_at`) exists for numbered lists in the CLI and is
//! resolved to an id before mutating.
//!
//! Every mutation writes the whole collection to the backing
//! [`KeyValueStore`] before returning.

mod error;
mod model;

use std::collections::HashSet;

use chrono::{Datelike, NaiveDateTime, Timelike};
use tracing::{debug, info, warn};

use crate::store::{keys, KeyValueStore, StoreError};

pub use error::AlarmError;
pub use model::{Alarm, AlarmId, AlarmTime, DEFAULT_ALARM_LABEL};

/// Calendar minute used to scope the already-fired set.
type MinuteKey = (i32, u32, u32, u32);

fn minute_key(time: &NaiveDateTime) -> MinuteKey {
    (time.year(), time.ordinal(), time.hour(), time.minute())
}

fn parse_records(json: &str) -> Vec<Alarm> {
    let records = match serde_json::from_str::<Vec<serde_json::Value>>(json) {
        Ok(records) => records,
        Err(e) => {
            warn!("Stored alarms are unreadable, starting empty: {}", e);
            return Vec::new();
        }
    };

    records
        .into_iter()
        .enumerate()
        .filter_map(|(i, record)| match serde_json::from_value::<Alarm>(record) {
            Ok(alarm) => Some(alarm),
            Err(e) => {
                warn!("Skipping stored alarm #{}: {}", i + 1, e);
                None
            }
        })
        .collect()
}

/// The alarm collection plus the state needed to fire each alarm once per
/// matching minute.
#[derive(Debug)]
pub struct AlarmStore<S: KeyValueStore> {
    storage: S,
    alarms: Vec<Alarm>,
    /// Alarms already fired during `fired_minute`
    fired: HashSet<AlarmId>,
    fired_minute: Option<MinuteKey>,
}

impl<S: KeyValueStore> AlarmStore<S> {
    /// Loads the persisted alarms.
    ///
    /// Records that fail to parse are logged and skipped; the rest are kept.
    /// Unreadable data is logged and treated as an empty collection.
    pub fn load(storage: S) -> Self {
        let alarms = match storage.get(keys::ALARMS) {
            Some(json) => parse_records(&json),
            None => Vec::new(),
        };

        debug!("Loaded {} alarm(s)", alarms.len());

        Self {
            storage,
            alarms,
            fired: HashSet::new(),
            fired_minute: None,
        }
    }

    /// Returns the alarms in list order.
    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    /// Returns the alarm with the given id.
    pub fn get(&self, id: AlarmId) -> Option<&Alarm> {
        self.alarms.iter().find(|a| a.id == id)
    }

    /// Returns the backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Resolves a zero-based list position to an id.
    ///
    /// # Errors
    ///
    /// Returns `AlarmError::IndexOutOfRange` if there is no alarm at `index`.
    pub fn id_at(&self, index: usize) -> Result<AlarmId, AlarmError> {
        self.alarms
            .get(index)
            .map(|a| a.id)
            .ok_or(AlarmError::IndexOutOfRange {
                index,
                len: self.alarms.len(),
            })
    }

    /// Adds an active alarm.
    ///
    /// # Errors
    ///
    /// Returns `AlarmError::InvalidTimeFormat` if `time` is not `HH:MM`, or a
    /// store error if the collection could not be persisted.
    pub fn add(&mut self, time: &str, label: Option<&str>) -> Result<Alarm, AlarmError> {
        let time = AlarmTime::parse(time)?;
        let alarm = Alarm::new(time, label);
        self.alarms.push(alarm.clone());
        self.persist()?;

        info!("Alarm added: {} {}", alarm.time, alarm.label);
        Ok(alarm)
    }

    /// Flips the active flag of an alarm and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns `AlarmError::NotFound` for an unknown id, or a store error.
    pub fn toggle(&mut self, id: AlarmId) -> Result<bool, AlarmError> {
        let alarm = self
            .alarms
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AlarmError::NotFound(id.to_string()))?;
        alarm.active = !alarm.active;
        let active = alarm.active;
        self.persist()?;

        debug!("Alarm {} active={}", id, active);
        Ok(active)
    }

    /// Removes an alarm and returns it.
    ///
    /// # Errors
    ///
    /// Returns `AlarmError::NotFound` for an unknown id, or a store error.
    pub fn delete(&mut self, id: AlarmId) -> Result<Alarm, AlarmError> {
        let position = self
            .alarms
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| AlarmError::NotFound(id.to_string()))?;
        let removed = self.alarms.remove(position);
        self.fired.remove(&id);
        self.persist()?;

        info!("Alarm deleted: {} {}", removed.time, removed.label);
        Ok(removed)
    }

    /// Toggles the alarm at a zero-based list position.
    ///
    /// # Errors
    ///
    /// Returns `AlarmError::IndexOutOfRange`, or a store error.
    pub fn toggle_at(&mut self, index: usize) -> Result<bool, AlarmError> {
        let id = self.id_at(index)?;
        self.toggle(id)
    }

    /// Deletes the alarm at a zero-based list position.
    ///
    /// # Errors
    ///
    /// Returns `AlarmError::IndexOutOfRange`, or a store error.
    pub fn delete_at(&mut self, index: usize) -> Result<Alarm, AlarmError> {
        let id = self.id_at(index)?;
        self.delete(id)
    }

    /// Returns the alarms that fire at `now` (local wall time).
    ///
    /// An active alarm fires when its `HH:MM` equals `now` truncated to the
    /// minute, at most once per calendar minute.
    pub fn matches(&mut self, now: &NaiveDateTime) -> Vec<AlarmId> {
        let minute = minute_key(now);
        if self.fired_minute != Some(minute) {
            self.fired.clear();
            self.fired_minute = Some(minute);
        }

        let mut triggered = Vec::new();
        for alarm in &self.alarms {
            if alarm.active && alarm.time.matches(now) && self.fired.insert(alarm.id) {
                triggered.push(alarm.id);
            }
        }
        triggered
    }

    fn persist(&self) -> Result<(), AlarmError> {
        let json = serde_json::to_string(&self.alarms)
            .map_err(|e| StoreError::Corrupted(e.to_string()))?;
        self.storage.set(keys::ALARMS, &json)?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
