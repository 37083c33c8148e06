//! Time formatting for the clock face.
//!
//! This module turns points in time into display values:
//! - Analog hand rotation angles
//! - Digital `HH:MM:SS` strings (24-hour or 12-hour)
//! - Date lines
//! - Wall-clock time in arbitrary IANA time zones
//!
//! Everything here is pure; rendering lives in [`crate::cli::display`].

pub mod duration;
mod error;
mod source;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::types::WorldClockEntry;

pub use duration::{format_countdown, format_stopwatch};
pub use error::ClockError;
pub use source::{Clock, ManualClock, SystemClock};

/// Placeholder shown when a world clock cannot be resolved.
pub const UNKNOWN_TIME: &str = "--:--:--";

// ============================================================================
// HandAngles
// ============================================================================

/// Rotation of each analog hand in degrees, clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl HandAngles {
    /// Returns the angles with the second hand snapped to whole seconds.
    #[must_use]
    pub fn stepped(self) -> Self {
        Self {
            second: (self.second / 6.0).floor() * 6.0,
            ..self
        }
    }
}

/// Computes continuous hand angles for a time of day.
///
/// - second: `seconds * 6 + milliseconds * 0.006`
/// - minute: `minutes * 6 + seconds * 0.1`
/// - hour: `(hours % 12) * 30 + minutes * 0.5`
#[must_use]
pub fn rotation_angles<T: Timelike>(time: &T) -> HandAngles {
    // nanosecond() exceeds 999_999_999 during a leap second
    let millis = (time.nanosecond() / 1_000_000).min(999);
    let seconds = f64::from(time.second());
    let minutes = f64::from(time.minute());
    let hours = f64::from(time.hour() % 12);

    HandAngles {
        hour: hours * 30.0 + minutes * 0.5,
        minute: minutes * 6.0 + seconds * 0.1,
        second: seconds * 6.0 + f64::from(millis) * 0.006,
    }
}

// ============================================================================
// Digital display
// ============================================================================

/// Formats a time of day as `HH:MM:SS`, with an ` AM`/` PM` suffix in
/// 12-hour mode.
#[must_use]
pub fn digital_time<T: Timelike>(time: &T, use_24_hour: bool) -> String {
    let hours = time.hour();
    if use_24_hour {
        return format!("{:02}:{:02}:{:02}", hours, time.minute(), time.second());
    }

    let display_hours = match hours % 12 {
        0 => 12,
        h => h,
    };
    let suffix = if hours >= 12 { "PM" } else { "AM" };
    format!(
        "{:02}:{:02}:{:02} {}",
        display_hours,
        time.minute(),
        time.second(),
        suffix
    )
}

/// Formats a date as `Mon, Oct 19`.
#[must_use]
pub fn digital_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

// ============================================================================
// Time zones
// ============================================================================

/// Parses an IANA time zone identifier.
///
/// # Errors
///
/// Returns `ClockError::InvalidTimezone` for unknown identifiers.
pub fn parse_timezone(timezone: &str) -> Result<Tz, ClockError> {
    timezone
        .parse::<Tz>()
        .map_err(|_| ClockError::InvalidTimezone(timezone.to_string()))
}

/// Formats the wall-clock time of `instant` in `timezone`.
///
/// # Errors
///
/// Returns `ClockError::InvalidTimezone` for unknown identifiers.
pub fn zoned_time(
    instant: &DateTime<Utc>,
    timezone: &str,
    use_24_hour: bool,
) -> Result<String, ClockError> {
    let tz = parse_timezone(timezone)?;
    Ok(digital_time(&instant.with_timezone(&tz), use_24_hour))
}

/// One line of the world clock panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldClockReading {
    pub city: &'static str,
    pub zone_label: &'static str,
    pub time: String,
}

/// Computes a reading for every entry.
///
/// Entries whose zone cannot be resolved show [`UNKNOWN_TIME`].
#[must_use]
pub fn world_clock_readings(
    instant: &DateTime<Utc>,
    entries: &[WorldClockEntry],
    use_24_hour: bool,
) -> Vec<WorldClockReading> {
    entries
        .iter()
        .map(|entry| {
            let time = zoned_time(instant, entry.timezone, use_24_hour).unwrap_or_else(|e| {
                warn!("World clock '{}' unavailable: {}", entry.city, e);
                UNKNOWN_TIME.to_string()
            });
            WorldClockReading {
                city: entry.city,
                zone_label: entry.zone_label(),
                time,
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone};

    fn time(h: u32, m: u32, s: u32, ms: u32) -> NaiveTime {
        NaiveTime::from_hms_milli_opt(h, m, s, ms).unwrap()
    }

    // ------------------------------------------------------------------------
    // Rotation Tests
    // ------------------------------------------------------------------------

    mod rotation_tests {
        use super::*;

        #[test]
        fn test_midnight_is_zero() {
            let angles = rotation_angles(&time(0, 0, 0, 0));
            assert_eq!(angles.hour, 0.0);
            assert_eq!(angles.minute, 0.0);
            assert_eq!(angles.second, 0.0);
        }

        #[test]
        fn test_three_fifteen_thirty() {
            let angles = rotation_angles(&time(15, 15, 30, 500));
            assert!((angles.hour - 97.5).abs() < 1e-9);
            assert!((angles.minute - 93.0).abs() < 1e-9);
            assert!((angles.second - 183.0).abs() < 1e-9);
        }

        #[test]
        fn test_second_hand_stays_below_360() {
            let angles = rotation_angles(&time(23, 59, 59, 999));
            assert!(angles.second < 360.0);
            assert!(angles.second >= 0.0);
        }

        #[test]
        fn test_second_hand_monotonic_within_minute() {
            let mut previous = -1.0;
            for ms in (0..60_000).step_by(250) {
                let t = time(10, 20, ms / 1000, ms % 1000);
                let angle = rotation_angles(&t).second;
                assert!((0.0..360.0).contains(&angle));
                assert!(angle > previous, "angle {} not above {}", angle, previous);
                previous = angle;
            }
            // wraps back at the next minute
            assert_eq!(rotation_angles(&time(10, 21, 0, 0)).second, 0.0);
        }

        #[test]
        fn test_stepped_drops_milliseconds() {
            let angles = rotation_angles(&time(1, 2, 3, 900)).stepped();
            assert!((angles.second - 18.0).abs() < 1e-9);
            assert!((angles.minute - 12.3).abs() < 1e-9);
        }
    }

    // ------------------------------------------------------------------------
    // Digital Display Tests
    // ------------------------------------------------------------------------

    mod digital_tests {
        use super::*;

        #[test]
        fn test_24_hour() {
            assert_eq!(digital_time(&time(7, 5, 9, 0), true), "07:05:09");
            assert_eq!(digital_time(&time(23, 59, 59, 0), true), "23:59:59");
        }

        #[test]
        fn test_12_hour_midnight_is_twelve_am() {
            assert_eq!(digital_time(&time(0, 0, 0, 0), false), "12:00:00 AM");
        }

        #[test]
        fn test_12_hour_noon_is_twelve_pm() {
            assert_eq!(digital_time(&time(12, 30, 0, 0), false), "12:30:00 PM");
        }

        #[test]
        fn test_12_hour_afternoon() {
            assert_eq!(digital_time(&time(13, 0, 0, 0), false), "01:00:00 PM");
        }

        #[test]
        fn test_date_line() {
            let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
            assert_eq!(digital_date(date), "Mon, Oct 19");
            let date = NaiveDate::from_ymd_opt(2024, 2, 3).unwrap();
            assert_eq!(digital_date(date), "Sat, Feb 3");
        }
    }

    // ------------------------------------------------------------------------
    // Time Zone Tests
    // ------------------------------------------------------------------------

    mod zone_tests {
        use super::*;
        use crate::types::WORLD_CLOCKS;

        fn noon_utc() -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
        }

        #[test]
        fn test_zoned_time_independent_of_host() {
            let instant = noon_utc();
            assert_eq!(zoned_time(&instant, "Asia/Tokyo", true).unwrap(), "21:00:00");
            assert_eq!(
                zoned_time(&instant, "America/New_York", true).unwrap(),
                "07:00:00"
            );
            assert_eq!(
                zoned_time(&instant, "Asia/Tokyo", false).unwrap(),
                "09:00:00 PM"
            );
        }

        #[test]
        fn test_zoned_time_follows_daylight_saving() {
            let summer = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
            assert_eq!(zoned_time(&summer, "Europe/London", true).unwrap(), "13:00:00");
        }

        #[test]
        fn test_invalid_timezone() {
            let result = zoned_time(&noon_utc(), "Mars/Olympus_Mons", true);
            assert_eq!(
                result,
                Err(ClockError::InvalidTimezone("Mars/Olympus_Mons".to_string()))
            );
        }

        #[test]
        fn test_world_clock_readings() {
            let readings = world_clock_readings(&noon_utc(), WORLD_CLOCKS, true);
            assert_eq!(readings.len(), WORLD_CLOCKS.len());
            assert_eq!(readings[2].city, "Tokyo");
            assert_eq!(readings[2].zone_label, "Tokyo");
            assert_eq!(readings[2].time, "21:00:00");
        }

        #[test]
        fn test_world_clock_unknown_zone_placeholder() {
            let entries = [WorldClockEntry {
                city: "Nowhere",
                timezone: "Nowhere/Land",
            }];
            let readings = world_clock_readings(&noon_utc(), &entries, true);
            assert_eq!(readings[0].time, UNKNOWN_TIME);
            assert_eq!(readings[0].zone_label, "Land");
        }
    }
}
