//! Elapsed-time formatting for the stopwatch, laps and the countdown timer.

/// Formats elapsed milliseconds as `HH:MM:SS.cc` (centiseconds, truncated).
///
/// Hours are not wrapped at 24.
#[must_use]
pub fn format_stopwatch(elapsed_ms: u64) -> String {
    let hours = elapsed_ms / 3_600_000;
    let minutes = (elapsed_ms % 3_600_000) / 60_000;
    let seconds = (elapsed_ms % 60_000) / 1000;
    let centis = (elapsed_ms % 1000) / 10;
    format!("{:02}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis)
}

/// Formats remaining milliseconds as `MM:SS`.
///
/// Minutes are not wrapped at 60. Negative values render as `00:00`.
#[must_use]
pub fn format_countdown(remaining_ms: i64) -> String {
    let remaining = remaining_ms.max(0);
    let minutes = remaining / 60_000;
    let seconds = (remaining % 60_000) / 1000;
    format!("{:02}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod stopwatch_format_tests {
        use super::*;

        #[test]
        fn test_zero() {
            assert_eq!(format_stopwatch(0), "00:00:00.00");
        }

        #[test]
        fn test_centiseconds_truncate() {
            assert_eq!(format_stopwatch(1_509), "00:00:01.50");
            assert_eq!(format_stopwatch(999), "00:00:00.99");
        }

        #[test]
        fn test_mixed() {
            let ms = 2 * 3_600_000 + 3 * 60_000 + 4 * 1000 + 560;
            assert_eq!(format_stopwatch(ms), "02:03:04.56");
        }

        #[test]
        fn test_hours_do_not_wrap() {
            assert_eq!(format_stopwatch(100 * 3_600_000), "100:00:00.00");
        }
    }

    mod countdown_format_tests {
        use super::*;

        #[test]
        fn test_zero() {
            assert_eq!(format_countdown(0), "00:00");
        }

        #[test]
        fn test_twenty_five_minutes() {
            assert_eq!(format_countdown(25 * 60_000), "25:00");
        }

        #[test]
        fn test_partial_seconds_truncate() {
            assert_eq!(format_countdown(59_999), "00:59");
        }

        #[test]
        fn test_minutes_do_not_wrap() {
            assert_eq!(format_countdown(90 * 60_000 + 5_000), "90:05");
        }

        #[test]
        fn test_negative_clamps() {
            assert_eq!(format_countdown(-1000), "00:00");
        }
    }
}
