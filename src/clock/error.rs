//! Time formatting error types.

use thiserror::Error;

/// Errors that can occur while formatting times.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClockError {
    /// The time zone identifier is not a known IANA zone.
    #[error("不明なタイムゾーンです: {0}")]
    InvalidTimezone(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClockError::InvalidTimezone("Mars/Olympus".to_string());
        assert!(err.to_string().contains("Mars/Olympus"));
        assert!(err.to_string().contains("タイムゾーン"));
    }
}
