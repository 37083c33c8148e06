//! Alarm error types.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while managing alarms.
#[derive(Debug, Error)]
pub enum AlarmError {
    /// The alarm time is not `HH:MM` (00:00-23:59).
    #[error("時刻は HH:MM 形式で入力してください: {0}")]
    InvalidTimeFormat(String),

    /// No alarm at the given list position.
    #[error("アラーム番号が範囲外です: {index} (登録数: {len})")]
    IndexOutOfRange {
        /// Zero-based position that was requested
        index: usize,
        /// Number of alarms
        len: usize,
    },

    /// No alarm with the given id.
    #[error("アラームが見つかりません: {0}")]
    NotFound(String),

    /// The alarm collection could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AlarmError {
    /// Returns true if the user should be asked for input again.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidTimeFormat(_))
    }
}
