//! Persistence error types.

use thiserror::Error;

/// Errors that can occur while reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the storage file.
    #[error("保存データの読み込みに失敗しました: {0}")]
    ReadFailed(String),

    /// Failed to write the storage file.
    #[error("保存データの書き込みに失敗しました: {0}")]
    WriteFailed(String),

    /// The stored content could not be (de)serialized.
    #[error("保存データの形式が不正です: {0}")]
    Corrupted(String),
}

impl StoreError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::ReadFailed(_) | Self::WriteFailed(_) => {
                "データディレクトリの権限を確認してください"
            }
            Self::Corrupted(_) => "storage.json を削除すると初期状態に戻ります",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::WriteFailed("disk full".to_string());
        assert!(err.to_string().contains("disk full"));

        let err = StoreError::Corrupted("expected value".to_string());
        assert!(err.to_string().contains("形式が不正"));
    }

    #[test]
    fn test_suggestion() {
        assert!(StoreError::ReadFailed("x".into()).suggestion().contains("権限"));
        assert!(StoreError::Corrupted("x".into())
            .suggestion()
            .contains("storage.json"));
    }
}
