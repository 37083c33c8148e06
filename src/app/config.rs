//! Application configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::store::{FileStore, STORAGE_FILE_NAME};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "WALLCLOCK_DATA_DIR";

/// Name of the data directory under the home directory.
const DEFAULT_DIR_NAME: &str = ".wallclock";

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding `storage.json`
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Resolves the data directory.
    ///
    /// `data_dir` comes from `--data-dir` or `WALLCLOCK_DATA_DIR` (clap reads
    /// both); without either, `~/.wallclock` is used.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory was given and the home directory
    /// cannot be determined.
    pub fn resolve(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .map(|home| home.join(DEFAULT_DIR_NAME))
                .context("ホームディレクトリが見つかりません。--data-dir を指定してください")?,
        };

        Ok(Self { data_dir })
    }

    /// Returns the path of the storage file.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_FILE_NAME)
    }

    /// Opens the storage file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open_store(&self) -> Result<Arc<FileStore>> {
        let store = FileStore::open(self.storage_path())
            .with_context(|| format!("ストレージを開けません: {}", self.data_dir.display()))?;
        Ok(Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyValueStore;

    #[test]
    fn test_explicit_dir() {
        let config = AppConfig::resolve(Some(PathBuf::from("/tmp/wallclock-test"))).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/wallclock-test"));
        assert_eq!(
            config.storage_path(),
            PathBuf::from("/tmp/wallclock-test/storage.json")
        );
    }

    #[test]
    fn test_default_dir_is_under_home() {
        if let Ok(config) = AppConfig::resolve(None) {
            assert!(config.data_dir.ends_with(".wallclock"));
        }
    }

    #[test]
    fn test_open_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::resolve(Some(dir.path().to_path_buf())).unwrap();

        let store = config.open_store().unwrap();
        store.set("k", "v").unwrap();

        assert!(config.storage_path().exists());
    }

    #[test]
    fn test_open_corrupted_store_has_context() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORAGE_FILE_NAME), "{broken").unwrap();
        let config = AppConfig::resolve(Some(dir.path().to_path_buf())).unwrap();

        let err = config.open_store().unwrap_err();
        assert!(err.to_string().contains("ストレージを開けません"));
    }
}
