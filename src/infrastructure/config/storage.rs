//! `config.toml` location and loading.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available on this platform")]
    ConfigDirNotFound,
    #[error("config file io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize default config: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Finds and reads the configuration file.
///
/// A missing file is created with defaults so users have something to edit.
/// A file that fails to parse is left untouched and defaults are used.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Uses the platform config directory.
    ///
    /// # Errors
    /// Returns [`ConfigError::ConfigDirNotFound`] when no home directory is known.
    pub fn new() -> Result<Self, ConfigError> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| Self::at(dirs.config_dir()))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    #[must_use]
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path that [`load`](Self::load) reads for the given override.
    #[must_use]
    pub fn path(&self, path_override: Option<&Path>) -> PathBuf {
        path_override.map_or_else(|| self.dir.join(CONFIG_FILE_NAME), Path::to_path_buf)
    }

    /// Reads the configuration from `path_override` or the default location.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, or if a missing file cannot
    /// be created.
    pub fn load(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = self.path(path_override);

        if !path.exists() {
            info!(path = %path.display(), "No config file, writing defaults");
            let config = AppConfig::default();
            write_atomic(&path, &toml::to_string_pretty(&config)?)?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path)?;
        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => {
                debug!(path = %path.display(), "Config loaded");
                Ok(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Config file is invalid, using defaults");
                Ok(AppConfig::default())
            }
        }
    }
}

/// Writes through a temp file in the target directory so readers never see
/// a half-written config.
fn write_atomic(path: &Path, content: &str) -> Result<(), ConfigError> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::other("config path has no parent directory"))?;
    fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_written_and_reloads() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::at(dir.path().join("photomania"));

        let first = store.load(None).unwrap();
        let written = store.path(None);
        assert!(written.exists());

        let contents = fs::read_to_string(&written).unwrap();
        assert!(contents.contains("[api]"));
        assert!(contents.contains("prefetch_threshold"));

        let second = store.load(None).unwrap();
        assert_eq!(second.api.base_url, first.api.base_url);
        assert_eq!(second.cache.max_images, first.cache.max_images);
    }

    #[test]
    fn test_invalid_file_falls_back_and_is_kept() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::at(dir.path());
        fs::write(store.path(None), "[cache\nmax_images = ").unwrap();

        let config = store.load(None).unwrap();

        assert_eq!(config.cache.max_images, AppConfig::default().cache.max_images);
        assert_eq!(
            fs::read_to_string(store.path(None)).unwrap(),
            "[cache\nmax_images = "
        );
    }

    #[test]
    fn test_override_path_wins_over_directory() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::at(dir.path().join("unused"));
        let custom = dir.path().join("custom.toml");
        fs::write(&custom, "[feed]\nprefetch_threshold = 0.5\n").unwrap();

        let config = store.load(Some(&custom)).unwrap();

        assert!((config.feed.prefetch_threshold - 0.5).abs() < f64::EPSILON);
        assert!(!dir.path().join("unused").exists());
    }

    #[test]
    fn test_override_in_new_directory_is_created() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::at(dir.path());
        let nested = dir.path().join("a").join("b").join("photomania.toml");

        store.load(Some(&nested)).unwrap();

        assert!(nested.exists());
    }
}
