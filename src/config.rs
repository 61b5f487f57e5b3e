//! Configuration management.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration for cardbox.
#[derive(Debug, Clone)]
pub struct CardboxConfig {
    /// Directory holding the database file.
    pub data_dir: PathBuf,
    /// Database file name inside `data_dir`.
    pub database_file: String,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    /// Data directory.
    data_dir: Option<String>,
    /// Database file name.
    database_file: Option<String>,
}

impl Default for CardboxConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            database_file: "cardbox.db".to_string(),
        }
    }
}

impl CardboxConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Full path of the database file.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: e.to_string(),
            })?;

        let file: ConfigFile =
            toml::from_str(&contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Reads `<config dir>/cardbox/config.toml` when it exists; otherwise
    /// falls back to defaults with the platform data directory, and finally
    /// to the current directory when no home can be resolved.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let config_path = base_dirs.config_dir().join("cardbox").join("config.toml");
        if config_path.exists() {
            if let Ok(config) = Self::load_from_file(&config_path) {
                return config;
            }
        }

        Self {
            data_dir: base_dirs.data_dir().join("cardbox"),
            ..Self::default()
        }
    }

    /// Converts a parsed config file to a full config.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(data_dir) = file.data_dir {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Some(database_file) = file.database_file {
            config.database_file = database_file;
        }

        config
    }

    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = path.into();
        self
    }
}
