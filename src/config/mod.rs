use crate::catalog::Category;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Timeout for a single local version probe. Default: 5s.
    pub probe_timeout_secs: u64,
    /// Timeout for a whole update of one tool. Default: 10 minutes.
    pub update_timeout_secs: u64,
    /// How long the splash screen stays up before the dashboard opens.
    pub splash_millis: u64,
    /// Cosmetic frame timer (spinner, splash animation).
    pub tick_millis: u64,
    /// Catalog file overriding the built-in tool list.
    pub catalog: Option<PathBuf>,
    /// Extra categories that require explicit confirmation. RUNTIME is always protected.
    pub protected_categories: Vec<Category>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe_timeout_secs: 5,
            update_timeout_secs: 600,
            splash_millis: 2000,
            tick_millis: 120,
            catalog: None,
            protected_categories: vec![Category::Runtime],
        }
    }
}

impl Config {
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs.max(1))
    }

    #[must_use]
    pub fn update_timeout(&self) -> Duration {
        Duration::from_secs(self.update_timeout_secs.max(1))
    }

    #[must_use]
    pub fn splash_delay(&self) -> Duration {
        Duration::from_millis(self.splash_millis)
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(16))
    }

    /// Default location: `<config dir>/spark/config.toml`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("spark").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".spark/config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_file(path)
    }

    /// Load a file the user named explicitly; a missing file is an error.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }
}
