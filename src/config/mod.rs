use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    core::utils::{ensure_dir, replace_file, PathResolver},
    errors::{Result, TrackerError},
};

const DEFAULT_INSIGHT_TIMEOUT_SECS: u64 = 30;

/// Runtime knobs for an embedded tracker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Overrides the application directory that holds the store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub insight_timeout_secs: u64,
    pub pretty_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            insight_timeout_secs: DEFAULT_INSIGHT_TIMEOUT_SECS,
            pretty_json: true,
        }
    }
}

impl Config {
    pub fn insight_timeout(&self) -> Duration {
        Duration::from_secs(self.insight_timeout_secs)
    }

    pub fn data_dir(&self) -> PathBuf {
        PathResolver::resolve_base(self.data_dir.clone())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        let path = PathResolver::config_file_in(&base);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self { path })
    }

    /// Missing file means defaults; a file that does not parse is an error.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            TrackerError::Config(format!("{}: {}", self.path.display(), err))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        replace_file(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
