use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::error::{BoardError, BoardResult};
use crate::models::Millis;
use crate::storage::default_data_dir;

pub const CONFIG_FILE: &str = "config.toml";

/// Board settings, read from `config.toml` in the data directory.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// How often expired tasks are purged.
    pub sweep_interval_secs: u64,
    /// How often every collection is written out.
    pub flush_interval_secs: u64,
    pub leaderboard_limit: usize,
    /// Neighborhood given to tasks posted without one.
    pub default_neighborhood: String,
    /// Neighborhoods offered when posting, in display order.
    pub neighborhoods: Vec<String>,
    /// Nickname recorded when a helper leaves theirs blank.
    pub default_helper: String,
    /// Time needed given to tasks posted with `0` minutes.
    pub default_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 5 * 60,
            flush_interval_secs: 30,
            leaderboard_limit: 10,
            default_neighborhood: "My Street".to_string(),
            neighborhoods: vec!["My Street".to_string()],
            default_helper: "Helper".to_string(),
            default_minutes: 10,
        }
    }
}

impl Config {
    /// Parses a config file. A missing file is not an error.
    pub fn from_file(path: &Path) -> BoardResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|e| BoardError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| BoardError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Loads `<data_dir>/config.toml`, logging and ignoring a bad file.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(CONFIG_FILE);
        Self::from_file(&path).unwrap_or_else(|e| {
            warn!(error = %e, "using default config");
            Self::default()
        })
    }

    /// Loads from the default data directory.
    pub fn load_default() -> (PathBuf, Self) {
        let dir = default_data_dir();
        let config = Self::load(&dir);
        (dir, config)
    }

    pub fn sweep_period_ms(&self) -> Millis {
        secs_to_ms(self.sweep_interval_secs)
    }

    pub fn flush_period_ms(&self) -> Millis {
        secs_to_ms(self.flush_interval_secs)
    }
}

fn secs_to_ms(secs: u64) -> Millis {
    Millis::try_from(secs.saturating_mul(1000)).unwrap_or(Millis::MAX)
}
