use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use fsutil_util::errors::FsError;

use crate::platform;

/// User configuration loaded from `~/.fsutil/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub size: SizeConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Directory walk defaults from `[size]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeConfig {
    /// 0 means unbounded.
    #[serde(default = "default_max_depth", rename = "max-depth")]
    pub max_depth: u32,
    /// Treat a partial sum as an error.
    #[serde(default)]
    pub strict: bool,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            strict: false,
        }
    }
}

fn default_max_depth() -> u32 {
    1
}

/// Presentation settings from `[output]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_human_readable", rename = "human-readable")]
    pub human_readable: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            human_readable: default_human_readable(),
        }
    }
}

fn default_human_readable() -> bool {
    true
}

impl GlobalConfig {
    /// Load from `~/.fsutil/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> Result<Self, FsError> {
        Self::load_from(&Self::default_path())
    }

    /// Load from an explicit path, or return defaults if it is not a file.
    pub fn load_from(path: &Path) -> Result<Self, FsError> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| FsError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| FsError::Config {
            message: format!("Failed to parse {}: {e}", path.display()),
        })
    }

    /// Returns the default path to the config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the fsutil data directory (`~/.fsutil/`).
pub fn dirs_path() -> PathBuf {
    let home = platform::home_dir().unwrap_or_else(|| ".".into());
    Path::new(&home).join(".fsutil")
}
