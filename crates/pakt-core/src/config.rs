use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use pakt_util::errors::PaktError;

use crate::channel::ChannelOrder;

/// Global user configuration loaded from `~/.pakt/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Channels in priority order, first = highest.
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,

    /// Specs merged into every root spec set.
    #[serde(default, rename = "default-packages")]
    pub default_packages: Vec<String>,

    /// Never touch anything but the local repodata cache.
    #[serde(default)]
    pub offline: bool,

    #[serde(default)]
    pub cache: CacheConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            default_packages: Vec::new(),
            offline: false,
            cache: CacheConfig::default(),
        }
    }
}

fn default_channels() -> Vec<String> {
    vec![crate::channel::DEFAULTS_ALIAS.to_string()]
}

/// Repodata cache settings from `[cache]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> String {
    "~/.pakt/pkgs".to_string()
}

impl GlobalConfig {
    /// Load the global configuration from `~/.pakt/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load a configuration file from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| PaktError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| {
            PaktError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Configured channels with `defaults` expanded.
    pub fn channel_order(&self) -> ChannelOrder {
        ChannelOrder::new(&self.channels)
    }

    /// Cache directory with `~` expanded.
    pub fn cache_dir(&self) -> PathBuf {
        pakt_util::fs::expand_home(&self.cache.dir)
    }
}

/// Returns the path to the pakt data directory (`~/.pakt/`).
pub fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".pakt")
}
