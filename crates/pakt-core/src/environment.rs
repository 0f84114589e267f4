//! Environment description files (`environment.toml`).

use std::path::Path;

use pakt_util::errors::PaktError;
use serde::{Deserialize, Serialize};

/// File name looked up when no environment file is given explicitly.
pub const ENVIRONMENT_FILE: &str = "environment.toml";

/// A named set of requested specs and the channels to search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub name: Option<String>,
    /// Channel override; `None` means use the configured channels.
    #[serde(default)]
    pub channels: Option<Vec<String>>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Environment {
    pub fn parse_toml(content: &str) -> miette::Result<Self> {
        let env: Environment = toml::from_str(content).map_err(|e| PaktError::Environment {
            message: format!("Failed to parse environment file: {e}"),
        })?;
        if env.dependencies.iter().any(|d| d.trim().is_empty()) {
            return Err(PaktError::Environment {
                message: "dependencies must not contain empty specs".to_string(),
            }
            .into());
        }
        Ok(env)
    }

    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PaktError::Environment {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse_toml(&content)
    }
}
