use serde::{Deserialize, Serialize};
use std::path::Path;

use pakt_util::errors::PaktError;

/// Default lockfile name, written next to the environment file.
pub const LOCKFILE: &str = "pakt.lock";

/// Lockfile recording an install plan, in install order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lockfile {
    #[serde(default)]
    pub package: Vec<LockedPackage>,
}

/// A single locked package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedPackage {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub depends: Vec<String>,
}

impl Lockfile {
    /// Wrap packages that are already in install order.
    pub fn generate(package: Vec<LockedPackage>) -> Self {
        Self { package }
    }

    /// Load and parse a `pakt.lock` file from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PaktError::Lockfile {
            message: format!("Failed to read lockfile: {e}"),
        })?;
        toml::from_str(&content).map_err(|e| {
            PaktError::Lockfile {
                message: format!("Failed to parse lockfile: {e}"),
            }
            .into()
        })
    }

    /// Serialize the lockfile to a pretty-printed TOML string.
    pub fn to_string_pretty(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Write the lockfile to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> miette::Result<()> {
        let content = self.to_string_pretty().map_err(|e| PaktError::Lockfile {
            message: format!("Failed to serialize lockfile: {e}"),
        })?;
        pakt_util::fs::write_creating_dirs(path, &content).map_err(PaktError::Io)?;
        Ok(())
    }

    pub fn locked_version(&self, name: &str) -> Option<&str> {
        self.package
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.version.as_str())
    }
}
