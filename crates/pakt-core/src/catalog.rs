//! The read-only package catalog handed to the resolver.
//!
//! A catalog maps package name to version string to [`Metadata`]. It can be
//! read from a flat JSON document, from conda-style `repodata.json` files, or
//! assembled from a local per-channel cache with [`fetch_catalog`].

use std::collections::BTreeMap;
use std::path::Path;

use pakt_util::errors::PaktError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::channel::ChannelOrder;

/// Per-version package metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Dependency spec strings, e.g. `"numpy >=1.16,<2"`.
    #[serde(default)]
    pub depends: Vec<String>,
    /// Channel the package came from.
    #[serde(default)]
    pub channel: String,
    /// Archive filename within the channel.
    #[serde(default)]
    pub filename: String,
}

/// `name -> version -> metadata`, sorted for deterministic iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    packages: BTreeMap<String, BTreeMap<String, Metadata>>,
}

/// Shape of a conda `repodata.json` document (only the fields pakt reads).
#[derive(Debug, Deserialize)]
struct RepoData {
    #[serde(default)]
    packages: BTreeMap<String, RepoRecord>,
    #[serde(default, rename = "packages.conda")]
    packages_conda: BTreeMap<String, RepoRecord>,
}

#[derive(Debug, Deserialize)]
struct RepoRecord {
    name: String,
    version: String,
    #[serde(default)]
    depends: Vec<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the flat `{name: {version: metadata}}` JSON shape.
    pub fn from_json(content: &str) -> miette::Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            PaktError::Catalog {
                message: format!("Failed to parse catalog: {e}"),
            }
            .into()
        })
    }

    /// Read a flat JSON catalog from disk.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PaktError::Catalog {
            message: format!("Failed to read catalog {}: {e}", path.display()),
        })?;
        Self::from_json(&content)
    }

    /// Parse a conda-style `repodata.json`, tagging every record with `channel`.
    ///
    /// When several archives carry the same `(name, version)` the first one
    /// in filename order is kept.
    pub fn from_repodata(content: &str, channel: &str) -> miette::Result<Self> {
        let repodata: RepoData = serde_json::from_str(content).map_err(|e| PaktError::Catalog {
            message: format!("Failed to parse repodata for channel '{channel}': {e}"),
        })?;

        let mut catalog = Catalog::new();
        let records = repodata
            .packages
            .into_iter()
            .chain(repodata.packages_conda);
        for (filename, record) in records {
            let versions = catalog.packages.entry(record.name).or_default();
            versions.entry(record.version).or_insert_with(|| Metadata {
                depends: record.depends,
                channel: channel.to_string(),
                filename,
            });
        }
        Ok(catalog)
    }

    /// Add one package version. An existing entry for the same key is kept.
    pub fn insert(&mut self, name: &str, version: &str, metadata: Metadata) {
        self.packages
            .entry(name.to_string())
            .or_default()
            .entry(version.to_string())
            .or_insert(metadata);
    }

    /// Add every entry of `other` that is not already present.
    ///
    /// Merging channels in priority order therefore keeps the
    /// higher-priority copy of a duplicated `(name, version)`.
    pub fn merge(&mut self, other: Catalog) {
        for (name, versions) in other.packages {
            let ours = self.packages.entry(name).or_default();
            for (version, metadata) in versions {
                ours.entry(version).or_insert(metadata);
            }
        }
    }

    /// All versions of a package, or `None` if the name is unknown.
    pub fn versions(&self, name: &str) -> Option<&BTreeMap<String, Metadata>> {
        self.packages.get(name)
    }

    pub fn get(&self, name: &str, version: &str) -> Option<&Metadata> {
        self.packages.get(name)?.get(version)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Number of `(name, version)` entries.
    pub fn len(&self) -> usize {
        self.packages.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Assemble a catalog from `<cache_dir>/<channel>/repodata.json` files.
///
/// Channels are read in priority order and merged. Channels without a cached
/// file are skipped with a warning; if none has one the call fails. pakt does
/// not download repodata itself, the cache is populated externally.
pub fn fetch_catalog(
    channels: &ChannelOrder,
    offline: bool,
    cache_dir: &Path,
) -> miette::Result<Catalog> {
    let mut catalog = Catalog::new();
    let mut loaded = 0usize;

    for channel in channels.iter() {
        let path = cache_dir.join(channel).join("repodata.json");
        if !path.is_file() {
            warn!(channel, path = %path.display(), "no cached repodata for channel");
            continue;
        }
        let content = std::fs::read_to_string(&path).map_err(|e| PaktError::Catalog {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        let part = Catalog::from_repodata(&content, channel)?;
        debug!(channel, entries = part.len(), "loaded repodata");
        catalog.merge(part);
        loaded += 1;
    }

    if loaded == 0 {
        let hint = if offline {
            "offline mode requires cached repodata"
        } else {
            "populate the cache with each channel's repodata.json first"
        };
        return Err(PaktError::Catalog {
            message: format!(
                "No repodata found in {} for channels [{channels}]: {hint}",
                cache_dir.display()
            ),
        }
        .into());
    }

    info!(channels = loaded, entries = catalog.len(), "catalog ready");
    Ok(catalog)
}
