pub mod ops_lock;
pub mod ops_solve;
pub mod ops_why;

use std::path::Path;

use pakt_core::catalog::{fetch_catalog, Catalog};
use pakt_core::config::GlobalConfig;
use pakt_core::channel::ChannelOrder;
use tracing::debug;

/// Load the catalog from an explicit JSON file, or from the repodata cache
/// of the configured channels.
pub fn load_catalog(
    catalog_path: Option<&Path>,
    channels: &[String],
    config: &GlobalConfig,
) -> miette::Result<Catalog> {
    match catalog_path {
        Some(path) => {
            debug!(path = %path.display(), "reading catalog file");
            Catalog::from_path(path)
        }
        None => fetch_catalog(
            &ChannelOrder::new(channels),
            config.offline,
            &config.cache_dir(),
        ),
    }
}

/// Channels given on the command line, falling back to the configured ones.
pub fn effective_channels(requested: &[String], config: &GlobalConfig) -> Vec<String> {
    if requested.is_empty() {
        config.channels.clone()
    } else {
        requested.to_vec()
    }
}
