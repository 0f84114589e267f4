//! Operation: resolve a list of specs and print the install plan.

use std::path::PathBuf;

use pakt_core::catalog::Catalog;
use pakt_core::config::GlobalConfig;
use pakt_resolver::{resolve_with, Resolution, ResolveOptions};
use pakt_util::errors::PaktError;
use pakt_util::progress::{spinner, status, status_line, status_warn, StatusKind};

/// Options for `pakt solve`.
#[derive(Debug, Clone)]
pub struct SolveOptions {
    pub specs: Vec<String>,
    /// Flat JSON catalog; `None` reads the repodata cache.
    pub catalog: Option<PathBuf>,
    /// Overrides the configured channels when non-empty.
    pub channels: Vec<String>,
    pub reduce: bool,
    pub json: bool,
    pub verbose: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            specs: Vec::new(),
            catalog: None,
            channels: Vec::new(),
            reduce: true,
            json: false,
            verbose: false,
        }
    }
}

/// Resolve `opts.specs` and print the plan to stdout.
pub fn solve(opts: &SolveOptions, config: &GlobalConfig) -> miette::Result<Resolution> {
    let channels = crate::effective_channels(&opts.channels, config);
    let catalog = crate::load_catalog(opts.catalog.as_deref(), &channels, config)?;
    let resolution = resolve_specs(
        &opts.specs,
        &channels,
        &catalog,
        &ResolveOptions {
            reduce: opts.reduce,
            default_specs: config.default_packages.clone(),
        },
        opts.verbose,
    )?;

    if opts.json {
        let json = serde_json::to_string_pretty(resolution.plan()).map_err(|e| {
            PaktError::Generic {
                message: format!("Failed to serialize install plan: {e}"),
            }
        })?;
        println!("{json}");
    } else {
        print!("{}", resolution.plan());
    }
    Ok(resolution)
}

/// Resolve with status output: a spinner while solving, warnings for
/// dependencies nothing provides, and a summary line.
pub fn resolve_specs(
    specs: &[String],
    channels: &[String],
    catalog: &Catalog,
    options: &ResolveOptions,
    verbose: bool,
) -> miette::Result<Resolution> {
    status(
        "Solving",
        &format!("{} specs against {} packages", specs.len(), catalog.len()),
    );

    let sp = spinner("Solving install plan...");
    let result = resolve_with(specs, channels, catalog, options);
    sp.finish_and_clear();
    let resolution = result?;

    if verbose {
        for warning in &resolution.warnings {
            status_warn("Warning", &warning.to_string());
        }
        let stats = resolution.stats;
        status_line(
            StatusKind::Info,
            "Stats",
            &format!(
                "{} nodes built, {} reduced, {} variables, {} constraints",
                stats.nodes_built, stats.nodes_reduced, stats.variables, stats.constraints
            ),
        );
    } else if !resolution.warnings.is_empty() {
        status_warn(
            "Warning",
            &format!(
                "{} candidate versions skipped for missing dependencies (use --verbose to list them)",
                resolution.warnings.len()
            ),
        );
    }

    status(
        "Resolved",
        &format!("{} packages", resolution.plan().len()),
    );
    Ok(resolution)
}
