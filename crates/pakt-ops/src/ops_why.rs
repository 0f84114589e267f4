//! Operation: explain why a package is part of an install plan.

use std::path::PathBuf;

use pakt_core::config::GlobalConfig;
use pakt_resolver::ResolveOptions;
use pakt_util::errors::PaktError;

/// Options for `pakt why`.
#[derive(Debug, Clone, Default)]
pub struct WhyOptions {
    pub package: String,
    pub specs: Vec<String>,
    pub catalog: Option<PathBuf>,
    pub verbose: bool,
}

/// Resolve `opts.specs` and print the requirement chain leading to
/// `opts.package`, one level of indentation per step.
pub fn why(opts: &WhyOptions, config: &GlobalConfig) -> miette::Result<Vec<String>> {
    let channels = config.channels.clone();
    let catalog = crate::load_catalog(opts.catalog.as_deref(), &channels, config)?;
    if !catalog.contains(&opts.package) {
        return Err(PaktError::Catalog {
            message: format!("no package named '{}' in the catalog", opts.package),
        }
        .into());
    }
    let resolution = crate::ops_solve::resolve_specs(
        &opts.specs,
        &channels,
        &catalog,
        &ResolveOptions {
            reduce: true,
            default_specs: config.default_packages.clone(),
        },
        opts.verbose,
    )?;

    let Some(path) = resolution.why(&opts.package) else {
        return Err(PaktError::Resolution {
            message: format!(
                "'{}' is not part of the resolved environment",
                opts.package
            ),
        }
        .into());
    };

    println!("Path to {}:", opts.package);
    for (i, step) in path.iter().enumerate() {
        let indent = "  ".repeat(i);
        println!("{indent}{step}");
    }
    Ok(path)
}
