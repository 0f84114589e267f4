//! Operation: resolve an environment file and write `pakt.lock`.

use std::path::{Path, PathBuf};

use pakt_core::config::GlobalConfig;
use pakt_core::environment::{Environment, ENVIRONMENT_FILE};
use pakt_core::lockfile::{LockedPackage, Lockfile, LOCKFILE};
use pakt_resolver::{InstallPlan, ResolveOptions};
use pakt_util::errors::PaktError;
use pakt_util::progress::status;

/// Options for `pakt lock`.
#[derive(Debug, Clone, Default)]
pub struct LockOptions {
    /// Environment file; searched upwards from the working directory if unset.
    pub file: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    /// Defaults to `pakt.lock` next to the environment file.
    pub output: Option<PathBuf>,
    pub verbose: bool,
}

/// Resolve the environment and write the lockfile; returns its path.
pub fn lock(cwd: &Path, opts: &LockOptions, config: &GlobalConfig) -> miette::Result<PathBuf> {
    let env_path = match &opts.file {
        Some(file) => cwd.join(file),
        None => pakt_util::fs::find_upwards(cwd, ENVIRONMENT_FILE).ok_or_else(|| {
            PaktError::Environment {
                message: format!(
                    "could not find {ENVIRONMENT_FILE} in {} or any parent directory",
                    cwd.display()
                ),
            }
        })?,
    };
    let env = Environment::from_path(&env_path)?;

    let channels = env
        .channels
        .clone()
        .unwrap_or_else(|| config.channels.clone());
    let catalog_path = opts.catalog.as_ref().map(|p| cwd.join(p));
    let catalog = crate::load_catalog(catalog_path.as_deref(), &channels, config)?;

    let resolution = crate::ops_solve::resolve_specs(
        &env.dependencies,
        &channels,
        &catalog,
        &ResolveOptions {
            reduce: true,
            default_specs: config.default_packages.clone(),
        },
        opts.verbose,
    )?;

    let lockfile = Lockfile::generate(plan_to_lockfile_packages(resolution.plan()));
    let output = match &opts.output {
        Some(output) => cwd.join(output),
        None => env_path
            .parent()
            .map(|dir| dir.join(LOCKFILE))
            .unwrap_or_else(|| cwd.join(LOCKFILE)),
    };
    lockfile.write_to(&output)?;

    let name = env.name.as_deref().unwrap_or("environment");
    status(
        "Locked",
        &format!(
            "{name}: {} packages to {}",
            lockfile.package.len(),
            output.display()
        ),
    );
    Ok(output)
}

/// Convert an install plan into lockfile entries, keeping install order.
pub fn plan_to_lockfile_packages(plan: &InstallPlan) -> Vec<LockedPackage> {
    plan.iter()
        .map(|p| LockedPackage {
            name: p.name.clone(),
            version: p.version.clone(),
            channel: p.metadata.channel.clone(),
            filename: p.metadata.filename.clone(),
            depends: p.metadata.depends.clone(),
        })
        .collect()
}
