//! CLI argument definitions for pakt.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "pakt",
    version,
    about = "A package environment resolver",
    long_about = "pakt picks one version of every package a request needs, preferring \
                  the newest versions from the highest priority channels, by solving a \
                  0/1 integer program over the candidate dependency graph."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve package specs and print the install plan
    Solve {
        /// Package specs, e.g. "numpy>=1.16,<2"
        #[arg(required = true)]
        specs: Vec<String>,
        /// Flat JSON catalog to resolve against instead of the repodata cache
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Channel to search, highest priority first (repeatable)
        #[arg(short, long = "channel")]
        channels: Vec<String>,
        /// Skip removal of redundant versions before solving
        #[arg(long)]
        no_reduce: bool,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve an environment file and write pakt.lock
    Lock {
        /// Environment file (default: environment.toml in this or a parent directory)
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Flat JSON catalog to resolve against instead of the repodata cache
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Lockfile to write (default: pakt.lock next to the environment file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which requirement chain pulls a package into the plan
    Why {
        /// Package to explain
        package: String,
        /// Package specs to resolve
        #[arg(required = true)]
        specs: Vec<String>,
        /// Flat JSON catalog to resolve against instead of the repodata cache
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

/// Parse CLI arguments from the process environment.
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn repeated_channels_keep_order() {
        let cli = Cli::parse_from([
            "pakt", "solve", "numpy", "-c", "conda-forge", "--channel", "defaults",
        ]);
        match cli.command {
            Command::Solve { channels, .. } => {
                assert_eq!(channels, vec!["conda-forge", "defaults"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
