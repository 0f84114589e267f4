//! Command dispatch and handler modules.

mod lock;
mod solve;
mod why;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Solve {
            specs,
            catalog,
            channels,
            no_reduce,
            json,
        } => solve::exec(specs, catalog, channels, !no_reduce, json, cli.verbose),
        Command::Lock {
            file,
            catalog,
            output,
        } => lock::exec(file, catalog, output, cli.verbose),
        Command::Why {
            package,
            specs,
            catalog,
        } => why::exec(package, specs, catalog, cli.verbose),
    }
}
