//! Handler for `pakt solve`.

use std::path::PathBuf;

use miette::Result;

use pakt_core::config::GlobalConfig;
use pakt_ops::ops_solve::{self, SolveOptions};

pub fn exec(
    specs: Vec<String>,
    catalog: Option<PathBuf>,
    channels: Vec<String>,
    reduce: bool,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let config = GlobalConfig::load()?;
    let opts = SolveOptions {
        specs,
        catalog,
        channels,
        reduce,
        json,
        verbose,
    };
    ops_solve::solve(&opts, &config).map(|_| ())
}
