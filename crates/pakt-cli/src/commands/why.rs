//! Handler for `pakt why`.

use std::path::PathBuf;

use miette::Result;

use pakt_core::config::GlobalConfig;
use pakt_ops::ops_why::{self, WhyOptions};

pub fn exec(
    package: String,
    specs: Vec<String>,
    catalog: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let config = GlobalConfig::load()?;
    let opts = WhyOptions {
        package,
        specs,
        catalog,
        verbose,
    };
    ops_why::why(&opts, &config).map(|_| ())
}
