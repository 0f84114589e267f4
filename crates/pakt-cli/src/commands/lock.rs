//! Handler for `pakt lock`.

use std::path::PathBuf;

use miette::Result;

use pakt_core::config::GlobalConfig;
use pakt_ops::ops_lock::{self, LockOptions};
use pakt_util::errors::PaktError;

pub fn exec(
    file: Option<PathBuf>,
    catalog: Option<PathBuf>,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let cwd = std::env::current_dir().map_err(PaktError::Io)?;
    let config = GlobalConfig::load()?;
    let opts = LockOptions {
        file,
        catalog,
        output,
        verbose,
    };
    ops_lock::lock(&cwd, &opts, &config).map(|_| ())
}
