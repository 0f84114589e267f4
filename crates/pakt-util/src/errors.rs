use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for pakt operations outside the solver itself.
#[derive(Debug, Error, Diagnostic)]
pub enum PaktError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The global configuration file could not be read or parsed.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check ~/.pakt/config.toml for syntax errors"))]
    Config { message: String },

    /// Package catalog (repodata) could not be loaded.
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    /// Invalid or malformed environment file.
    #[error("Environment error: {message}")]
    #[diagnostic(help("Check your environment.toml for syntax errors"))]
    Environment { message: String },

    /// Lockfile could not be read or written.
    #[error("Lockfile error: {message}")]
    Lockfile { message: String },

    /// Dependency resolution failed.
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
