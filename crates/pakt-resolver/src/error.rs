//! Fatal resolution errors.
//!
//! Missing candidates for a single dependency are not errors; they are
//! collected as [`UnsatisfiedDependency`](crate::conflict::UnsatisfiedDependency)
//! warnings and only surface here if they make the whole request infeasible.

use miette::Diagnostic;
use thiserror::Error;

use crate::conflict::ConflictReport;

#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    /// A spec string could not be split into a name and clauses.
    #[error("malformed package spec '{spec}': {reason}")]
    #[diagnostic(help("specs look like `name`, `name>=1.0,<2` or `name 1.2.* build`"))]
    MalformedSpec { spec: String, reason: String },

    /// No combination of catalog versions satisfies every requirement.
    #[error("no installable set of packages satisfies the request\n{report}")]
    #[diagnostic(help("try relaxing the listed requirements or adding channels"))]
    Unsatisfiable { report: ConflictReport },

    /// The MILP backend stopped without an optimal solution.
    #[error("solver did not reach an optimal solution: {status}")]
    SolverFailed { status: String },
}

impl ResolveError {
    pub(crate) fn malformed(spec: &str, reason: impl Into<String>) -> Self {
        ResolveError::MalformedSpec {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}
