//! Package resolution: spec parsing, candidate graph construction, graph
//! reduction and install-set selection with a 0/1 integer program.

pub mod cache;
pub mod conflict;
pub mod error;
pub mod graph;
pub mod mass;
pub mod reduce;
pub mod resolver;
pub mod solver;
pub mod spec;
pub mod version;

pub use error::ResolveError;
pub use resolver::{
    resolve, resolve_with, InstallPlan, PlannedPackage, Resolution, ResolutionStats,
    ResolveOptions,
};
