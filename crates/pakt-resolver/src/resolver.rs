//! The resolution entry point: build, weigh, reduce, solve, decode.

use std::collections::HashSet;
use std::fmt;

use pakt_core::catalog::{Catalog, Metadata};
use pakt_core::channel::ChannelOrder;
use serde::Serialize;
use tracing::info;

use crate::conflict::UnsatisfiedDependency;
use crate::error::ResolveError;
use crate::graph::{DependencyGraph, GraphBuilder, NodeId};
use crate::mass::CostModel;
use crate::reduce::reduce;
use crate::solver::InstallSolver;
use crate::spec::PackageSpec;

/// Knobs for [`resolve_with`].
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Remove redundant versions before solving.
    pub reduce: bool,
    /// Specs added to the request unless it already names the package.
    pub default_specs: Vec<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            reduce: true,
            default_specs: Vec::new(),
        }
    }
}

/// Sizes of the intermediate problems, for logs and `--verbose` output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    pub nodes_built: usize,
    pub nodes_reduced: usize,
    pub variables: usize,
    pub constraints: usize,
}

/// One package of an [`InstallPlan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedPackage {
    pub name: String,
    pub version: String,
    pub metadata: Metadata,
}

/// Packages to install, dependencies before dependents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InstallPlan {
    pub packages: Vec<PlannedPackage>,
}

impl InstallPlan {
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlannedPackage> {
        self.packages.iter()
    }

    pub fn get(&self, name: &str) -> Option<&PlannedPackage> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Version chosen for `name`.
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(|p| p.version.as_str())
    }
}

impl fmt::Display for InstallPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for package in &self.packages {
            writeln!(
                f,
                "{} {} {}",
                package.name, package.version, package.metadata.channel
            )?;
        }
        Ok(())
    }
}

/// A solved request.
#[derive(Debug)]
pub struct Resolution {
    graph: DependencyGraph,
    installed: HashSet<NodeId>,
    plan: InstallPlan,
    pub warnings: Vec<UnsatisfiedDependency>,
    pub stats: ResolutionStats,
}

impl Resolution {
    pub fn plan(&self) -> &InstallPlan {
        &self.plan
    }

    pub fn into_plan(self) -> InstallPlan {
        self.plan
    }

    /// The chain of installed packages that pulls in `name`, starting at the
    /// request. `None` if `name` is not installed.
    pub fn why(&self, name: &str) -> Option<Vec<String>> {
        let root = self.graph.root();
        let path = self
            .graph
            .find_path(name, |id| id == root || self.installed.contains(&id))?;
        Some(
            path.into_iter()
                .map(|id| self.graph.node(id).to_string())
                .collect(),
        )
    }
}

/// Resolve `root_specs` against `catalog` with default options.
pub fn resolve<S, C>(
    root_specs: &[S],
    channels: &[C],
    catalog: &Catalog,
) -> Result<Resolution, ResolveError>
where
    S: AsRef<str>,
    C: AsRef<str>,
{
    resolve_with(root_specs, channels, catalog, &ResolveOptions::default())
}

pub fn resolve_with<S, C>(
    root_specs: &[S],
    channels: &[C],
    catalog: &Catalog,
    options: &ResolveOptions,
) -> Result<Resolution, ResolveError>
where
    S: AsRef<str>,
    C: AsRef<str>,
{
    let specs = request_specs(root_specs, &options.default_specs)?;
    let channels = ChannelOrder::new(channels);
    info!(specs = specs.len(), channels = %channels, "resolving");

    let built = GraphBuilder::new(catalog, &channels).build(&specs)?;
    let mut graph = built.graph;
    let mut stats = ResolutionStats {
        nodes_built: graph.len(),
        ..ResolutionStats::default()
    };
    // Masses come from the full graph. Node ids survive reduction, and a
    // removed twin was always heavier than the one kept in its place.
    let masses = CostModel::new(&graph).all();
    if options.reduce {
        stats.nodes_reduced = reduce(&mut graph);
    }

    let solved = InstallSolver::new(&graph, &masses).solve()?;
    stats.variables = solved.variables;
    stats.constraints = solved.constraints;

    let packages: Vec<PlannedPackage> = solved
        .order
        .iter()
        .map(|&id| {
            let node = graph.node(id);
            PlannedPackage {
                name: node.name.clone(),
                version: node.version.to_string(),
                metadata: node.metadata.clone().unwrap_or_default(),
            }
        })
        .collect();
    info!(packages = packages.len(), "resolution finished");

    let mut installed: HashSet<NodeId> = solved.order.into_iter().collect();
    installed.insert(graph.root());
    Ok(Resolution {
        graph,
        installed,
        plan: InstallPlan { packages },
        warnings: built.warnings,
        stats,
    })
}

/// Validate the request and append defaults whose package is not named yet.
fn request_specs<S: AsRef<str>>(
    root_specs: &[S],
    default_specs: &[String],
) -> Result<Vec<String>, ResolveError> {
    let mut specs = Vec::with_capacity(root_specs.len() + default_specs.len());
    let mut named = HashSet::new();
    for raw in root_specs {
        let spec = PackageSpec::parse(raw.as_ref())?;
        named.insert(spec.name);
        specs.push(raw.as_ref().to_string());
    }
    for raw in default_specs {
        let spec = PackageSpec::parse(raw)?;
        if named.insert(spec.name) {
            specs.push(raw.clone());
        }
    }
    Ok(specs)
}
