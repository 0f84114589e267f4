//! Unsatisfied-dependency warnings and diagnostics for infeasible requests.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use crate::graph::{DependencyGraph, NodeId, ROOT_NAME};

/// A declared dependency with no candidate version in the catalog.
///
/// Non-fatal: the owning node is marked invalid and resolution continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsatisfiedDependency {
    pub package: String,
    pub version: String,
    pub is_root: bool,
    /// The (merged) requirement text.
    pub dependency: String,
}

impl fmt::Display for UnsatisfiedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root {
            write!(f, "nothing provides requested {}", self.dependency)
        } else {
            write!(
                f,
                "nothing provides {} needed by {} {}",
                self.dependency, self.package, self.version
            )
        }
    }
}

/// A package version that can never be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidNode {
    pub package: String,
    pub missing: Vec<String>,
    pub requested_by: Vec<String>,
}

/// Two or more requirers whose acceptable versions of `package` do not overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConflict {
    pub package: String,
    /// `(requirer, requirement)` pairs.
    pub requirers: Vec<(String, String)>,
}

/// Why a request could not be satisfied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    pub invalid: Vec<InvalidNode>,
    pub conflicts: Vec<VersionConflict>,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect invalid nodes and disjoint requirements from `graph`.
    ///
    /// Disjoint requirements are first searched among nodes that every
    /// solution must contain; only if none are found are all requirers
    /// considered.
    pub fn diagnose(graph: &DependencyGraph) -> Self {
        let invalid = graph
            .node_ids()
            .into_iter()
            .filter(|&id| graph.node(id).invalid)
            .map(|id| {
                let node = graph.node(id);
                let mut requested_by: Vec<String> = graph
                    .in_edges(id)
                    .into_iter()
                    .map(|p| graph.node(p).to_string())
                    .collect();
                requested_by.dedup();
                InvalidNode {
                    package: node.to_string(),
                    missing: node.unsatisfied.clone(),
                    requested_by,
                }
            })
            .collect();

        let forced = forced_nodes(graph);
        let mut conflicts = disjoint_requirements(graph, |id| forced.contains(&id));
        if conflicts.is_empty() {
            conflicts = disjoint_requirements(graph, |_| true);
        }

        Self { invalid, conflicts }
    }

    pub fn is_empty(&self) -> bool {
        self.invalid.is_empty() && self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.invalid.len() + self.conflicts.len()
    }

    /// Every package or requirer mentioned in the report.
    pub fn mentions(&self, package: &str) -> bool {
        let named = |s: &str| s == package || s.split(' ').next() == Some(package);
        self.invalid
            .iter()
            .any(|n| named(&n.package) || n.requested_by.iter().any(|r| named(r)))
            || self.conflicts.iter().any(|c| {
                c.package == package || c.requirers.iter().any(|(who, _)| named(who))
            })
    }
}

/// Root plus every node that is the only candidate of a forced node's group.
fn forced_nodes(graph: &DependencyGraph) -> HashSet<NodeId> {
    let mut forced = HashSet::from([graph.root()]);
    let mut stack = vec![graph.root()];
    while let Some(id) = stack.pop() {
        for members in graph.out_groups(id).into_values() {
            if let [only] = members.as_slice() {
                if forced.insert(*only) {
                    stack.push(*only);
                }
            }
        }
    }
    forced
}

fn disjoint_requirements(
    graph: &DependencyGraph,
    consider: impl Fn(NodeId) -> bool,
) -> Vec<VersionConflict> {
    // package -> [(requirer, candidates)]
    let mut by_package: BTreeMap<String, Vec<(NodeId, BTreeSet<NodeId>)>> = BTreeMap::new();
    for id in graph.node_ids() {
        if !consider(id) {
            continue;
        }
        for (name, members) in graph.out_groups(id) {
            by_package
                .entry(name.to_string())
                .or_default()
                .push((id, members.into_iter().collect()));
        }
    }

    let mut conflicts = Vec::new();
    for (package, groups) in by_package {
        let mut involved: BTreeSet<usize> = BTreeSet::new();
        for (i, (_, a)) in groups.iter().enumerate() {
            for (j, (_, b)) in groups.iter().enumerate().skip(i + 1) {
                if a.is_disjoint(b) {
                    involved.insert(i);
                    involved.insert(j);
                }
            }
        }
        if involved.is_empty() {
            continue;
        }
        let requirers = involved
            .into_iter()
            .map(|i| {
                let (requirer, members) = &groups[i];
                let spec = members
                    .iter()
                    .next()
                    .and_then(|&m| graph.edge_spec(*requirer, m))
                    .unwrap_or(package.as_str())
                    .to_string();
                (graph.node(*requirer).to_string(), spec)
            })
            .collect();
        conflicts.push(VersionConflict { package, requirers });
    }
    conflicts
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "No conflicts found.");
        }
        for node in &self.invalid {
            writeln!(
                f,
                "  {} cannot be installed: nothing provides {} (requested by {})",
                node.package,
                node.missing.join("; "),
                if node.requested_by.is_empty() {
                    ROOT_NAME.to_string()
                } else {
                    node.requested_by.join(", ")
                }
            )?;
        }
        for conflict in &self.conflicts {
            writeln!(f, "  conflicting requirements for {}:", conflict.package)?;
            for (who, spec) in &conflict.requirers {
                writeln!(f, "    {who} requires {spec}")?;
            }
        }
        Ok(())
    }
}
