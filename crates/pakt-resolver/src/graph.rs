//! Candidate dependency graph and its construction.
//!
//! Every `(name, version)` pair reachable from the request becomes exactly one
//! node. Edges point from a package to each candidate version of something it
//! depends on; the edges leaving a node, grouped by target name, are the
//! alternatives for one declared dependency.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;

use pakt_core::catalog::{Catalog, Metadata};
use pakt_core::channel::ChannelOrder;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use tracing::{debug, info, warn};

use crate::cache::CandidateCache;
use crate::conflict::UnsatisfiedDependency;
use crate::error::ResolveError;
use crate::spec::{Clause, PackageSpec};
use crate::version::Version;

/// Name of the synthetic node standing for the user's request.
pub const ROOT_NAME: &str = "<root>";

pub type NodeId = NodeIndex;

/// One candidate `(name, version)`.
#[derive(Debug, Clone)]
pub struct DependencyNode {
    pub name: String,
    pub version: Version,
    /// `None` only for the synthetic root.
    pub metadata: Option<Metadata>,
    /// Some declared dependency had no candidate in the catalog.
    pub invalid: bool,
    /// Dependency specs that had no candidate.
    pub unsatisfied: Vec<String>,
    /// Higher is preferred.
    pub channel_priority: i64,
}

impl DependencyNode {
    pub fn is_root(&self) -> bool {
        self.metadata.is_none()
    }

    /// Sort key placing the most preferred sibling first.
    fn preference(&self) -> (std::cmp::Reverse<i64>, std::cmp::Reverse<&Version>) {
        (
            std::cmp::Reverse(self.channel_priority),
            std::cmp::Reverse(&self.version),
        )
    }
}

impl fmt::Display for DependencyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str(ROOT_NAME)
        } else {
            write!(f, "{} {}", self.name, self.version)
        }
    }
}

/// Edge label: the combined requirement that selected this candidate.
#[derive(Debug, Clone)]
pub struct DepEdge {
    pub spec: String,
}

/// The candidate graph, an arena of nodes keyed by `(name, version)`.
#[derive(Debug)]
pub struct DependencyGraph {
    graph: StableDiGraph<DependencyNode, DepEdge>,
    index: HashMap<(String, String), NodeId>,
    by_name: BTreeMap<String, Vec<NodeId>>,
    root: NodeId,
}

impl DependencyGraph {
    /// An empty graph holding only the synthetic root.
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(DependencyNode {
            name: ROOT_NAME.to_string(),
            version: Version::parse("0"),
            metadata: None,
            invalid: false,
            unsatisfied: Vec::new(),
            channel_priority: 0,
        });
        Self {
            graph,
            index: HashMap::new(),
            by_name: BTreeMap::new(),
            root,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &DependencyNode {
        &self.graph[id]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut DependencyNode {
        &mut self.graph[id]
    }

    /// Look up a node by name and catalog version string.
    pub fn find(&self, name: &str, version: &str) -> Option<NodeId> {
        self.index
            .get(&(name.to_string(), version.to_string()))
            .copied()
    }

    /// Insert a package node, or return the existing one and `false`.
    fn get_or_insert(&mut self, node: DependencyNode) -> (NodeId, bool) {
        let key = (node.name.clone(), node.version.as_str().to_string());
        if let Some(&id) = self.index.get(&key) {
            return (id, false);
        }
        let name = node.name.clone();
        let id = self.graph.add_node(node);
        self.index.insert(key, id);
        self.by_name.entry(name).or_default().push(id);
        (id, true)
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId, edge: DepEdge) {
        if self.graph.find_edge(from, to).is_none() {
            self.graph.add_edge(from, to, edge);
        }
    }

    /// Delete a node together with every edge touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<DependencyNode> {
        if id == self.root {
            return None;
        }
        let node = self.graph.remove_node(id)?;
        self.index
            .remove(&(node.name.clone(), node.version.as_str().to_string()));
        if let Some(ids) = self.by_name.get_mut(&node.name) {
            ids.retain(|&other| other != id);
            if ids.is_empty() {
                self.by_name.remove(&node.name);
            }
        }
        Some(node)
    }

    /// Package names present in the graph, excluding the root.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// Versions of one package, most preferred first
    /// (channel priority, then version, both descending).
    pub fn preference_order(&self, name: &str) -> Vec<NodeId> {
        let mut ids = self.by_name.get(name).cloned().unwrap_or_default();
        ids.sort_by(|&a, &b| {
            self.graph[a]
                .preference()
                .cmp(&self.graph[b].preference())
                .then(a.cmp(&b))
        });
        ids
    }

    /// All node ids including the root, in index order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.graph.node_indices().collect()
    }

    /// Parents requiring this node, one entry per edge.
    pub fn in_edges(&self, id: NodeId) -> Vec<NodeId> {
        let mut parents: Vec<NodeId> = self
            .graph
            .edges_directed(id, Direction::Incoming)
            .map(|e| e.source())
            .collect();
        parents.sort();
        parents
    }

    /// Outgoing candidates grouped by dependency name.
    pub fn out_groups(&self, id: NodeId) -> BTreeMap<&str, Vec<NodeId>> {
        let mut groups: BTreeMap<&str, Vec<NodeId>> = BTreeMap::new();
        for edge in self.graph.edges_directed(id, Direction::Outgoing) {
            let target = edge.target();
            groups
                .entry(self.graph[target].name.as_str())
                .or_default()
                .push(target);
        }
        for members in groups.values_mut() {
            members.sort();
        }
        groups
    }

    /// The requirement text on the edge `from -> to`.
    pub fn edge_spec(&self, from: NodeId, to: NodeId) -> Option<&str> {
        self.graph
            .find_edge(from, to)
            .map(|e| self.graph[e].spec.as_str())
    }

    /// Shortest requirement path from the root to any version of `name`,
    /// walking only through nodes accepted by `allowed`.
    pub fn find_path(&self, name: &str, allowed: impl Fn(NodeId) -> bool) -> Option<Vec<NodeId>> {
        let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
        let mut seen: HashSet<NodeId> = HashSet::from([self.root]);
        let mut queue = VecDeque::from([self.root]);

        while let Some(current) = queue.pop_front() {
            if current != self.root && self.graph[current].name == name {
                let mut path = vec![current];
                let mut cursor = current;
                while let Some(&prev) = parent.get(&cursor) {
                    path.push(prev);
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }
            let mut children: Vec<NodeId> = self
                .graph
                .neighbors_directed(current, Direction::Outgoing)
                .collect();
            children.sort();
            for child in children {
                if allowed(child) && seen.insert(child) {
                    parent.insert(child, current);
                    queue.push_back(child);
                }
            }
        }
        None
    }

    /// Requirement path from the root to `name` through any candidate.
    pub fn why(&self, name: &str) -> Option<Vec<NodeId>> {
        self.find_path(name, |_| true)
    }

    /// Number of package nodes (excluding root).
    pub fn len(&self) -> usize {
        self.graph.node_count().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of [`GraphBuilder::build`].
#[derive(Debug)]
pub struct BuiltGraph {
    pub graph: DependencyGraph,
    pub warnings: Vec<UnsatisfiedDependency>,
}

/// Expands a request into a [`DependencyGraph`] against one catalog.
pub struct GraphBuilder<'a> {
    catalog: &'a Catalog,
    channels: &'a ChannelOrder,
    cache: CandidateCache,
    warnings: Vec<UnsatisfiedDependency>,
}

/// Dependencies of one node with clauses merged per name.
struct DependencyGroup {
    name: String,
    clauses: Vec<Clause>,
    specs: Vec<String>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(catalog: &'a Catalog, channels: &'a ChannelOrder) -> Self {
        Self {
            catalog,
            channels,
            cache: CandidateCache::new(),
            warnings: Vec::new(),
        }
    }

    /// Build the graph for `root_specs`.
    ///
    /// Each node is expanded exactly once, depth first; later references to
    /// an existing node only add an edge. A dependency with no candidate marks
    /// its owner invalid and is recorded as a warning instead of failing.
    pub fn build<S: AsRef<str>>(mut self, root_specs: &[S]) -> Result<BuiltGraph, ResolveError> {
        let mut graph = DependencyGraph::new();
        let root_depends: Vec<String> = root_specs.iter().map(|s| s.as_ref().to_string()).collect();

        let mut stack = vec![(graph.root(), root_depends)];
        while let Some((id, depends)) = stack.pop() {
            let discovered = self.expand(&mut graph, id, &depends)?;
            // Reversed so the first declared dependency is descended into first.
            stack.extend(discovered.into_iter().rev());
        }

        info!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            memo_entries = self.cache.len(),
            memo_hits = self.cache.hits(),
            "dependency graph built"
        );
        Ok(BuiltGraph {
            graph,
            warnings: self.warnings,
        })
    }

    /// Attach candidates for each dependency of `id`; returns newly created
    /// nodes with the depends lists they still need expanding with.
    fn expand(
        &mut self,
        graph: &mut DependencyGraph,
        id: NodeId,
        depends: &[String],
    ) -> Result<Vec<(NodeId, Vec<String>)>, ResolveError> {
        let mut discovered = Vec::new();

        for group in group_dependencies(depends)? {
            let versions = self
                .cache
                .valid_packages(self.catalog, &group.name, &group.clauses);
            let spec_text = group.specs.join(", ");

            if versions.is_empty() {
                let owner = graph.node_mut(id);
                owner.invalid = true;
                owner.unsatisfied.push(spec_text.clone());
                let warning = UnsatisfiedDependency {
                    package: owner.name.clone(),
                    version: owner.version.to_string(),
                    is_root: owner.is_root(),
                    dependency: spec_text,
                };
                warn!("{warning}");
                self.warnings.push(warning);
                continue;
            }

            for version in versions {
                let Some(metadata) = self.catalog.get(&group.name, &version) else {
                    continue;
                };
                let (child, created) = graph.get_or_insert(DependencyNode {
                    name: group.name.clone(),
                    version: Version::parse(&version),
                    metadata: Some(metadata.clone()),
                    invalid: false,
                    unsatisfied: Vec::new(),
                    channel_priority: self.channels.priority(&metadata.channel),
                });
                graph.add_edge(
                    id,
                    child,
                    DepEdge {
                        spec: spec_text.clone(),
                    },
                );
                if created {
                    debug!(package = %group.name, %version, "new candidate");
                    discovered.push((child, metadata.depends.clone()));
                }
            }
        }

        Ok(discovered)
    }
}

/// Parse `depends` and merge clauses of specs naming the same package.
///
/// Merged clauses are a conjunction: `foo>=1` and `foo<2` from one package
/// accept only `[1, 2)`.
fn group_dependencies(depends: &[String]) -> Result<Vec<DependencyGroup>, ResolveError> {
    let mut groups: BTreeMap<String, DependencyGroup> = BTreeMap::new();
    for raw in depends {
        let spec = PackageSpec::parse(raw)?;
        let group = groups
            .entry(spec.name.clone())
            .or_insert_with(|| DependencyGroup {
                name: spec.name.clone(),
                clauses: Vec::new(),
                specs: Vec::new(),
            });
        group.clauses.extend(spec.clauses.iter().cloned());
        group.specs.push(spec.to_string());
    }
    Ok(groups.into_values().collect())
}
