//! Removal of structurally redundant versions.
//!
//! Two versions of a package with the same parents, the same candidate
//! children and the same validity are interchangeable in every install set.
//! Only the most preferred one is kept.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::graph::{DependencyGraph, NodeId};

/// `(invalid, sorted parents, sorted children)`.
type Signature = (bool, Vec<usize>, Vec<usize>);

fn signature(graph: &DependencyGraph, id: NodeId) -> Signature {
    let parents = graph.in_edges(id).into_iter().map(|p| p.index()).collect();
    let mut children: Vec<usize> = graph
        .out_groups(id)
        .into_values()
        .flatten()
        .map(|c| c.index())
        .collect();
    children.sort_unstable();
    (graph.node(id).invalid, parents, children)
}

/// Delete redundant versions until none remain; returns how many were removed.
///
/// Passes repeat until one removes nothing, so calling this again on the
/// result is a no-op.
pub fn reduce(graph: &mut DependencyGraph) -> usize {
    let mut removed = 0;
    loop {
        let pass = reduce_pass(graph);
        if pass == 0 {
            break;
        }
        removed += pass;
    }
    info!(removed, remaining = graph.len(), "dependency graph reduced");
    removed
}

fn reduce_pass(graph: &mut DependencyGraph) -> usize {
    let names: Vec<String> = graph.names().map(str::to_string).collect();
    let mut removed = 0;

    for name in names {
        let mut seen: HashSet<Signature> = HashSet::new();
        for id in graph.preference_order(&name) {
            if seen.insert(signature(graph, id)) {
                continue;
            }
            if let Some(node) = graph.remove_node(id) {
                debug!(package = %node.name, version = %node.version, "removed redundant version");
                removed += 1;
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use pakt_core::catalog::{Catalog, Metadata};
    use pakt_core::channel::ChannelOrder;

    fn meta(depends: &[&str]) -> Metadata {
        Metadata {
            depends: depends.iter().map(|d| d.to_string()).collect(),
            channel: "main".to_string(),
            filename: String::new(),
        }
    }

    fn build(catalog: &Catalog, specs: &[&str]) -> DependencyGraph {
        let channels = ChannelOrder::new(&["defaults"]);
        GraphBuilder::new(catalog, &channels)
            .build(specs)
            .unwrap()
            .graph
    }

    #[test]
    fn identical_versions_collapse_to_newest() {
        let mut catalog = Catalog::new();
        catalog.insert("a", "1", meta(&["b>=2"]));
        for v in ["1", "2", "3"] {
            catalog.insert("b", v, meta(&[]));
        }
        let mut graph = build(&catalog, &["a"]);
        assert_eq!(reduce(&mut graph), 1);
        assert!(graph.find("b", "3").is_some());
        assert!(graph.find("b", "2").is_none());
    }

    #[test]
    fn different_children_are_kept() {
        let mut catalog = Catalog::new();
        catalog.insert("a", "1", meta(&["c"]));
        catalog.insert("a", "2", meta(&["d"]));
        catalog.insert("c", "1", meta(&[]));
        catalog.insert("d", "1", meta(&[]));
        let mut graph = build(&catalog, &["a"]);
        assert_eq!(reduce(&mut graph), 0);
        assert_eq!(graph.len(), 4);
    }

    #[test]
    fn invalid_version_is_not_a_twin() {
        let mut catalog = Catalog::new();
        catalog.insert("a", "1", meta(&[]));
        catalog.insert("a", "2", meta(&["ghost"]));
        let mut graph = build(&catalog, &["a"]);
        assert_eq!(reduce(&mut graph), 0);
        assert!(graph.find("a", "1").is_some());
    }

    #[test]
    fn higher_priority_channel_survives() {
        let mut catalog = Catalog::new();
        catalog.insert("a", "1", meta(&["b"]));
        catalog.insert("b", "2", meta(&[]));
        catalog.insert(
            "b",
            "3",
            Metadata {
                channel: "r".to_string(),
                ..meta(&[])
            },
        );
        let mut graph = build(&catalog, &["a"]);
        assert_eq!(reduce(&mut graph), 1);
        assert!(graph.find("b", "2").is_some());
        assert!(graph.find("b", "3").is_none());
    }

    #[test]
    fn second_reduce_is_noop() {
        let mut catalog = Catalog::new();
        catalog.insert("a", "1", meta(&["b"]));
        catalog.insert("a", "2", meta(&["b>=2"]));
        for v in ["1", "2", "3"] {
            catalog.insert("b", v, meta(&[]));
        }
        let mut graph = build(&catalog, &["a"]);
        reduce(&mut graph);
        let nodes = graph.len();
        let edges = graph.edge_count();
        assert_eq!(reduce(&mut graph), 0);
        assert_eq!(graph.len(), nodes);
        assert_eq!(graph.edge_count(), edges);
    }
}
