//! Priority-biased node weights for the install objective.
//!
//! The mass of a node is the cost of its cheapest and dearest dependency
//! closures plus one more than the mass of its next more preferred sibling.
//! Less preferred versions are therefore always heavier than the versions
//! ranked above them, and the minimiser leans toward the newest versions from
//! the highest priority channels.

use std::collections::HashMap;

use crate::graph::{DependencyGraph, NodeId};

/// `(low, high)` cost bounds of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mass {
    pub low: f64,
    pub high: f64,
}

impl Mass {
    pub const ZERO: Mass = Mass { low: 0.0, high: 0.0 };
}

#[derive(Debug, Clone, Copy)]
enum Visit {
    NotStarted,
    /// Re-entry through a cycle reads this as zero.
    InProgress,
    Done(Mass),
}

/// Memoised mass computation over one graph.
pub struct CostModel<'g> {
    graph: &'g DependencyGraph,
    visits: HashMap<NodeId, Visit>,
    big_brother: HashMap<NodeId, NodeId>,
}

impl<'g> CostModel<'g> {
    pub fn new(graph: &'g DependencyGraph) -> Self {
        let mut big_brother = HashMap::new();
        for name in graph.names() {
            let order = graph.preference_order(name);
            for pair in order.windows(2) {
                big_brother.insert(pair[1], pair[0]);
            }
        }
        Self {
            graph,
            visits: HashMap::new(),
            big_brother,
        }
    }

    /// The next more preferred version of the same package, if any.
    pub fn big_brother(&self, id: NodeId) -> Option<NodeId> {
        self.big_brother.get(&id).copied()
    }

    pub fn mass(&mut self, id: NodeId) -> Mass {
        let mut stack = vec![id];
        while let Some(&current) = stack.last() {
            match self.visit(current) {
                Visit::Done(_) => {
                    stack.pop();
                }
                Visit::NotStarted => {
                    self.visits.insert(current, Visit::InProgress);
                    let pending: Vec<NodeId> = self
                        .prerequisites(current)
                        .into_iter()
                        .filter(|&next| matches!(self.visit(next), Visit::NotStarted))
                        .collect();
                    stack.extend(pending.into_iter().rev());
                }
                // everything above it on the stack has settled
                Visit::InProgress => {
                    let total = self.settle(current);
                    self.visits.insert(current, Visit::Done(total));
                    stack.pop();
                }
            }
        }
        self.settled(id)
    }

    fn visit(&self, id: NodeId) -> Visit {
        self.visits.get(&id).copied().unwrap_or(Visit::NotStarted)
    }

    fn settled(&self, id: NodeId) -> Mass {
        match self.visit(id) {
            Visit::Done(mass) => mass,
            Visit::InProgress | Visit::NotStarted => Mass::ZERO,
        }
    }

    /// Dependency candidates in group order, then the big brother.
    fn prerequisites(&self, id: NodeId) -> Vec<NodeId> {
        let mut next: Vec<NodeId> = self.graph.out_groups(id).into_values().flatten().collect();
        next.extend(self.big_brother(id));
        next
    }

    fn settle(&self, id: NodeId) -> Mass {
        let mut total = Mass::ZERO;
        for members in self.graph.out_groups(id).into_values() {
            let masses: Vec<Mass> = members.into_iter().map(|m| self.settled(m)).collect();
            total.low += masses.iter().map(|m| m.low).fold(f64::INFINITY, f64::min);
            total.high += masses.iter().map(|m| m.high).fold(0.0, f64::max);
        }
        let sibling = self.big_brother(id).map_or(Mass::ZERO, |b| self.settled(b));
        total.low += 1.0 + sibling.low;
        total.high += 1.0 + sibling.high;
        total
    }

    /// Mass of every node in the graph, root included.
    pub fn all(&mut self) -> HashMap<NodeId, Mass> {
        self.graph
            .node_ids()
            .into_iter()
            .map(|id| (id, self.mass(id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use pakt_core::catalog::{Catalog, Metadata};
    use pakt_core::channel::ChannelOrder;

    fn meta(depends: &[&str], channel: &str) -> Metadata {
        Metadata {
            depends: depends.iter().map(|d| d.to_string()).collect(),
            channel: channel.to_string(),
            filename: String::new(),
        }
    }

    #[test]
    fn newer_versions_are_lighter() {
        let mut catalog = Catalog::new();
        catalog.insert("a", "1.0", meta(&["b>=2"], "main"));
        for v in ["1", "2", "3"] {
            catalog.insert("b", v, meta(&[], "main"));
        }
        let channels = ChannelOrder::new(&["defaults"]);
        let graph = GraphBuilder::new(&catalog, &channels)
            .build(&["a", "b"])
            .unwrap()
            .graph;
        let mut model = CostModel::new(&graph);
        let b1 = model.mass(graph.find("b", "1").unwrap());
        let b2 = model.mass(graph.find("b", "2").unwrap());
        let b3 = model.mass(graph.find("b", "3").unwrap());
        assert_eq!(b3, Mass { low: 1.0, high: 1.0 });
        assert!(b3.low < b2.low && b2.low < b1.low);
        // a carries the cheapest and dearest of its b alternatives
        let a = model.mass(graph.find("a", "1.0").unwrap());
        assert_eq!(a, Mass { low: 2.0, high: 3.0 });
    }

    #[test]
    fn channel_priority_outranks_version() {
        let mut catalog = Catalog::new();
        catalog.insert("b", "1", meta(&[], "main"));
        catalog.insert("b", "2", meta(&[], "r"));
        let channels = ChannelOrder::new(&["defaults"]);
        let graph = GraphBuilder::new(&catalog, &channels)
            .build(&["b"])
            .unwrap()
            .graph;
        let mut model = CostModel::new(&graph);
        let old_main = graph.find("b", "1").unwrap();
        let new_r = graph.find("b", "2").unwrap();
        assert_eq!(model.big_brother(new_r), Some(old_main));
        assert!(model.mass(old_main).low < model.mass(new_r).low);
    }

    #[test]
    fn cycles_terminate() {
        let mut catalog = Catalog::new();
        catalog.insert("a", "1", meta(&["b"], "main"));
        catalog.insert("b", "1", meta(&["a"], "main"));
        let channels = ChannelOrder::new(&["defaults"]);
        let graph = GraphBuilder::new(&catalog, &channels)
            .build(&["a"])
            .unwrap()
            .graph;
        let mut model = CostModel::new(&graph);
        let masses = model.all();
        assert_eq!(masses.len(), 3);
        let a = masses[&graph.find("a", "1").unwrap()];
        // a -> b -> a (placeholder 0): b = 1, a = 1 + 1
        assert_eq!(a.low, 2.0);
    }

    #[test]
    fn long_version_chains_do_not_recurse() {
        let mut catalog = Catalog::new();
        for v in 1..=5000 {
            catalog.insert("p", &v.to_string(), meta(&[], "main"));
        }
        let channels = ChannelOrder::new(&["defaults"]);
        let graph = GraphBuilder::new(&catalog, &channels)
            .build(&["p"])
            .unwrap()
            .graph;
        let mut model = CostModel::new(&graph);
        let oldest = model.mass(graph.find("p", "1").unwrap());
        assert_eq!(oldest, Mass { low: 5000.0, high: 5000.0 });
        assert_eq!(model.mass(graph.find("p", "5000").unwrap()).low, 1.0);
    }

    #[test]
    fn deep_dependency_chains_do_not_recurse() {
        let mut catalog = Catalog::new();
        for i in 0..5000 {
            let dep = format!("p{}", i + 1);
            let depends: Vec<&str> = if i + 1 < 5000 { vec![dep.as_str()] } else { vec![] };
            catalog.insert(&format!("p{i}"), "1", meta(&depends, "main"));
        }
        let channels = ChannelOrder::new(&["defaults"]);
        let graph = GraphBuilder::new(&catalog, &channels)
            .build(&["p0"])
            .unwrap()
            .graph;
        let masses = CostModel::new(&graph).all();
        assert_eq!(masses[&graph.find("p0", "1").unwrap()].low, 5000.0);
    }
}
