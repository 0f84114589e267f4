//! Install-set selection as a 0/1 integer program.
//!
//! One binary variable per node. Constraints:
//! - the root is installed
//! - at most one version of every package is installed
//! - an installed node has at least one installed candidate per dependency
//! - invalid nodes are never installed
//!
//! The objective minimises the sum of node masses over installed nodes.

use std::collections::{HashMap, HashSet};

use good_lp::{
    constraint, microlp, variable, Expression, ProblemVariables, ResolutionError as LpError,
    Solution, SolverModel, Variable,
};
use tracing::{debug, info};

use crate::conflict::ConflictReport;
use crate::error::ResolveError;
use crate::graph::{DependencyGraph, NodeId};
use crate::mass::Mass;

/// Selected nodes in install order plus problem size.
#[derive(Debug, Clone)]
pub struct Solved {
    /// Non-root nodes, dependencies before dependents.
    pub order: Vec<NodeId>,
    pub variables: usize,
    pub constraints: usize,
}

pub struct InstallSolver<'g> {
    graph: &'g DependencyGraph,
    masses: &'g HashMap<NodeId, Mass>,
}

impl<'g> InstallSolver<'g> {
    pub fn new(graph: &'g DependencyGraph, masses: &'g HashMap<NodeId, Mass>) -> Self {
        Self { graph, masses }
    }

    pub fn solve(&self) -> Result<Solved, ResolveError> {
        let graph = self.graph;
        let mut problem = ProblemVariables::new();
        let vars: HashMap<NodeId, Variable> = graph
            .node_ids()
            .into_iter()
            .map(|id| (id, problem.add(variable().binary())))
            .collect();

        let ids = graph.node_ids();
        let objective: Expression = ids
            .iter()
            .map(|id| {
                let weight = self.masses.get(id).map_or(0.0, |m| m.low);
                vars[id] * weight
            })
            .sum();

        let mut model = problem.minimise(objective).using(microlp);
        let mut constraints = 0usize;

        let x_root = vars[&graph.root()];
        model = model.with(constraint!(x_root == 1));
        constraints += 1;

        for name in graph.names() {
            let versions = graph.preference_order(name);
            if versions.len() < 2 {
                continue;
            }
            let installed: Expression = versions.iter().map(|id| vars[id]).sum();
            model = model.with(constraint!(installed <= 1));
            constraints += 1;
        }

        for &id in &ids {
            let x_n = vars[&id];
            let node = graph.node(id);
            if node.invalid {
                model = model.with(constraint!(x_n == 0));
                constraints += 1;
            }
            for members in graph.out_groups(id).into_values() {
                let satisfied: Expression = members.iter().map(|m| vars[m]).sum();
                model = model.with(constraint!(satisfied >= x_n));
                constraints += 1;
            }
        }

        info!(variables = vars.len(), constraints, "solving install problem");

        let solution = match model.solve() {
            Ok(solution) => solution,
            Err(LpError::Infeasible) => {
                return Err(ResolveError::Unsatisfiable {
                    report: ConflictReport::diagnose(graph),
                })
            }
            Err(other) => {
                return Err(ResolveError::SolverFailed {
                    status: other.to_string(),
                })
            }
        };

        let selected: HashSet<NodeId> = vars
            .iter()
            .filter(|(_, &x)| solution.value(x) > 0.5)
            .map(|(&id, _)| id)
            .collect();
        debug!(selected = selected.len(), "solver finished");

        Ok(Solved {
            order: install_order(graph, &selected),
            variables: vars.len(),
            constraints,
        })
    }
}

/// Order selected nodes so that dependencies come first.
///
/// Each node gets a height: 0 without selected children, otherwise one more
/// than its tallest selected child. Nodes sort by height, then name. A node
/// reached again while its height is being computed counts as height 0, so
/// cyclic selections still get a stable order.
pub fn install_order(graph: &DependencyGraph, selected: &HashSet<NodeId>) -> Vec<NodeId> {
    let mut ids: Vec<NodeId> = selected
        .iter()
        .copied()
        .filter(|&id| id != graph.root())
        .collect();
    ids.sort();
    let mut heights: HashMap<NodeId, Option<usize>> = HashMap::new();
    let mut order: Vec<(usize, NodeId)> = ids
        .into_iter()
        .map(|id| (height(graph, selected, id, &mut heights), id))
        .collect();
    order.sort_by(|(ha, a), (hb, b)| {
        let (na, nb) = (graph.node(*a), graph.node(*b));
        ha.cmp(hb)
            .then_with(|| na.name.cmp(&nb.name))
            .then_with(|| na.version.cmp(&nb.version))
    });
    order.into_iter().map(|(_, id)| id).collect()
}

fn height(
    graph: &DependencyGraph,
    selected: &HashSet<NodeId>,
    start: NodeId,
    memo: &mut HashMap<NodeId, Option<usize>>,
) -> usize {
    let children = |id: NodeId| -> Vec<NodeId> {
        graph
            .out_groups(id)
            .into_values()
            .flatten()
            .filter(|child| selected.contains(child) && *child != id)
            .collect()
    };
    let mut stack = vec![start];
    while let Some(&id) = stack.last() {
        match memo.get(&id) {
            Some(Some(_)) => {
                stack.pop();
            }
            None => {
                memo.insert(id, None);
                let pending: Vec<NodeId> = children(id)
                    .into_iter()
                    .filter(|child| !memo.contains_key(child))
                    .collect();
                stack.extend(pending.into_iter().rev());
            }
            Some(None) => {
                let h = children(id)
                    .iter()
                    .map(|child| match memo.get(child) {
                        Some(Some(h)) => h + 1,
                        _ => 1,
                    })
                    .max()
                    .unwrap_or(0);
                memo.insert(id, Some(h));
                stack.pop();
            }
        }
    }
    memo.get(&start).copied().flatten().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::mass::CostModel;
    use pakt_core::catalog::{Catalog, Metadata};
    use pakt_core::channel::ChannelOrder;

    fn meta(depends: &[&str]) -> Metadata {
        Metadata {
            depends: depends.iter().map(|d| d.to_string()).collect(),
            channel: "main".to_string(),
            filename: String::new(),
        }
    }

    fn solve(catalog: &Catalog, specs: &[&str]) -> Result<Vec<String>, ResolveError> {
        let channels = ChannelOrder::new(&["defaults"]);
        let graph = GraphBuilder::new(catalog, &channels).build(specs)?.graph;
        let masses = CostModel::new(&graph).all();
        let solved = InstallSolver::new(&graph, &masses).solve()?;
        Ok(solved
            .order
            .into_iter()
            .map(|id| graph.node(id).to_string())
            .collect())
    }

    #[test]
    fn picks_newest_and_orders_dependencies_first() {
        let mut catalog = Catalog::new();
        catalog.insert("app", "1", meta(&["lib>=1", "base"]));
        catalog.insert("lib", "1", meta(&["base"]));
        catalog.insert("lib", "2", meta(&["base"]));
        catalog.insert("base", "1", meta(&[]));
        let plan = solve(&catalog, &["app"]).unwrap();
        assert_eq!(plan, vec!["base 1", "lib 2", "app 1"]);
    }

    #[test]
    fn invalid_only_option_is_unsatisfiable() {
        let mut catalog = Catalog::new();
        catalog.insert("a", "1", meta(&["ghost"]));
        let err = solve(&catalog, &["a"]).unwrap_err();
        match err {
            ResolveError::Unsatisfiable { report } => {
                assert_eq!(report.invalid.len(), 1);
                assert_eq!(report.invalid[0].package, "a 1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn falls_back_to_valid_alternative() {
        let mut catalog = Catalog::new();
        catalog.insert("a", "1", meta(&[]));
        catalog.insert("a", "2", meta(&["ghost"]));
        let plan = solve(&catalog, &["a"]).unwrap();
        assert_eq!(plan, vec!["a 1"]);
    }

    #[test]
    fn cyclic_selection_has_stable_order() {
        let mut catalog = Catalog::new();
        catalog.insert("a", "1", meta(&["b"]));
        catalog.insert("b", "1", meta(&["a"]));
        let first = solve(&catalog, &["a"]).unwrap();
        let second = solve(&catalog, &["a"]).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn deep_chains_order_without_recursion() {
        let mut catalog = Catalog::new();
        for i in 0..5000 {
            let dep = format!("p{}", i + 1);
            let depends: Vec<&str> = if i + 1 < 5000 { vec![dep.as_str()] } else { vec![] };
            catalog.insert(&format!("p{i}"), "1", meta(&depends));
        }
        let channels = ChannelOrder::new(&["defaults"]);
        let graph = GraphBuilder::new(&catalog, &channels)
            .build(&["p0"])
            .unwrap()
            .graph;
        let selected: HashSet<NodeId> = graph.node_ids().into_iter().collect();
        let order = install_order(&graph, &selected);
        assert_eq!(order.len(), 5000);
        assert_eq!(graph.node(order[0]).name, "p4999");
        assert_eq!(graph.node(order[4999]).name, "p0");
    }
}
