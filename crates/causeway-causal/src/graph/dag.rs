//! Cycle detection before every edge insertion. Rejects any edge that
//! would create a cycle in the DAG.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;

/// Check whether adding an edge from `cause` to `effect` would create a
/// cycle. Adding cause→effect creates one exactly when `cause` is
/// already reachable from `effect`.
pub fn would_create_cycle<N, E>(graph: &DiGraph<N, E>, cause: NodeIndex, effect: NodeIndex) -> bool {
    // Self-loops are always cycles.
    if cause == effect {
        return true;
    }
    has_path(graph, effect, cause)
}

/// DFS-based reachability check: can we reach `to` from `from`?
fn has_path<N, E>(graph: &DiGraph<N, E>, from: NodeIndex, to: NodeIndex) -> bool {
    let mut dfs = Dfs::new(graph, from);
    while let Some(node) = dfs.next(graph) {
        if node == to {
            return true;
        }
    }
    false
}

/// Audit the whole graph: returns every SCC with more than one node,
/// i.e. every cycle. Empty result means the graph is a DAG.
pub fn find_cycles<N, E>(graph: &DiGraph<N, E>) -> Vec<Vec<NodeIndex>> {
    tarjan_scc(graph)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_back_edge() {
        let mut g: DiGraph<&str, ()> = DiGraph::new();
        let a = g.add_node("a");
        let b = g.add_node("b");
        let c = g.add_node("c");
        g.add_edge(a, b, ());
        g.add_edge(b, c, ());

        assert!(would_create_cycle(&g, c, a));
        assert!(would_create_cycle(&g, a, a));
        assert!(!would_create_cycle(&g, a, c));
        assert!(find_cycles(&g).is_empty());
    }
}
