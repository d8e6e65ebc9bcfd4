//! The causal graph: named variables with ordered discrete domains, a
//! DAG of cause→effect edges, and qualitative relationship metadata
//! used for explanations (never for inference math).

pub mod dag;
pub mod supply_chain;

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use causeway_core::errors::{CausalError, CausewayResult};

/// A qualitative causal relationship, keyed by (cause, effect).
/// Used only for human-readable explanation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CausalRelationship {
    pub cause: String,
    pub effect: String,
    /// Strength in [0, 1].
    pub strength: f64,
    /// Confidence in [0, 1].
    pub confidence: f64,
    /// Free-text mechanism description.
    pub mechanism: String,
}

/// A directed acyclic graph over domain variables. Built once at
/// startup and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct CausalGraph {
    graph: DiGraph<String, ()>,
    indices: HashMap<String, NodeIndex>,
    domains: HashMap<String, Vec<String>>,
    relationships: HashMap<(String, String), CausalRelationship>,
}

impl CausalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying petgraph structure, for traversal and cycle checks.
    pub fn inner(&self) -> &DiGraph<String, ()> {
        &self.graph
    }

    /// Declare a variable with its ordered discrete domain.
    pub fn add_variable(&mut self, name: &str, domain: &[&str]) -> CausewayResult<()> {
        if self.indices.contains_key(name) {
            return Err(CausalError::DuplicateVariable {
                name: name.to_string(),
            }
            .into());
        }
        let idx = self.graph.add_node(name.to_string());
        self.indices.insert(name.to_string(), idx);
        self.domains.insert(
            name.to_string(),
            domain.iter().map(|s| s.to_string()).collect(),
        );
        Ok(())
    }

    /// Add a cause→effect edge. Fails if either variable is unknown or
    /// the edge would create a cycle.
    pub fn add_edge(&mut self, cause: &str, effect: &str) -> CausewayResult<()> {
        let from = self.index_of(cause)?;
        let to = self.index_of(effect)?;
        if dag::would_create_cycle(&self.graph, from, to) {
            return Err(CausalError::CycleDetected {
                cause: cause.to_string(),
                effect: effect.to_string(),
            }
            .into());
        }
        self.graph.add_edge(from, to, ());
        Ok(())
    }

    /// Attach relationship metadata for explanation generation.
    pub fn add_relationship(&mut self, rel: CausalRelationship) {
        self.relationships
            .insert((rel.cause.clone(), rel.effect.clone()), rel);
    }

    fn index_of(&self, name: &str) -> CausewayResult<NodeIndex> {
        self.indices
            .get(name)
            .copied()
            .ok_or_else(|| {
                CausalError::UnknownVariable {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// Direct causes of a variable, in insertion order of their edges.
    pub fn parents(&self, name: &str) -> Vec<String> {
        let Some(&idx) = self.indices.get(name) else {
            return Vec::new();
        };
        let mut parents: Vec<String> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|p| self.graph[p].clone())
            .collect();
        // petgraph yields incoming neighbors newest-first; keep a stable order.
        parents.sort();
        parents
    }

    /// The ordered discrete domain of a variable.
    pub fn domain(&self, name: &str) -> Option<&[String]> {
        self.domains.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    /// All declared variable names.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// All (cause, effect) edges.
    pub fn edges(&self) -> Vec<(String, String)> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| (self.graph[a].clone(), self.graph[b].clone()))
            .collect()
    }

    pub fn variable_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Relationship metadata for a (cause, effect) pair, if declared.
    pub fn relationship(&self, cause: &str, effect: &str) -> Option<&CausalRelationship> {
        self.relationships
            .get(&(cause.to_string(), effect.to_string()))
    }
}
