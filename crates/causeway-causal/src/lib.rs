//! # causeway-causal
//!
//! Causal intelligence layer: a domain DAG over supply-chain variables,
//! a discrete Bayesian network fit to observational data, and the
//! `CausalOracle` the RL agent queries for feasibility masks and
//! treatment-effect estimates.

pub mod bayes;
pub mod graph;
pub mod model;
pub mod oracle;

pub use bayes::{BayesianNetwork, CounterfactualResult, FitState};
pub use graph::{CausalGraph, CausalRelationship};
pub use model::build_supply_chain_model;
pub use oracle::CausalOracle;
