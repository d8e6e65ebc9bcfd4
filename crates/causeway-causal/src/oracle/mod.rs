//! The causal oracle: the façade the RL agent queries each decision
//! step for feasibility masks and treatment-effect estimates.

pub mod discretize;
pub mod feasibility;

use std::collections::HashMap;
use std::sync::Arc;

use causeway_core::config::OracleConfig;
use causeway_core::constants::NO_ACTION;
use causeway_core::context::Context;
use causeway_core::errors::{CausalError, CausewayResult};

use crate::bayes::{BayesianNetwork, CounterfactualResult};
use crate::graph::supply_chain::ACTION_VARIABLES;
use crate::graph::CausalGraph;

/// Agent-facing oracle over the fitted Bayesian network.
pub struct CausalOracle {
    graph: Arc<CausalGraph>,
    network: BayesianNetwork,
    config: OracleConfig,
}

impl CausalOracle {
    /// Build an oracle. The configuration is validated up front: a
    /// discretization rule whose label count does not match its cut
    /// points, or a negative-state partition naming an unknown state,
    /// is a construction error rather than a silent misread at query
    /// time. The config is serde-deserializable, so this is the choke
    /// point for malformed files too.
    pub fn new(
        graph: Arc<CausalGraph>,
        network: BayesianNetwork,
        config: OracleConfig,
    ) -> CausewayResult<Self> {
        for (variable, rule) in &config.rules {
            if rule.labels.len() != rule.cut_points.len() + 1 {
                return Err(CausalError::InvalidDiscretizationRule {
                    variable: variable.clone(),
                    reason: format!(
                        "{} labels for {} cut points",
                        rule.labels.len(),
                        rule.cut_points.len()
                    ),
                }
                .into());
            }
        }
        for (variable, states) in &config.negative_states {
            let domain = graph
                .domain(variable)
                .ok_or_else(|| CausalError::UnknownVariable {
                    name: variable.clone(),
                })?;
            for state in states {
                if !domain.contains(state) {
                    return Err(CausalError::InvalidOutcomePartition {
                        variable: variable.clone(),
                        state: state.clone(),
                    }
                    .into());
                }
            }
        }
        Ok(Self {
            graph,
            network,
            config,
        })
    }

    /// The action variables this oracle reasons about, in index order.
    pub fn action_variables(&self) -> &'static [&'static str] {
        &ACTION_VARIABLES
    }

    /// Discretize a raw context into categorical evidence.
    pub fn discretize(&self, context: &Context) -> HashMap<String, String> {
        discretize::discretize_context(context, &self.graph, &self.config)
    }

    /// Is `action` feasible in this context?
    pub fn is_feasible(&self, action: &str, context: &Context) -> bool {
        feasibility::is_feasible(action, &self.discretize(context))
    }

    /// All feasible actions for the context. The no-op is always legal.
    pub fn legal_actions(&self, context: &Context) -> Vec<String> {
        let evidence = self.discretize(context);
        let mut actions: Vec<String> = ACTION_VARIABLES
            .iter()
            .filter(|a| feasibility::is_feasible(a, &evidence))
            .map(|a| a.to_string())
            .collect();
        actions.push(NO_ACTION.to_string());
        actions
    }

    /// Expected causal effect of `action` on its primary outcome in
    /// this context. Used for reward shaping; 0.0 when the network
    /// cannot answer.
    pub fn effect(&self, action: &str, context: &Context) -> f64 {
        let evidence = self.discretize(context);
        let outcome = self.primary_outcome(action);
        let negative = self
            .config
            .negative_states_of(outcome)
            .unwrap_or_default();
        self.network
            .estimate_causal_effect(action, outcome, &evidence, negative)
    }

    /// Average-treatment-effect framing of `effect`, for call sites
    /// that read better as uplift.
    pub fn uplift(&self, action: &str, context: &Context) -> f64 {
        self.effect(action, context)
    }

    /// Counterfactual query delegated to the network.
    pub fn counterfactual(
        &self,
        action: &str,
        outcome: &str,
        observed: &Context,
    ) -> CounterfactualResult {
        self.network
            .counterfactual_analysis(action, outcome, &self.discretize(observed))
    }

    /// The outcome variable each action primarily targets.
    pub fn primary_outcome(&self, action: &str) -> &'static str {
        match action {
            "switch_supplier" => "supplier_reliability_score",
            "increase_safety_stock" | "emergency_procurement" => "stockout_frequency",
            "reroute_shipments" => "lead_time_days",
            "allocate_resources" => "on_time_delivery_pct",
            _ => "outcome_metric",
        }
    }

    /// Human-readable explanation of the action→outcome relationship.
    /// Pure metadata lookup; no inference.
    pub fn causal_explanation(&self, action: &str, outcome: &str) -> String {
        match self.graph.relationship(action, outcome) {
            Some(rel) => format!("{} (strength: {:.2})", rel.mechanism, rel.strength),
            None => format!("Indirect causal pathway from {action} to {outcome}"),
        }
    }
}
