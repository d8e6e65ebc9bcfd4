//! Discrete Bayesian network over the causal graph: CPD estimation from
//! observational data, whole-model validation, and fail-closed
//! interventional queries.

pub mod binning;
pub mod cpd;
pub mod elimination;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use causeway_core::dataset::ObservationTable;
use causeway_core::errors::{CausalError, CausewayResult};

use crate::graph::CausalGraph;
use cpd::Cpd;

/// Lifecycle of the network: `Unfit → Fitting → Fitted | FitFailed`.
/// `FitFailed` is terminal and degraded: effect queries return 0.0
/// instead of raising.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitState {
    Unfit,
    Fitting,
    Fitted,
    FitFailed,
}

/// Result of a counterfactual query: what happened vs. what would have
/// happened under the intervention.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CounterfactualResult {
    pub factual_probability: f64,
    pub counterfactual_probability: f64,
    pub causal_effect: f64,
}

/// A discrete Bayesian network wrapping the causal DAG.
pub struct BayesianNetwork {
    graph: Arc<CausalGraph>,
    cpds: HashMap<String, Cpd>,
    state: FitState,
}

impl BayesianNetwork {
    pub fn new(graph: Arc<CausalGraph>) -> Self {
        Self {
            graph,
            cpds: HashMap::new(),
            state: FitState::Unfit,
        }
    }

    /// The fitted table for one variable, if any.
    pub fn cpd(&self, variable: &str) -> Option<&Cpd> {
        self.cpds.get(variable)
    }

    pub fn state(&self) -> FitState {
        self.state
    }

    pub fn graph(&self) -> &CausalGraph {
        &self.graph
    }

    /// Install uniform CPDs for every variable. Used when no
    /// observational data is available (prior-knowledge mode): the
    /// network stays queryable and all effects come out neutral.
    pub fn fit_uniform(&mut self) {
        self.cpds.clear();
        for variable in self.graph.variables() {
            self.cpds
                .insert(variable.to_string(), self.uniform_cpd(variable));
        }
        self.state = FitState::Fitted;
        info!("Bayesian network initialized with uniform priors");
    }

    /// Fit CPDs to observational data by maximum-likelihood counting.
    /// Per-variable estimation failures fall back to uniform CPDs; a
    /// whole-model validation failure leaves the network in `FitFailed`
    /// (logged, never raised).
    pub fn fit(&mut self, data: &ObservationTable) {
        info!(rows = data.row_count(), "fitting Bayesian network");
        self.state = FitState::Fitting;
        self.cpds.clear();

        // Discretize every relevant column once, up front. The same
        // labels must come out of the oracle's context discretization
        // at query time.
        let mut columns: HashMap<String, Vec<String>> = HashMap::new();
        for variable in self.graph.variables() {
            if let Some(column) = data.column(variable) {
                columns.insert(variable.to_string(), binning::discretize_column(column));
            }
        }

        let variables: Vec<String> = self.graph.variables().map(String::from).collect();
        for variable in &variables {
            match self.estimate_cpd(variable, &columns) {
                Ok(cpd) => {
                    self.cpds.insert(variable.clone(), cpd);
                }
                Err(e) => {
                    warn!(variable = %variable, error = %e, "CPD estimation failed, using uniform fallback");
                    self.cpds
                        .insert(variable.clone(), self.uniform_cpd(variable));
                }
            }
        }

        match self.check_model() {
            Ok(()) => {
                self.state = FitState::Fitted;
                info!("Bayesian network fitted successfully");
            }
            Err(e) => {
                self.state = FitState::FitFailed;
                warn!(error = %e, "Bayesian network validation failed");
            }
        }
    }

    fn uniform_cpd(&self, variable: &str) -> Cpd {
        let states = self.graph.domain(variable).unwrap_or_default().to_vec();
        let parents = self.graph.parents(variable);
        if parents.is_empty() {
            Cpd::uniform(variable, &states)
        } else {
            let cards: Vec<usize> = parents
                .iter()
                .map(|p| self.graph.domain(p).map_or(2, <[String]>::len))
                .collect();
            Cpd::uniform_with_parents(variable, &states, &parents, &cards)
        }
    }

    /// Maximum-likelihood CPD for one variable from discretized columns.
    /// Parent combinations never observed get a uniform row.
    fn estimate_cpd(
        &self,
        variable: &str,
        columns: &HashMap<String, Vec<String>>,
    ) -> CausewayResult<Cpd> {
        let states = self
            .graph
            .domain(variable)
            .ok_or_else(|| CausalError::UnknownVariable {
                name: variable.to_string(),
            })?
            .to_vec();
        let column = columns
            .get(variable)
            .ok_or_else(|| CausalError::InvalidCpd {
                variable: variable.to_string(),
                reason: "no observations".to_string(),
            })?;
        if column.is_empty() {
            return Err(CausalError::InvalidCpd {
                variable: variable.to_string(),
                reason: "empty column".to_string(),
            }
            .into());
        }

        let parents = self.graph.parents(variable);
        let parent_columns: Vec<&Vec<String>> = parents
            .iter()
            .map(|p| {
                columns.get(p).ok_or_else(|| CausalError::InvalidCpd {
                    variable: variable.to_string(),
                    reason: format!("parent {p} has no observations"),
                })
            })
            .collect::<Result<_, _>>()?;
        let parent_cards: Vec<usize> = parents
            .iter()
            .map(|p| self.graph.domain(p).map_or(2, <[String]>::len))
            .collect();

        let mut cpd = Cpd::uniform_with_parents(variable, &states, &parents, &parent_cards);
        let combos = cpd.combo_count();
        let mut counts = vec![vec![0.0f64; states.len()]; combos];

        'rows: for row in 0..column.len() {
            let Some(state_idx) = states.iter().position(|s| s == &column[row]) else {
                // Label outside the declared domain: skip the row.
                continue;
            };
            let mut parent_states = Vec::with_capacity(parents.len());
            for (p, parent_column) in parent_columns.iter().enumerate() {
                let parent_domain = self.graph.domain(&parents[p]).unwrap_or_default();
                match parent_domain.iter().position(|s| s == &parent_column[row]) {
                    Some(idx) => parent_states.push(idx),
                    None => continue 'rows,
                }
            }
            counts[cpd.combo_index(&parent_states)][state_idx] += 1.0;
        }

        let total: f64 = counts.iter().flatten().sum();
        if total == 0.0 {
            return Err(CausalError::InvalidCpd {
                variable: variable.to_string(),
                reason: "no rows matched the declared domain".to_string(),
            }
            .into());
        }

        for (combo, row) in counts.iter().enumerate() {
            let row_total: f64 = row.iter().sum();
            if row_total > 0.0 {
                cpd.values[combo] = row.iter().map(|c| c / row_total).collect();
            }
            // Unseen parent combinations keep the uniform row.
        }
        Ok(cpd)
    }

    /// Validate global consistency: every variable has a CPD of the
    /// right cardinality whose parents match the graph.
    pub fn check_model(&self) -> CausewayResult<()> {
        for variable in self.graph.variables() {
            let cpd = self
                .cpds
                .get(variable)
                .ok_or_else(|| CausalError::ModelInvalid {
                    details: format!("no CPD for {variable}"),
                })?;
            let domain = self.graph.domain(variable).unwrap_or_default();
            if cpd.states.len() != domain.len() {
                return Err(CausalError::ModelInvalid {
                    details: format!(
                        "{variable}: CPD cardinality {} != domain {}",
                        cpd.states.len(),
                        domain.len()
                    ),
                }
                .into());
            }
            if cpd.parents != self.graph.parents(variable) {
                return Err(CausalError::ModelInvalid {
                    details: format!("{variable}: CPD parents diverge from graph"),
                }
                .into());
            }
            cpd.validate()?;
        }
        Ok(())
    }

    /// Posterior marginal P(target | evidence). Evidence entries naming
    /// variables the graph does not know are dropped; evidence states
    /// outside a variable's domain are an error.
    pub fn query(
        &self,
        target: &str,
        evidence: &HashMap<String, String>,
    ) -> CausewayResult<Vec<f64>> {
        let mut indexed: HashMap<String, usize> = HashMap::new();
        for (var, state) in evidence {
            let Some(domain) = self.graph.domain(var) else {
                debug!(variable = %var, "dropping evidence for unknown variable");
                continue;
            };
            let idx = domain.iter().position(|s| s == state).ok_or_else(|| {
                CausalError::InferenceFailed {
                    variable: var.clone(),
                    reason: format!("state {state} not in domain"),
                }
            })?;
            indexed.insert(var.clone(), idx);
        }
        elimination::query(&self.cpds, target, &indexed)
    }

    /// Expected causal uplift of `action` on `outcome` in the given
    /// context: P(negative | do(no)) − P(negative | do(yes)), so a
    /// positive value means the action reduces the chance of a bad
    /// outcome. Fails closed to 0.0 whenever the network is not fitted
    /// or inference cannot be completed.
    pub fn estimate_causal_effect(
        &self,
        action: &str,
        outcome: &str,
        context: &HashMap<String, String>,
        negative_states: &[String],
    ) -> f64 {
        if self.state != FitState::Fitted {
            warn!("model not fitted, cannot estimate causal effects");
            return 0.0;
        }

        let result = (|| -> CausewayResult<f64> {
            // The outcome must stay free: conditioning it on its own
            // observed value would pin both interventional queries.
            let mut base = context.clone();
            base.remove(outcome);

            let mut with_action = base.clone();
            with_action.insert(action.to_string(), "yes".to_string());
            let p_yes = self.query(outcome, &with_action)?;

            let mut without_action = base;
            without_action.insert(action.to_string(), "no".to_string());
            let p_no = self.query(outcome, &without_action)?;

            let domain = self.graph.domain(outcome).unwrap_or_default();
            let negative_mass = |dist: &[f64]| -> f64 {
                domain
                    .iter()
                    .zip(dist)
                    .filter(|(state, _)| negative_states.contains(state))
                    .map(|(_, p)| p)
                    .sum()
            };
            Ok(negative_mass(&p_no) - negative_mass(&p_yes))
        })();

        match result {
            Ok(effect) => effect,
            Err(e) => {
                warn!(action = %action, outcome = %outcome, error = %e, "could not estimate causal effect");
                0.0
            }
        }
    }

    /// Counterfactual analysis: P(outcome | evidence) versus
    /// P(outcome | evidence, action = yes), reported as the max-state
    /// probabilities plus their difference. Fails closed to zeros.
    pub fn counterfactual_analysis(
        &self,
        action: &str,
        outcome: &str,
        observed: &HashMap<String, String>,
    ) -> CounterfactualResult {
        if self.state != FitState::Fitted {
            return CounterfactualResult::default();
        }

        let result = (|| -> CausewayResult<CounterfactualResult> {
            let factual = self.query(outcome, observed)?;
            let mut intervened = observed.clone();
            intervened.insert(action.to_string(), "yes".to_string());
            let counterfactual = self.query(outcome, &intervened)?;

            let max = |dist: &[f64]| dist.iter().copied().fold(0.0f64, f64::max);
            let factual_probability = max(&factual);
            let counterfactual_probability = max(&counterfactual);
            Ok(CounterfactualResult {
                factual_probability,
                counterfactual_probability,
                causal_effect: counterfactual_probability - factual_probability,
            })
        })();

        result.unwrap_or_else(|e| {
            warn!(action = %action, outcome = %outcome, error = %e, "counterfactual analysis failed");
            CounterfactualResult::default()
        })
    }
}
