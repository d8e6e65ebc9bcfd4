//! Integration tests for the discrete Bayesian network: fitting,
//! fallback, fail-closed queries, and causal effect estimation.

use std::collections::HashMap;
use std::sync::Arc;

use causeway_causal::bayes::{BayesianNetwork, FitState};
use causeway_causal::graph::CausalGraph;
use causeway_core::dataset::{Column, ObservationTable};

fn two_node_graph() -> Arc<CausalGraph> {
    let mut g = CausalGraph::new();
    g.add_variable("a", &["s0", "s1", "s2"]).unwrap();
    g.add_variable("b", &["s0", "s1", "s2"]).unwrap();
    g.add_edge("a", "b").unwrap();
    Arc::new(g)
}

// =============================================================================
// Deterministic copy: fitting concentrates P(b | a) on the copied state
// =============================================================================
#[test]
fn fit_recovers_deterministic_copy() {
    let graph = two_node_graph();
    let mut table = ObservationTable::new();
    let values: Vec<String> = (0..1000).map(|i| format!("s{}", i % 3)).collect();
    table.insert("a", Column::Categorical(values.clone()));
    table.insert("b", Column::Categorical(values));

    let mut network = BayesianNetwork::new(graph);
    network.fit(&table);
    assert_eq!(network.state(), FitState::Fitted);

    let evidence = HashMap::from([("a".to_string(), "s0".to_string())]);
    let dist = network.query("b", &evidence).unwrap();
    assert!(dist[0] > 0.999, "P(b=s0 | a=s0) = {}", dist[0]);
    assert!(dist[1] < 1e-9 && dist[2] < 1e-9);
}

// =============================================================================
// Fail-closed: unfit network returns exactly 0.0 for any effect query
// =============================================================================
#[test]
fn unfit_network_returns_zero_effect() {
    let mut g = CausalGraph::new();
    g.add_variable("act", &["no", "yes"]).unwrap();
    g.add_variable("out", &["low", "high"]).unwrap();
    g.add_edge("act", "out").unwrap();
    let network = BayesianNetwork::new(Arc::new(g));

    assert_eq!(network.state(), FitState::Unfit);
    let effect = network.estimate_causal_effect(
        "act",
        "out",
        &HashMap::new(),
        &["high".to_string()],
    );
    assert_eq!(effect, 0.0);
}

// =============================================================================
// Causal effect sign convention: action removes the negative outcome
// =============================================================================
#[test]
fn effect_is_positive_when_action_prevents_bad_outcome() {
    let mut g = CausalGraph::new();
    g.add_variable("act", &["no", "yes"]).unwrap();
    g.add_variable("out", &["low", "high"]).unwrap();
    g.add_edge("act", "out").unwrap();

    // act=yes always yields out=low; act=no always yields out=high.
    let mut table = ObservationTable::new();
    let actions: Vec<String> = (0..500)
        .map(|i| if i % 2 == 0 { "yes" } else { "no" }.to_string())
        .collect();
    let outcomes: Vec<String> = actions
        .iter()
        .map(|a| if a == "yes" { "low" } else { "high" }.to_string())
        .collect();
    table.insert("act", Column::Categorical(actions));
    table.insert("out", Column::Categorical(outcomes));

    let mut network = BayesianNetwork::new(Arc::new(g));
    network.fit(&table);
    assert_eq!(network.state(), FitState::Fitted);

    let effect =
        network.estimate_causal_effect("act", "out", &HashMap::new(), &["high".to_string()]);
    assert!((effect - 1.0).abs() < 1e-9, "effect = {effect}");

    // Counterfactual: intervening flips the most likely outcome.
    let observed = HashMap::from([("act".to_string(), "no".to_string())]);
    let cf = network.counterfactual_analysis("act", "out", &observed);
    assert!((cf.factual_probability - 1.0).abs() < 1e-9);
    assert!((cf.counterfactual_probability - 1.0).abs() < 1e-9);
}

// =============================================================================
// Missing columns degrade to uniform CPDs, never to a raise
// =============================================================================
#[test]
fn missing_columns_fall_back_to_uniform() {
    let graph = two_node_graph();
    let mut table = ObservationTable::new();
    table.insert(
        "a",
        Column::Categorical((0..30).map(|i| format!("s{}", i % 3)).collect()),
    );
    // No column for b at all.

    let mut network = BayesianNetwork::new(graph);
    network.fit(&table);
    assert_eq!(network.state(), FitState::Fitted);

    let dist = network.query("b", &HashMap::new()).unwrap();
    for p in &dist {
        assert!((p - 1.0 / 3.0).abs() < 1e-9, "uniform fallback expected, got {dist:?}");
    }
}

// =============================================================================
// Prior-knowledge mode: uniform everywhere, neutral effects
// =============================================================================
#[test]
fn uniform_priors_give_neutral_effects() {
    let mut g = CausalGraph::new();
    g.add_variable("act", &["no", "yes"]).unwrap();
    g.add_variable("out", &["low", "high"]).unwrap();
    g.add_edge("act", "out").unwrap();

    let mut network = BayesianNetwork::new(Arc::new(g));
    network.fit_uniform();
    assert_eq!(network.state(), FitState::Fitted);
    network.check_model().unwrap();

    let effect =
        network.estimate_causal_effect("act", "out", &HashMap::new(), &["high".to_string()]);
    assert!(effect.abs() < 1e-12);
}

// =============================================================================
// Evidence for a state outside the domain degrades to zero effect
// =============================================================================
#[test]
fn bad_evidence_degrades_to_zero() {
    let mut g = CausalGraph::new();
    g.add_variable("act", &["no", "yes"]).unwrap();
    g.add_variable("season", &["wet", "dry"]).unwrap();
    g.add_variable("out", &["low", "high"]).unwrap();
    g.add_edge("act", "out").unwrap();
    g.add_edge("season", "out").unwrap();

    let mut network = BayesianNetwork::new(Arc::new(g));
    network.fit_uniform();

    let context = HashMap::from([("out_of_band".to_string(), "whatever".to_string())]);
    // Unknown variables are dropped, so this still answers.
    let effect =
        network.estimate_causal_effect("act", "out", &context, &["high".to_string()]);
    assert!(effect.abs() < 1e-12);

    let bad = HashMap::from([("season".to_string(), "nonexistent_state".to_string())]);
    assert!(network.query("out", &bad).is_err());
    // But the effect path swallows it.
    let effect = network.estimate_causal_effect("act", "out", &bad, &["high".to_string()]);
    assert_eq!(effect, 0.0);
}
