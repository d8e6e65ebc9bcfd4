use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Cut points and labels for one numeric context variable.
///
/// A value `v` maps to `labels[i]` for the first cut point with
/// `v <= cut_points[i]`, and to the last label otherwise, so
/// `labels.len()` must be `cut_points.len() + 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscretizationRule {
    pub cut_points: Vec<f64>,
    pub labels: Vec<String>,
}

impl DiscretizationRule {
    pub fn new(cut_points: &[f64], labels: &[&str]) -> Self {
        debug_assert_eq!(labels.len(), cut_points.len() + 1);
        Self {
            cut_points: cut_points.to_vec(),
            labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Map a numeric value to its bucket label. Total even on a
    /// malformed rule: excess cut points are ignored and anything past
    /// the labeled range maps to the last label.
    pub fn bucket(&self, value: f64) -> &str {
        for (cut, label) in self.cut_points.iter().zip(&self.labels) {
            if value <= *cut {
                return label;
            }
        }
        self.labels.last().map(String::as_str).unwrap_or("high")
    }
}

/// Oracle configuration: discretization policy and the outcome-sign
/// convention. Both are domain assumptions, so they live in
/// configuration rather than hardcoded policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Per-variable numeric discretization rules. Fields without a rule
    /// fall back to `generic_cut_points` with low/medium/high/very_high labels.
    pub rules: HashMap<String, DiscretizationRule>,
    /// Generic quartile-style cut points for unrecognized numeric fields.
    pub generic_cut_points: Vec<f64>,
    /// For each outcome variable, the states that count as "negative".
    /// The causal effect of an action is
    /// P(negative | do(no)) - P(negative | do(yes)), so a positive
    /// effect means the action reduces the chance of a bad outcome.
    pub negative_states: HashMap<String, Vec<String>>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            rules: HashMap::new(),
            generic_cut_points: defaults::GENERIC_CUT_POINTS.to_vec(),
            negative_states: HashMap::new(),
        }
    }
}

impl OracleConfig {
    /// Register a discretization rule for a variable.
    pub fn with_rule(mut self, variable: &str, cut_points: &[f64], labels: &[&str]) -> Self {
        self.rules.insert(
            variable.to_string(),
            DiscretizationRule::new(cut_points, labels),
        );
        self
    }

    /// Register the negative states of an outcome variable.
    pub fn with_negative_states(mut self, variable: &str, states: &[&str]) -> Self {
        self.negative_states.insert(
            variable.to_string(),
            states.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Negative states registered for an outcome, if any.
    pub fn negative_states_of(&self, outcome: &str) -> Option<&[String]> {
        self.negative_states.get(outcome).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_respects_cut_points() {
        let rule = DiscretizationRule::new(&[30.0, 60.0, 90.0], &["short", "medium", "long", "very_long"]);
        assert_eq!(rule.bucket(10.0), "short");
        assert_eq!(rule.bucket(30.0), "short");
        assert_eq!(rule.bucket(45.0), "medium");
        assert_eq!(rule.bucket(90.0), "long");
        assert_eq!(rule.bucket(120.0), "very_long");
    }

    #[test]
    fn bucket_is_total_on_malformed_rules() {
        // Too few labels for the cut points; bucket must still answer.
        let rule: DiscretizationRule =
            serde_json::from_str(r#"{"cut_points":[10.0,20.0,30.0],"labels":["a"]}"#).unwrap();
        assert_eq!(rule.bucket(5.0), "a");
        assert_eq!(rule.bucket(15.0), "a");
        assert_eq!(rule.bucket(100.0), "a");
    }
}
