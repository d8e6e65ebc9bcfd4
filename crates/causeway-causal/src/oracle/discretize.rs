//! Context discretization: numeric fields are bucketed against the
//! configured per-variable cut points; recognized fields without a rule
//! fall back to generic quartile-style buckets. This policy must match
//! the training-time feature engineering exactly, or effect estimates
//! are meaningless.

use std::collections::HashMap;

use causeway_core::config::OracleConfig;
use causeway_core::constants::GENERIC_BUCKETS;
use causeway_core::context::{Context, ContextValue};

use crate::graph::CausalGraph;

/// Convert a raw context into categorical evidence over the network's
/// variables. Fields the graph does not know are dropped.
pub fn discretize_context(
    context: &Context,
    graph: &CausalGraph,
    config: &OracleConfig,
) -> HashMap<String, String> {
    let mut evidence = HashMap::new();
    for (name, value) in context.entries() {
        if !graph.contains(&name) {
            continue;
        }
        let label = match value {
            ContextValue::Label(label) => label.to_lowercase(),
            ContextValue::Number(v) => match config.rules.get(&name) {
                Some(rule) => rule.bucket(v).to_string(),
                None => generic_bucket(v, &config.generic_cut_points).to_string(),
            },
        };
        evidence.insert(name, label);
    }
    evidence
}

/// Quartile-style bucketing for fields without a variable-specific rule.
/// Boundaries are inclusive on the lower bucket, matching
/// `DiscretizationRule::bucket`.
fn generic_bucket(value: f64, cut_points: &[f64]) -> &'static str {
    for (i, cut) in cut_points.iter().enumerate().take(GENERIC_BUCKETS.len() - 1) {
        if value <= *cut {
            return GENERIC_BUCKETS[i];
        }
    }
    GENERIC_BUCKETS[GENERIC_BUCKETS.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::supply_chain;

    #[test]
    fn thresholds_and_fallback() {
        let graph = supply_chain::build_graph().unwrap();
        let config = supply_chain::default_oracle_config();

        let mut ctx = Context::new();
        ctx.lead_time_days = Some(75.0);
        ctx.supplier_reliability_score = Some(0.9);
        ctx.transport_mode = Some("Air".to_string());
        // No rule for this variable: generic buckets apply. The value
        // sits exactly on the 0.5 boundary and stays in the lower
        // bucket, same as the rule-based paths.
        ctx.extra
            .insert("outcome_metric".to_string(), ContextValue::Number(0.5));
        // Unknown to the graph: dropped.
        ctx.extra
            .insert("unmodeled_field".to_string(), ContextValue::Number(0.9));

        let evidence = discretize_context(&ctx, &graph, &config);
        assert_eq!(evidence["lead_time_days"], "long");
        assert_eq!(evidence["supplier_reliability_score"], "high");
        assert_eq!(evidence["transport_mode"], "air");
        assert_eq!(evidence["outcome_metric"], "medium");
        assert!(!evidence.contains_key("unmodeled_field"));
    }
}
