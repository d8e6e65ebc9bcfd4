//! The fixed supply-chain domain graph: disruption, logistics, supplier,
//! inventory, and outcome variables plus the five mitigation actions.
//! Variable domains and cut points follow the GHSC/LPI data ranges.

use causeway_core::config::OracleConfig;
use causeway_core::errors::CausewayResult;

use super::{CausalGraph, CausalRelationship};

/// The five mitigation actions, in action-index order. Index 5 is the
/// implicit no-op, which is not a graph variable.
pub const ACTION_VARIABLES: [&str; 5] = [
    "switch_supplier",
    "increase_safety_stock",
    "emergency_procurement",
    "reroute_shipments",
    "allocate_resources",
];

/// Build the supply-chain DAG: ~18 variables, ~31 edges.
pub fn build_graph() -> CausewayResult<CausalGraph> {
    let mut g = CausalGraph::new();

    // Supply chain fundamentals.
    g.add_variable("lead_time_days", &["short", "medium", "long", "very_long"])?;
    g.add_variable("on_time_delivery_pct", &["low", "medium", "high", "excellent"])?;
    g.add_variable("supplier_reliability_score", &["low", "medium", "high"])?;
    g.add_variable("stockout_frequency", &["rare", "occasional", "frequent", "critical"])?;
    g.add_variable("freight_cost_level", &["low", "medium", "high", "premium"])?;

    // Disruptions.
    g.add_variable(
        "disruption_type",
        &["none", "flood", "covid_lockdown", "conflict", "port_closure", "cyber_attack"],
    )?;
    g.add_variable("disruption_severity", &["none", "low", "medium", "high", "extreme"])?;

    // Logistics performance.
    g.add_variable("lpi_score", &["very_low", "low", "medium", "high", "very_high"])?;
    g.add_variable("customs_efficiency", &["poor", "fair", "good", "excellent"])?;
    g.add_variable("infrastructure_quality", &["poor", "fair", "good", "excellent"])?;
    g.add_variable("transport_mode", &["air", "ocean", "land", "multimodal"])?;

    // Warehouse and overall outcome.
    g.add_variable("warehouse_type", &["public_depot", "rdc", "3pl", "coe"])?;
    g.add_variable("outcome_metric", &["poor", "fair", "good", "excellent"])?;

    // Actions are binary root variables.
    for action in ACTION_VARIABLES {
        g.add_variable(action, &["no", "yes"])?;
    }

    let edges = [
        // Disruption impacts.
        ("disruption_type", "disruption_severity"),
        ("disruption_severity", "supplier_reliability_score"),
        ("disruption_severity", "lead_time_days"),
        ("disruption_severity", "freight_cost_level"),
        // Supply chain fundamentals.
        ("supplier_reliability_score", "on_time_delivery_pct"),
        ("lead_time_days", "on_time_delivery_pct"),
        ("lead_time_days", "stockout_frequency"),
        ("freight_cost_level", "transport_mode"),
        // Logistics performance.
        ("lpi_score", "lead_time_days"),
        ("customs_efficiency", "lead_time_days"),
        ("infrastructure_quality", "freight_cost_level"),
        ("transport_mode", "freight_cost_level"),
        ("transport_mode", "lead_time_days"),
        // Warehouse and operational efficiency.
        ("warehouse_type", "stockout_frequency"),
        ("warehouse_type", "on_time_delivery_pct"),
        ("lpi_score", "customs_efficiency"),
        ("infrastructure_quality", "customs_efficiency"),
        // Performance outcomes.
        ("on_time_delivery_pct", "outcome_metric"),
        ("stockout_frequency", "outcome_metric"),
        ("freight_cost_level", "outcome_metric"),
        ("supplier_reliability_score", "outcome_metric"),
        // Action effects.
        ("switch_supplier", "supplier_reliability_score"),
        ("switch_supplier", "freight_cost_level"),
        ("increase_safety_stock", "stockout_frequency"),
        ("increase_safety_stock", "freight_cost_level"),
        ("emergency_procurement", "stockout_frequency"),
        ("emergency_procurement", "freight_cost_level"),
        ("reroute_shipments", "lead_time_days"),
        ("reroute_shipments", "transport_mode"),
        ("allocate_resources", "on_time_delivery_pct"),
        ("allocate_resources", "outcome_metric"),
    ];
    for (cause, effect) in edges {
        g.add_edge(cause, effect)?;
    }

    add_relationships(&mut g);
    Ok(g)
}

/// Strength/mechanism metadata for the best-understood relationships.
fn add_relationships(g: &mut CausalGraph) {
    let relationships: [(&str, &str, f64); 14] = [
        // Strong.
        ("disruption_severity", "supplier_reliability_score", 0.8),
        ("supplier_reliability_score", "on_time_delivery_pct", 0.9),
        ("lead_time_days", "on_time_delivery_pct", 0.8),
        ("on_time_delivery_pct", "outcome_metric", 0.9),
        ("increase_safety_stock", "stockout_frequency", 0.8),
        // Medium.
        ("disruption_severity", "lead_time_days", 0.6),
        ("lpi_score", "lead_time_days", 0.6),
        ("infrastructure_quality", "freight_cost_level", 0.6),
        ("warehouse_type", "stockout_frequency", 0.5),
        ("transport_mode", "freight_cost_level", 0.6),
        // Weak.
        ("customs_efficiency", "lead_time_days", 0.4),
        ("reroute_shipments", "lead_time_days", 0.4),
        ("disruption_severity", "freight_cost_level", 0.3),
        ("switch_supplier", "freight_cost_level", 0.3),
    ];
    for (cause, effect, strength) in relationships {
        g.add_relationship(CausalRelationship {
            cause: cause.to_string(),
            effect: effect.to_string(),
            strength,
            confidence: 0.8,
            mechanism: mechanism_description(cause, effect),
        });
    }
}

fn mechanism_description(cause: &str, effect: &str) -> String {
    let known = match (cause, effect) {
        ("disruption_severity", "supplier_reliability_score") => {
            Some("Higher disruption severity reduces supplier reliability")
        }
        ("supplier_reliability_score", "on_time_delivery_pct") => {
            Some("More reliable suppliers achieve better on-time delivery")
        }
        ("lead_time_days", "on_time_delivery_pct") => {
            Some("Longer lead times reduce on-time delivery performance")
        }
        ("on_time_delivery_pct", "outcome_metric") => {
            Some("Better delivery performance improves overall outcomes")
        }
        ("lpi_score", "lead_time_days") => {
            Some("Better logistics infrastructure reduces lead times")
        }
        ("transport_mode", "freight_cost_level") => {
            Some("Air transport costs more than ocean or land")
        }
        ("warehouse_type", "stockout_frequency") => {
            Some("Warehouse efficiency affects stockout rates")
        }
        ("increase_safety_stock", "stockout_frequency") => {
            Some("Higher safety stock reduces stockout risk")
        }
        ("switch_supplier", "supplier_reliability_score") => {
            Some("Switching suppliers may improve or worsen reliability")
        }
        ("emergency_procurement", "freight_cost_level") => {
            Some("Emergency procurement increases costs significantly")
        }
        _ => None,
    };
    known
        .map(String::from)
        .unwrap_or_else(|| format!("{cause} causally influences {effect}"))
}

/// Default oracle configuration for this domain: the per-variable
/// discretization cut points and the per-outcome negative-state
/// partition. Both are domain assumptions; callers may substitute
/// data-derived boundaries.
pub fn default_oracle_config() -> OracleConfig {
    OracleConfig::default()
        .with_rule("lead_time_days", &[30.0, 60.0, 90.0], &["short", "medium", "long", "very_long"])
        .with_rule("on_time_delivery_pct", &[80.0, 90.0, 95.0], &["low", "medium", "high", "excellent"])
        .with_rule("supplier_reliability_score", &[0.5, 0.8], &["low", "medium", "high"])
        .with_rule("stockout_frequency", &[0.1, 0.2, 0.5], &["rare", "occasional", "frequent", "critical"])
        .with_rule("freight_cost_level", &[25_000.0, 50_000.0, 100_000.0], &["low", "medium", "high", "premium"])
        .with_rule("lpi_score", &[2.0, 3.0, 4.0], &["very_low", "low", "medium", "high", "very_high"])
        .with_rule("disruption_severity", &[1.0, 2.0, 4.0], &["none", "low", "medium", "high", "extreme"])
        .with_negative_states("supplier_reliability_score", &["low"])
        .with_negative_states("stockout_frequency", &["frequent", "critical"])
        .with_negative_states("lead_time_days", &["long", "very_long"])
        .with_negative_states("on_time_delivery_pct", &["low"])
        .with_negative_states("freight_cost_level", &["high", "premium"])
        .with_negative_states("outcome_metric", &["poor"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_graph_is_well_formed() {
        let g = build_graph().unwrap();
        assert_eq!(g.variable_count(), 18);
        assert_eq!(g.edge_count(), 31);
        // Actions are roots: conditioning on them equals intervening.
        for action in ACTION_VARIABLES {
            assert!(g.parents(action).is_empty(), "{action} must be a root");
            assert_eq!(g.domain(action).unwrap(), &["no", "yes"]);
        }

        // Relationship metadata only annotates real edges.
        let edges = g.edges();
        for (cause, effect) in [
            ("increase_safety_stock", "stockout_frequency"),
            ("disruption_severity", "freight_cost_level"),
        ] {
            assert!(g.relationship(cause, effect).is_some());
            assert!(edges.contains(&(cause.to_string(), effect.to_string())));
        }
    }

    #[test]
    fn negative_states_name_real_domain_states() {
        let g = build_graph().unwrap();
        let config = default_oracle_config();
        for (variable, states) in &config.negative_states {
            let domain = g.domain(variable).expect("partition names a variable");
            for state in states {
                assert!(domain.contains(state), "{variable} has no state {state}");
            }
        }
    }
}
