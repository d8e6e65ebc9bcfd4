//! Per-action feasibility predicates over the discretized context.
//! Domain policy, enumerated once; not learned and not inferred.

use std::collections::HashMap;

/// Is `action` feasible given categorical context evidence?
///
/// Each rule gates an action on the variable it is meant to fix:
/// switching suppliers only pays off when reliability is not already
/// high, emergency procurement needs a live stockout signal, rerouting
/// needs a long lead time, and resource allocation needs visible
/// delivery slippage. Actions without a rule default to feasible.
pub fn is_feasible(action: &str, evidence: &HashMap<String, String>) -> bool {
    let get = |key: &str, default: &str| -> String {
        evidence.get(key).cloned().unwrap_or_else(|| default.to_string())
    };

    match action {
        "switch_supplier" => get("supplier_reliability_score", "high") != "high",
        "increase_safety_stock" => get("stockout_frequency", "occasional") != "rare",
        "emergency_procurement" => {
            matches!(
                get("stockout_frequency", "rare").as_str(),
                "occasional" | "frequent" | "critical"
            )
        }
        "reroute_shipments" => {
            matches!(get("lead_time_days", "medium").as_str(), "long" | "very_long")
        }
        "allocate_resources" => {
            matches!(get("on_time_delivery_pct", "high").as_str(), "low" | "medium")
        }
        _ => true,
    }
}
