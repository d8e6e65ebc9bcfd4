//! Decision-step context passed from the environment to the causal oracle.
//!
//! The known variables are explicit optional fields so discretization
//! rules can be checked against real names at compile time; anything the
//! environment knows that the model does not is carried in `extra` and
//! bucketed generically.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A raw context value: either numeric (to be discretized) or an
/// already-categorical label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContextValue {
    Number(f64),
    Label(String),
}

impl From<f64> for ContextValue {
    fn from(v: f64) -> Self {
        ContextValue::Number(v)
    }
}

impl From<&str> for ContextValue {
    fn from(v: &str) -> Self {
        ContextValue::Label(v.to_string())
    }
}

/// One decision step's context. All fields are optional; missing fields
/// simply contribute no evidence to oracle queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    pub lead_time_days: Option<f64>,
    pub on_time_delivery_pct: Option<f64>,
    pub supplier_reliability_score: Option<f64>,
    pub stockout_frequency: Option<f64>,
    pub freight_cost_level: Option<f64>,
    pub lpi_score: Option<f64>,
    pub disruption_severity: Option<f64>,
    pub disruption_type: Option<String>,
    pub transport_mode: Option<String>,
    pub warehouse_type: Option<String>,
    pub customs_efficiency: Option<String>,
    pub infrastructure_quality: Option<String>,
    /// Escape hatch for fields the typed record does not know about.
    pub extra: HashMap<String, ContextValue>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no field is set at all.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// All populated (variable, value) pairs, typed fields first.
    pub fn entries(&self) -> Vec<(String, ContextValue)> {
        let mut out = Vec::new();
        let numeric = [
            ("lead_time_days", self.lead_time_days),
            ("on_time_delivery_pct", self.on_time_delivery_pct),
            ("supplier_reliability_score", self.supplier_reliability_score),
            ("stockout_frequency", self.stockout_frequency),
            ("freight_cost_level", self.freight_cost_level),
            ("lpi_score", self.lpi_score),
            ("disruption_severity", self.disruption_severity),
        ];
        for (name, value) in numeric {
            if let Some(v) = value {
                out.push((name.to_string(), ContextValue::Number(v)));
            }
        }
        let labels = [
            ("disruption_type", &self.disruption_type),
            ("transport_mode", &self.transport_mode),
            ("warehouse_type", &self.warehouse_type),
            ("customs_efficiency", &self.customs_efficiency),
            ("infrastructure_quality", &self.infrastructure_quality),
        ];
        for (name, value) in labels {
            if let Some(v) = value {
                out.push((name.to_string(), ContextValue::Label(v.clone())));
            }
        }
        for (name, value) in &self.extra {
            out.push((name.clone(), value.clone()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_skip_unset_fields() {
        let mut ctx = Context::new();
        assert!(ctx.is_empty());

        ctx.supplier_reliability_score = Some(0.9);
        ctx.transport_mode = Some("air".to_string());
        ctx.extra
            .insert("demand_index".to_string(), ContextValue::Number(0.4));

        let entries = ctx.entries();
        assert_eq!(entries.len(), 3);
        assert!(entries
            .iter()
            .any(|(k, v)| k == "supplier_reliability_score" && *v == ContextValue::Number(0.9)));
    }
}
