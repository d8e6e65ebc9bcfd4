//! Rolling training metrics, persisted as part of the agent checkpoint.

use serde::{Deserialize, Serialize};

/// Metric histories recorded by the agent during training.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Per-gradient-step MSE losses.
    pub losses: Vec<f64>,
    /// Per-episode total rewards.
    pub rewards: Vec<f64>,
    /// Per-step causal effect estimates used for shaping.
    pub causal_effects: Vec<f64>,
    /// Epsilon after each learn call.
    pub epsilon_trace: Vec<f64>,
}

impl TrainingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mean of the last `n` entries of a series, or 0.0 when empty.
    pub fn tail_mean(series: &[f64], n: usize) -> f64 {
        if series.is_empty() {
            return 0.0;
        }
        let start = series.len().saturating_sub(n);
        let tail = &series[start..];
        tail.iter().sum::<f64>() / tail.len() as f64
    }
}
