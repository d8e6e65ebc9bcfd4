//! Agent checkpointing: one JSON document holding both networks, the
//! optimizer state, metric histories, counters, and epsilon.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use causeway_core::constants::VERSION;
use causeway_core::errors::{AgentError, CausewayResult};
use causeway_core::metrics::TrainingMetrics;

use crate::agent::CausalRlAgent;
use crate::qnet::optimizer::Adam;
use crate::qnet::QNetwork;

/// Serialized training state. A checkpoint restores into an agent of
/// the same dimensions only.
#[derive(Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    pub version: String,
    pub q_network: QNetwork,
    pub target_network: QNetwork,
    pub optimizer: Adam,
    pub metrics: TrainingMetrics,
    pub episode_count: u64,
    pub step_count: u64,
    pub epsilon: f64,
}

impl Checkpoint {
    /// Snapshot an agent's full training state.
    pub fn capture(agent: &CausalRlAgent) -> Self {
        let (q, target, optimizer, metrics, episodes, steps, epsilon) = agent.checkpoint_parts();
        Self {
            version: VERSION.to_string(),
            q_network: q.clone(),
            target_network: target.clone(),
            optimizer: optimizer.clone(),
            metrics: metrics.clone(),
            episode_count: episodes,
            step_count: steps,
            epsilon,
        }
    }

    pub fn save(&self, path: &Path) -> CausewayResult<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        info!(path = %path.display(), "checkpoint saved");
        Ok(())
    }

    pub fn load(path: &Path) -> CausewayResult<Self> {
        let json = fs::read_to_string(path)?;
        let checkpoint: Checkpoint = serde_json::from_str(&json)?;
        info!(path = %path.display(), "checkpoint loaded");
        Ok(checkpoint)
    }

    /// Restore this checkpoint into `agent`, refusing on a dimension
    /// mismatch.
    pub fn restore(self, agent: &mut CausalRlAgent) -> CausewayResult<()> {
        let (state_size, action_size) = agent.dims();
        if self.q_network.state_size() != state_size
            || self.q_network.action_size() != action_size
        {
            return Err(AgentError::CheckpointIncompatible {
                reason: format!(
                    "checkpoint is {}x{}, agent is {state_size}x{action_size}",
                    self.q_network.state_size(),
                    self.q_network.action_size()
                ),
            }
            .into());
        }
        agent.restore_parts(
            self.q_network,
            self.target_network,
            self.optimizer,
            self.metrics,
            self.episode_count,
            self.step_count,
            self.epsilon,
        );
        Ok(())
    }
}
