use serde::{Deserialize, Serialize};

use super::defaults;

/// Causal RL agent hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Adam learning rate.
    pub learning_rate: f64,
    /// Discount factor for bootstrap targets.
    pub gamma: f64,
    /// Initial exploration rate.
    pub epsilon_start: f64,
    /// Exploration floor; epsilon never decays below this.
    pub epsilon_end: f64,
    /// Multiplicative epsilon decay applied after every learn call.
    pub epsilon_decay: f64,
    /// Weight of the causal-effect term in the shaped reward.
    pub causal_lambda: f64,
    /// Mask infeasible actions out of selection.
    pub use_action_masking: bool,
    /// Add the oracle's effect estimate to the environment reward.
    pub use_reward_shaping: bool,
    /// Replay buffer capacity.
    pub buffer_capacity: usize,
    /// Minibatch size for gradient steps.
    pub batch_size: usize,
    /// Perform a gradient step every this many learn calls.
    pub train_interval: u64,
    /// Copy online parameters into the target network every this many steps.
    pub target_sync_interval: u64,
    /// Global gradient-norm ceiling applied before each optimizer step.
    pub grad_clip_norm: f64,
    /// Hidden layer widths of the Q-network.
    pub hidden_sizes: Vec<usize>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: defaults::DEFAULT_LEARNING_RATE,
            gamma: defaults::DEFAULT_GAMMA,
            epsilon_start: defaults::DEFAULT_EPSILON_START,
            epsilon_end: defaults::DEFAULT_EPSILON_END,
            epsilon_decay: defaults::DEFAULT_EPSILON_DECAY,
            causal_lambda: defaults::DEFAULT_CAUSAL_LAMBDA,
            use_action_masking: true,
            use_reward_shaping: true,
            buffer_capacity: defaults::DEFAULT_BUFFER_CAPACITY,
            batch_size: defaults::DEFAULT_BATCH_SIZE,
            train_interval: defaults::DEFAULT_TRAIN_INTERVAL,
            target_sync_interval: defaults::DEFAULT_TARGET_SYNC_INTERVAL,
            grad_clip_norm: defaults::DEFAULT_GRAD_CLIP_NORM,
            hidden_sizes: defaults::DEFAULT_HIDDEN_SIZES.to_vec(),
        }
    }
}
