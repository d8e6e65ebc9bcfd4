//! The causal RL agent: masked epsilon-greedy action selection, causal
//! reward shaping, periodic batched updates against a delayed target
//! network.

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use causeway_causal::CausalOracle;
use causeway_core::config::AgentConfig;
use causeway_core::constants::{EPISODE_LOG_INTERVAL, NO_ACTION};
use causeway_core::context::Context;
use causeway_core::errors::{AgentError, CausewayResult};
use causeway_core::metrics::TrainingMetrics;
use causeway_core::traits::Agent;

use crate::checkpoint::Checkpoint;
use crate::qnet::optimizer::{clip_grad_norm, Adam};
use crate::qnet::QNetwork;
use crate::replay::{Experience, ReplayBuffer};

/// DQN-style agent with causal action masking and reward shaping.
/// Training is open-ended and driven entirely by the external episode
/// loop; epsilon decays from exploration toward its floor.
pub struct CausalRlAgent {
    config: AgentConfig,
    state_size: usize,
    action_size: usize,
    oracle: Option<Arc<CausalOracle>>,
    q_network: QNetwork,
    target_network: QNetwork,
    optimizer: Adam,
    replay: ReplayBuffer,
    epsilon: f64,
    step_count: u64,
    episode_count: u64,
    metrics: TrainingMetrics,
    rng: StdRng,
}

impl CausalRlAgent {
    /// Build an agent with a fixed seed for reproducibility.
    ///
    /// With an oracle attached, the action space is the oracle's action
    /// variables plus the trailing no-op, and `action_size` must match.
    pub fn with_seed(
        state_size: usize,
        action_size: usize,
        oracle: Option<Arc<CausalOracle>>,
        config: AgentConfig,
        seed: u64,
    ) -> CausewayResult<Self> {
        if let Some(oracle) = &oracle {
            let expected = oracle.action_variables().len() + 1;
            if action_size != expected {
                return Err(AgentError::InvalidArchitecture {
                    reason: format!(
                        "oracle defines {expected} actions (including no-op), agent built with {action_size}"
                    ),
                }
                .into());
            }
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let q_network = QNetwork::new(state_size, action_size, &config.hidden_sizes, &mut rng)?;
        let target_network = q_network.clone();
        let optimizer = Adam::new(config.learning_rate, q_network.layers());
        let replay = ReplayBuffer::new(config.buffer_capacity);
        let epsilon = config.epsilon_start;

        info!(
            causal_lambda = config.causal_lambda,
            action_masking = config.use_action_masking,
            reward_shaping = config.use_reward_shaping,
            "initialized causal RL agent"
        );

        Ok(Self {
            config,
            state_size,
            action_size,
            oracle,
            q_network,
            target_network,
            optimizer,
            replay,
            epsilon,
            step_count: 0,
            episode_count: 0,
            metrics: TrainingMetrics::new(),
            rng,
        })
    }

    pub fn new(
        state_size: usize,
        action_size: usize,
        oracle: Option<Arc<CausalOracle>>,
        config: AgentConfig,
    ) -> CausewayResult<Self> {
        let seed = rand::thread_rng().gen();
        Self::with_seed(state_size, action_size, oracle, config, seed)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn episode_count(&self) -> u64 {
        self.episode_count
    }

    pub fn replay_len(&self) -> usize {
        self.replay.len()
    }

    /// The name of an action index. The last index is the no-op;
    /// without an oracle the remaining indices carry no domain names
    /// and are reported positionally.
    pub fn action_name(&self, action: usize) -> Cow<'_, str> {
        if action + 1 == self.action_size {
            return Cow::Borrowed(NO_ACTION);
        }
        match &self.oracle {
            Some(oracle) => Cow::Borrowed(
                oracle
                    .action_variables()
                    .get(action)
                    .copied()
                    .unwrap_or(NO_ACTION),
            ),
            None => Cow::Owned(format!("action_{action}")),
        }
    }

    /// Feasibility mask over the action space: one bit per action, the
    /// no-op always enabled. All-ones when masking is disabled or no
    /// oracle is attached. If every bit somehow comes out zero, the
    /// no-op is force-enabled so a decision can always be produced.
    fn action_mask(&self, context: &Context) -> Vec<bool> {
        let Some(oracle) = &self.oracle else {
            return vec![true; self.action_size];
        };
        if !self.config.use_action_masking {
            return vec![true; self.action_size];
        }

        let mut mask: Vec<bool> = (0..self.action_size)
            .map(|i| {
                let name = self.action_name(i);
                name == NO_ACTION || oracle.is_feasible(&name, context)
            })
            .collect();
        if !mask.iter().any(|&m| m) {
            if let Some(last) = mask.last_mut() {
                *last = true;
            }
        }
        mask
    }

    /// Epsilon-greedy selection over the masked action set. The
    /// returned action is always within the legal set when masking is
    /// enabled and any action exists.
    fn select_action(&mut self, state: &[f64], context: &Context) -> CausewayResult<usize> {
        let mask = self.action_mask(context);

        if self.rng.gen::<f64>() > self.epsilon {
            let q_values = self.q_network.forward(state)?;
            let masked: Vec<f64> = q_values
                .iter()
                .zip(&mask)
                .map(|(&q, &legal)| if legal { q } else { f64::NEG_INFINITY })
                .collect();
            let action = masked
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(i, _)| i)
                .unwrap_or(self.action_size - 1);
            return Ok(action);
        }

        let legal: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter(|(_, &m)| m)
            .map(|(i, _)| i)
            .collect();
        match legal.choose(&mut self.rng) {
            Some(&action) => Ok(action),
            // Unreachable after force-enabling the no-op; kept as a
            // uniform fallback over the full action space.
            None => Ok(self.rng.gen_range(0..self.action_size)),
        }
    }

    /// One gradient step on a sampled minibatch: MSE between Q(s)[a]
    /// and the target-network bootstrap, gradients clipped before Adam.
    fn train_step(&mut self) -> CausewayResult<()> {
        let batch = self
            .replay
            .sample(self.config.batch_size, &mut self.rng)?;
        let batch_len = batch.len() as f64;

        let mut grads = self.q_network.zero_grads();
        let mut loss = 0.0;

        for experience in &batch {
            let next_q = self.target_network.forward(&experience.next_state)?;
            let max_next = next_q.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let target = if experience.done {
                experience.reward
            } else {
                experience.reward + self.config.gamma * max_next
            };

            let trace = self.q_network.forward_trace(&experience.state)?;
            let current = trace.output()[experience.action];
            let error = current - target;
            loss += error * error;

            let mut output_grad = vec![0.0; self.action_size];
            output_grad[experience.action] = 2.0 * error / batch_len;
            let sample_grads = self.q_network.backward(&trace, &output_grad);
            QNetwork::accumulate(&mut grads, &sample_grads);
        }

        clip_grad_norm(&mut grads, self.config.grad_clip_norm);
        self.optimizer.step(self.q_network.layers_mut(), &grads);

        self.metrics.losses.push(loss / batch_len);
        Ok(())
    }

    fn sync_target_network(&mut self) {
        self.target_network = self.q_network.clone();
        debug!(step = self.step_count, "target network synchronized");
    }

    /// Explain a chosen action via the oracle's effect estimate and
    /// relationship metadata.
    pub fn action_explanation(&self, action: usize, context: &Context) -> String {
        let name = self.action_name(action);
        match &self.oracle {
            Some(oracle) if name != NO_ACTION && !context.is_empty() => {
                let effect = oracle.effect(&name, context);
                let outcome = oracle.primary_outcome(&name);
                let explanation = oracle.causal_explanation(&name, outcome);
                format!("Action: {name} | Causal Effect: {effect:.3} | {explanation}")
            }
            _ => format!("Action: {name}"),
        }
    }

    /// Persist the full training state as one atomic unit.
    pub fn save_checkpoint(&self, path: &Path) -> CausewayResult<()> {
        Checkpoint::capture(self).save(path)
    }

    /// Restore a checkpoint saved by `save_checkpoint`. Subsequent
    /// behavior matches the saved agent given the same seed and
    /// environment trajectory.
    pub fn load_checkpoint(&mut self, path: &Path) -> CausewayResult<()> {
        let checkpoint = Checkpoint::load(path)?;
        checkpoint.restore(self)
    }

    pub(crate) fn checkpoint_parts(
        &self,
    ) -> (
        &QNetwork,
        &QNetwork,
        &Adam,
        &TrainingMetrics,
        u64,
        u64,
        f64,
    ) {
        (
            &self.q_network,
            &self.target_network,
            &self.optimizer,
            &self.metrics,
            self.episode_count,
            self.step_count,
            self.epsilon,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore_parts(
        &mut self,
        q_network: QNetwork,
        target_network: QNetwork,
        optimizer: Adam,
        metrics: TrainingMetrics,
        episode_count: u64,
        step_count: u64,
        epsilon: f64,
    ) {
        self.q_network = q_network;
        self.target_network = target_network;
        self.optimizer = optimizer;
        self.metrics = metrics;
        self.episode_count = episode_count;
        self.step_count = step_count;
        self.epsilon = epsilon;
    }

    pub(crate) fn dims(&self) -> (usize, usize) {
        (self.state_size, self.action_size)
    }
}

impl Agent for CausalRlAgent {
    fn act(&mut self, state: &[f64], context: &Context) -> CausewayResult<usize> {
        self.select_action(state, context)
    }

    fn learn(
        &mut self,
        state: &[f64],
        action: usize,
        reward: f64,
        next_state: &[f64],
        done: bool,
        context: &Context,
    ) -> CausewayResult<()> {
        // Causal reward shaping: add the oracle's uplift estimate for
        // the chosen (non-no-op) action.
        let causal_effect = match &self.oracle {
            Some(oracle)
                if self.config.use_reward_shaping
                    && !context.is_empty()
                    && self.action_name(action) != NO_ACTION =>
            {
                oracle.effect(&self.action_name(action), context)
            }
            _ => 0.0,
        };
        let shaped_reward = reward + self.config.causal_lambda * causal_effect;

        self.replay.push(Experience {
            state: state.to_vec(),
            action,
            reward: shaped_reward,
            next_state: next_state.to_vec(),
            done,
            causal_effect,
        });
        self.step_count += 1;

        if self.replay.len() >= self.config.batch_size
            && self.step_count % self.config.train_interval == 0
        {
            self.train_step()?;
        }
        if self.step_count % self.config.target_sync_interval == 0 {
            self.sync_target_network();
        }

        // Epsilon decays after every learn call, training or not.
        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.epsilon_end);

        self.metrics.causal_effects.push(causal_effect);
        self.metrics.epsilon_trace.push(self.epsilon);
        Ok(())
    }

    fn episode_ended(&mut self, total_reward: f64) {
        self.episode_count += 1;
        self.metrics.rewards.push(total_reward);

        if self.episode_count % EPISODE_LOG_INTERVAL as u64 == 0 {
            let avg_reward =
                TrainingMetrics::tail_mean(&self.metrics.rewards, EPISODE_LOG_INTERVAL);
            let avg_loss = TrainingMetrics::tail_mean(&self.metrics.losses, EPISODE_LOG_INTERVAL);
            info!(
                episode = self.episode_count,
                avg_reward, avg_loss, epsilon = self.epsilon,
                "training progress"
            );
        }
    }

    fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }
}
