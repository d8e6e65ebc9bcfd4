//! The `Agent` trait shared by the causal RL agent and any rule-based
//! baseline, so comparison harnesses can drive both uniformly.

use crate::context::Context;
use crate::errors::CausewayResult;
use crate::metrics::TrainingMetrics;

/// A step-driven decision agent: one `act` then one `learn` per
/// environment step, `episode_ended` at episode boundaries.
pub trait Agent: Send {
    /// Select an action index for the given state and context.
    fn act(&mut self, state: &[f64], context: &Context) -> CausewayResult<usize>;

    /// Observe a transition and (possibly) perform a training update.
    #[allow(clippy::too_many_arguments)]
    fn learn(
        &mut self,
        state: &[f64],
        action: usize,
        reward: f64,
        next_state: &[f64],
        done: bool,
        context: &Context,
    ) -> CausewayResult<()>;

    /// Record the end of an episode and its total reward.
    fn episode_ended(&mut self, total_reward: f64);

    /// Metric histories for external logging/plotting.
    fn metrics(&self) -> &TrainingMetrics;
}
