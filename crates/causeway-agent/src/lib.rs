//! # causeway-agent
//!
//! Causal reinforcement learning: a DQN-style agent whose action
//! selection is masked by the causal oracle and whose reward is shaped
//! by the oracle's treatment-effect estimate.

pub mod agent;
pub mod checkpoint;
pub mod qnet;
pub mod replay;

pub use agent::CausalRlAgent;
pub use checkpoint::Checkpoint;
pub use qnet::QNetwork;
pub use replay::{Experience, ReplayBuffer};
