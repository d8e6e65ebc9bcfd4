//! Configuration structs for the agent and the causal oracle.

mod agent_config;
mod oracle_config;

pub mod defaults;

pub use agent_config::AgentConfig;
pub use oracle_config::{DiscretizationRule, OracleConfig};
