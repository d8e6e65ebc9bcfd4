//! Workspace error taxonomy. Construction-time errors are fatal to the
//! caller; fit-time and query-time failures are recovered locally by the
//! subsystems that raise them and degrade to neutral defaults.

mod agent_error;
mod causal_error;

pub use agent_error::AgentError;
pub use causal_error::CausalError;

/// Top-level error for the Causeway workspace.
#[derive(Debug, thiserror::Error)]
pub enum CausewayError {
    #[error(transparent)]
    Causal(#[from] CausalError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Workspace result alias.
pub type CausewayResult<T> = Result<T, CausewayError>;
