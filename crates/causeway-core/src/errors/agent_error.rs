/// Agent-side errors: replay buffer preconditions, network construction,
/// checkpoint integrity.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("insufficient replay data: requested batch of {requested}, buffer holds {available}")]
    InsufficientData { requested: usize, available: usize },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid network architecture: {reason}")]
    InvalidArchitecture { reason: String },

    #[error("checkpoint incompatible: {reason}")]
    CheckpointIncompatible { reason: String },
}
