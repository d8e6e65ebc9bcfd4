/// Causal graph and Bayesian network errors.
#[derive(Debug, thiserror::Error)]
pub enum CausalError {
    #[error("cycle detected in causal graph: adding edge {cause} -> {effect}")]
    CycleDetected { cause: String, effect: String },

    #[error("unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("duplicate variable: {name}")]
    DuplicateVariable { name: String },

    #[error("invalid CPD for {variable}: {reason}")]
    InvalidCpd { variable: String, reason: String },

    #[error("model validation failed: {details}")]
    ModelInvalid { details: String },

    #[error("inference failed for query over {variable}: {reason}")]
    InferenceFailed { variable: String, reason: String },

    #[error("invalid outcome partition for {variable}: unknown state {state}")]
    InvalidOutcomePartition { variable: String, state: String },

    #[error("invalid discretization rule for {variable}: {reason}")]
    InvalidDiscretizationRule { variable: String, reason: String },
}
