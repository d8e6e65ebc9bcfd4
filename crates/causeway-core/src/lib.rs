//! # causeway-core
//!
//! Foundation crate for the Causeway decision engine.
//! Defines errors, config, constants, shared models, and the `Agent` trait.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod context;
pub mod dataset;
pub mod errors;
pub mod metrics;
pub mod telemetry;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{AgentConfig, OracleConfig};
pub use context::{Context, ContextValue};
pub use dataset::{Column, ObservationTable};
pub use errors::{CausewayError, CausewayResult};
pub use metrics::TrainingMetrics;
pub use traits::Agent;
