//! Named default values for configuration structs.

pub const DEFAULT_LEARNING_RATE: f64 = 1e-4;
pub const DEFAULT_GAMMA: f64 = 0.99;
pub const DEFAULT_EPSILON_START: f64 = 1.0;
pub const DEFAULT_EPSILON_END: f64 = 0.01;
pub const DEFAULT_EPSILON_DECAY: f64 = 0.995;
pub const DEFAULT_CAUSAL_LAMBDA: f64 = 0.3;
pub const DEFAULT_BUFFER_CAPACITY: usize = 10_000;
pub const DEFAULT_BATCH_SIZE: usize = 32;
pub const DEFAULT_TRAIN_INTERVAL: u64 = 4;
pub const DEFAULT_TARGET_SYNC_INTERVAL: u64 = 100;
pub const DEFAULT_GRAD_CLIP_NORM: f64 = 10.0;
pub const DEFAULT_HIDDEN_SIZES: [usize; 3] = [256, 128, 64];

/// Generic quartile-style cut points used when a context field has no
/// variable-specific discretization rule.
pub const GENERIC_CUT_POINTS: [f64; 3] = [0.25, 0.5, 0.75];
