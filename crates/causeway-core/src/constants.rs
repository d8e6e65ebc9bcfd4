/// Causeway system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The always-legal do-nothing action.
pub const NO_ACTION: &str = "no_action";

/// Binary action states, in index order.
pub const ACTION_STATES: [&str; 2] = ["no", "yes"];

/// Number of equal-width bins used when discretizing numeric columns at fit time.
pub const FIT_BIN_COUNT: usize = 4;

/// Labels for the generic numeric discretization buckets, in ascending order.
pub const GENERIC_BUCKETS: [&str; 4] = ["low", "medium", "high", "very_high"];

/// How often (in episodes) the agent logs a training summary.
pub const EPISODE_LOG_INTERVAL: usize = 100;
