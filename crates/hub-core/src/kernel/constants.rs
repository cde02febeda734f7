/// Application name
pub const APP_NAME: &str = "hub";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix prepended to an API name to find the method a component exposes
pub const DEFAULT_API_PREFIX: &str = "api";

/// Interval between dependency checks when the poll strategy is configured
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

/// Event emitted once per successful component registration
pub const EVENT_REGISTERED: &str = "component.registered";

/// Event emitted once per completed `register` call
pub const EVENT_FINISH: &str = "batch.finish";
