//! Application-wide constants
//!
//! Defaults and fixed messages shared by the config layer, the dispatcher
//! and the HTTP handlers.

/// Server defaults
pub mod server {
    /// Default listen address
    pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

    /// Env var pointing at an alternative config file
    pub const CONFIG_PATH_ENV: &str = "STOCK_ANALYST_CONFIG";

    /// Config file read when no override is given
    pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
}

/// LLM defaults
pub mod llm {
    /// Model used when none is configured
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

    /// Upper bound for `llm.request_timeout_secs` (24h)
    pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 86_400;
}

/// Fixed response messages
pub mod messages {
    /// Detail returned when the assistant produced no usable text
    pub const EMPTY_ANALYSIS: &str = "Failed to generate analysis";

    /// Liveness status
    pub const HEALTHY: &str = "healthy";
}
