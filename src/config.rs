use std::env;
use std::time::Duration;

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Cosmos REST gateway
    pub gateway_url: String,

    /// Gateway project identifier, appended to the gateway path (opaque pass-through)
    pub project_id: Option<String>,

    /// Chain identifier the gateway serves (opaque pass-through)
    pub chain_id: String,

    /// Number of most-recent block heights retained in the window
    pub window_size: usize,

    /// Number of chains shown in the ranked output
    pub top_k: usize,

    /// Polling tick interval in milliseconds
    pub tick_interval_ms: u64,

    /// Per-request timeout for gateway calls in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `RELAYFLOW_GATEWAY_URL` (required)
    /// - `RELAYFLOW_PROJECT_ID` (optional)
    /// - `RELAYFLOW_CHAIN_ID` (default: LAV1)
    /// - `RELAYFLOW_WINDOW_SIZE` (default: 20)
    /// - `RELAYFLOW_TOP_K` (default: 10)
    /// - `RELAYFLOW_TICK_INTERVAL_MS` (default: 5000)
    /// - `RELAYFLOW_REQUEST_TIMEOUT_MS` (default: 10000)
    pub fn from_env() -> Self {
        let gateway_url = env::var("RELAYFLOW_GATEWAY_URL")
            .expect("RELAYFLOW_GATEWAY_URL must be set in .env file");

        Self {
            gateway_url,

            project_id: env::var("RELAYFLOW_PROJECT_ID").ok(),

            chain_id: env::var("RELAYFLOW_CHAIN_ID").unwrap_or_else(|_| "LAV1".to_string()),

            window_size: env::var("RELAYFLOW_WINDOW_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),

            top_k: env::var("RELAYFLOW_TOP_K")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),

            tick_interval_ms: env::var("RELAYFLOW_TICK_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5_000),

            request_timeout_ms: env::var("RELAYFLOW_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10_000),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
