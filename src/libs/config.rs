use {
    crate::constants::RPC_TIMEOUT_SECS,
    dotenv::dotenv,
    serde::{Deserialize, Serialize},
    std::{fmt::Debug, str::FromStr, time::Duration},
};

pub fn load_env() {
    dotenv().ok();
}

/// Connection settings read from the environment (and `.env`, when present).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON-RPC HTTP endpoint. `None` selects the in-process tester chain.
    pub rpc_url: Option<String>,
    pub rpc_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            rpc_url: std::env::var("RPC_URL")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            rpc_timeout_secs: *RPC_TIMEOUT_SECS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    /// Parse env var to T; fall back to typed default.
    pub fn get_var_t<T>(key: &str, default: T) -> T
    where
        T: FromStr,
        <T as FromStr>::Err: Debug,
    {
        std::env::var(key)
            .ok()
            .and_then(|s| s.parse::<T>().ok())
            .unwrap_or(default)
    }
}
