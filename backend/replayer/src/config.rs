//! Application configuration loaded from environment variables.

use crate::errors::{ReplayerError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the JSON block file to replay
    pub replay_file: String,
    /// Stop at the first rejected transaction instead of skipping it
    pub strict: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            replay_file: env_var("REPLAY_FILE").map_err(|_| {
                ReplayerError::Config("REPLAY_FILE environment variable is required".to_string())
            })?,
            strict: env_var("STRICT")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .map_err(|_| ReplayerError::Config("Invalid STRICT".to_string()))?,
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ReplayerError::Config(format!("Missing env var: {key}")))
}
