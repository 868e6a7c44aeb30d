// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod server;

pub use server::{ServerConfig, UpstreamConfig};

use crate::constants::DEFAULT_LOG_LEVEL;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub dragonfly: DragonflyConfig,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Signing secret and source prefix shared with Dragonfly issuers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DragonflyConfig {
    #[serde(alias = "dragonflySecret")]
    pub secret: String,
    /// Prepended to every fetch path, e.g. `s3://bucket/` (default: empty)
    #[serde(default, alias = "urlPrefix")]
    pub url_prefix: String,
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line, for log aggregation
    #[default]
    Json,
    /// Human readable, for local runs
    Pretty,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset (default: info)
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        let mut substituted = String::with_capacity(yaml.len());
        let mut last = 0;
        for caps in re.captures_iter(yaml) {
            let whole = &caps[0];
            let var_name = &caps[1];
            let value = std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;

            let start = caps.get(0).map_or(last, |m| m.start());
            substituted.push_str(&yaml[last..start]);
            substituted.push_str(&value);
            last = start + whole.len();
        }
        substituted.push_str(&yaml[last..]);

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.dragonfly.secret.is_empty() {
            return Err("dragonfly.secret is required".to_string());
        }

        if self.server.port == 0 {
            return Err("server.port must be greater than 0".to_string());
        }

        if self.upstream.host.trim().is_empty() {
            return Err("upstream.host cannot be empty".to_string());
        }

        if self.upstream.port == 0 {
            return Err("upstream.port must be greater than 0".to_string());
        }

        if self.upstream.timeout_secs == 0 {
            return Err("upstream.timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
