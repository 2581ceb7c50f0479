//! Gateway configuration types.
//!
//! `GatewayConfig` mirrors the optional `chatgate.toml` file. Every field has
//! a default, so an empty file (or no file at all) yields a working config
//! that talks to Redis on the loopback interface.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Fixed Redis port used when none is configured.
pub const DEFAULT_REDIS_PORT: u16 = 6379;

/// Sliding expiration applied to a session on every append (24 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60 * 24;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub gateway: GatewayBehavior,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

/// Which history backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Redis,
    /// Process-local store, for development and tests.
    Memory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
}

/// Redis connection and session expiry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_host")]
    pub host: String,
    #[serde(default = "default_redis_port")]
    pub port: u16,
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

fn default_redis_host() -> String {
    "127.0.0.1".to_string()
}

fn default_redis_port() -> u16 {
    DEFAULT_REDIS_PORT
}

fn default_session_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: default_redis_host(),
            port: default_redis_port(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

impl RedisConfig {
    /// Connection URL in the form `redis://{host}:{port}`.
    pub fn url(&self) -> String {
        format!("redis://{}:{}", self.host, self.port)
    }
}

/// How to launch the external text-generation worker.
///
/// The worker is run as `program args... <query>`: the query is always the
/// final argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerConfig {
    #[serde(default = "default_worker_program")]
    pub program: String,
    #[serde(default = "default_worker_args")]
    pub args: Vec<String>,
    #[serde(default = "default_worker_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

fn default_worker_program() -> String {
    "/opt/venv/bin/python".to_string()
}

fn default_worker_args() -> Vec<String> {
    vec!["/app/rag-news-ingestion/scripts/rag_chat_api.py".to_string()]
}

fn default_worker_timeout_secs() -> u64 {
    120
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            program: default_worker_program(),
            args: default_worker_args(),
            timeout_secs: default_worker_timeout_secs(),
            working_dir: None,
        }
    }
}

/// Request-handling behavior of the chat gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayBehavior {
    /// Serialize concurrent chat turns that target the same session id.
    #[serde(default)]
    pub serialize_sessions: bool,
}

impl GatewayConfig {
    /// Reject values that would make the gateway unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.redis.host.trim().is_empty() {
            return Err(ConfigError::Invalid("redis.host must not be empty".into()));
        }
        if self.redis.session_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "redis.session_ttl_secs must be greater than zero".into(),
            ));
        }
        if self.worker.program.trim().is_empty() {
            return Err(ConfigError::Invalid("worker.program must not be empty".into()));
        }
        if self.worker.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "worker.timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_config_default_values() {
        let config = GatewayConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.store.backend, StoreBackend::Redis);
        assert_eq!(config.redis.url(), "redis://127.0.0.1:6379");
        assert_eq!(config.redis.session_ttl_secs, 86_400);
        assert_eq!(config.worker.timeout_secs, 120);
        assert!(!config.gateway.serialize_sessions);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_gateway_config_deserialize_empty_uses_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn test_gateway_config_deserialize_with_values() {
        let toml_str = r#"
[server]
port = 8080

[store]
backend = "memory"

[redis]
host = "redis.internal"

[worker]
program = "/usr/bin/python3"
args = ["scripts/answer.py"]
timeout_secs = 15

[gateway]
serialize_sessions = true
"#;
        let config: GatewayConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.redis.url(), "redis://redis.internal:6379");
        assert_eq!(config.worker.program, "/usr/bin/python3");
        assert_eq!(config.worker.args, vec!["scripts/answer.py".to_string()]);
        assert_eq!(config.worker.timeout_secs, 15);
        assert!(config.gateway.serialize_sessions);
    }

    #[test]
    fn test_validate_rejects_zero_ttl_and_timeout() {
        let mut config = GatewayConfig::default();
        config.redis.session_ttl_secs = 0;
        assert!(config.validate().is_err());

        let mut config = GatewayConfig::default();
        config.worker.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
