//! Configuration loader for chatgate.
//!
//! Layers, lowest to highest priority:
//! 1. Built-in defaults ([`GatewayConfig::default()`])
//! 2. TOML file (`--config`, or `chatgate.toml` in the working directory)
//! 3. Environment (`REDIS_HOST`, `REDIS_PORT`, `CHATGATE_STORE`)
//!
//! CLI flags are applied on top by the binary.

use std::path::Path;

use chatgate_types::config::{GatewayConfig, StoreBackend};
use chatgate_types::error::ConfigError;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "chatgate.toml";

/// Load the configuration file.
///
/// - An explicit `path` must exist and parse.
/// - Without a path, `chatgate.toml` is read if present; otherwise defaults.
/// - A file that exists but fails to parse is always an error.
pub async fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let (config_path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (Path::new(DEFAULT_CONFIG_FILE).to_path_buf(), false),
    };

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(GatewayConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: config_path.display().to_string(),
                reason: err.to_string(),
            });
        }
    };

    let config = toml::from_str::<GatewayConfig>(&content).map_err(|err| ConfigError::Parse {
        path: config_path.display().to_string(),
        reason: err.to_string(),
    })?;
    tracing::debug!("Loaded config from {}", config_path.display());
    Ok(config)
}

/// Apply environment overrides read through `lookup`.
///
/// `lookup` is `std::env::var` in production; tests pass a closure.
pub fn apply_env_overrides<F>(mut config: GatewayConfig, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("REDIS_HOST").filter(|h| !h.trim().is_empty()) {
        config.redis.host = host;
    }
    if let Some(port) = lookup("REDIS_PORT") {
        config.redis.port = port
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("REDIS_PORT is not a port: '{port}'")))?;
    }
    if let Some(backend) = lookup("CHATGATE_STORE") {
        config.store.backend = match backend.to_lowercase().as_str() {
            "redis" => StoreBackend::Redis,
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::Invalid(format!(
                    "CHATGATE_STORE must be 'redis' or 'memory', got '{other}'"
                )));
            }
        };
    }
    Ok(config)
}

/// Load the file, apply the process environment, and validate.
pub async fn resolve_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let config = load_config(path).await?;
    let config = apply_env_overrides(config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn load_config_explicit_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(Some(&tmp.path().join("absent.toml"))).await;
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("chatgate.toml");
        tokio::fs::write(
            &config_path,
            r#"
[redis]
host = "cache"
session_ttl_secs = 600

[worker]
program = "/usr/local/bin/answer"
args = []
"#,
        )
        .await
        .unwrap();

        let config = load_config(Some(&config_path)).await.unwrap();
        assert_eq!(config.redis.host, "cache");
        assert_eq!(config.redis.session_ttl_secs, 600);
        assert_eq!(config.redis.port, 6379);
        assert_eq!(config.worker.program, "/usr/local/bin/answer");
        assert!(config.worker.args.is_empty());
    }

    #[tokio::test]
    async fn load_config_malformed_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("chatgate.toml");
        tokio::fs::write(&config_path, "[redis\nhost = ").await.unwrap();

        let result = load_config(Some(&config_path)).await;
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn env_overrides_redis_host_and_store() {
        let config = apply_env_overrides(
            GatewayConfig::default(),
            env(&[("REDIS_HOST", "redis"), ("CHATGATE_STORE", "memory")]),
        )
        .unwrap();
        assert_eq!(config.redis.url(), "redis://redis:6379");
        assert_eq!(config.store.backend, StoreBackend::Memory);
    }

    #[test]
    fn env_without_overrides_keeps_defaults() {
        let config = apply_env_overrides(GatewayConfig::default(), env(&[])).unwrap();
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn env_blank_redis_host_is_ignored() {
        let config =
            apply_env_overrides(GatewayConfig::default(), env(&[("REDIS_HOST", "  ")])).unwrap();
        assert_eq!(config.redis.host, "127.0.0.1");
    }

    #[test]
    fn env_invalid_values_are_rejected() {
        assert!(
            apply_env_overrides(GatewayConfig::default(), env(&[("REDIS_PORT", "sixty")])).is_err()
        );
        assert!(
            apply_env_overrides(GatewayConfig::default(), env(&[("CHATGATE_STORE", "etcd")]))
                .is_err()
        );
    }
}
