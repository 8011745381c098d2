//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dispatcher.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the dispatcher.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Selection strategy name ("round_robin" or "random").
    pub strategy: String,

    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Backend servers, in round-robin order.
    pub backends: Vec<BackendConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            strategy: "round_robin".to_string(),
            listener: ListenerConfig::default(),
            backends: vec![
                BackendConfig::new("http://localhost:8081"),
                BackendConfig::new("http://localhost:8082"),
                BackendConfig::new("http://localhost:8083"),
            ],
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Backend server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base address (e.g., "http://127.0.0.1:8081").
    pub url: String,

    /// Initial liveness. Dead backends stay in rotation and get rejected.
    #[serde(default = "default_alive")]
    pub alive: bool,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alive: true,
        }
    }
}

fn default_alive() -> bool {
    true
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DispatcherConfig::default();
        assert_eq!(config.strategy, "round_robin");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
        assert_eq!(config.backends.len(), 3);
        assert!(config.backends.iter().all(|b| b.alive));
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_minimal_toml_fills_defaults() {
        let config: DispatcherConfig = toml::from_str(
            r#"
            strategy = "random"

            [[backends]]
            url = "http://10.0.0.1:80"

            [[backends]]
            url = "http://10.0.0.2:80"
            alive = false
            "#,
        )
        .unwrap();

        assert_eq!(config.strategy, "random");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
        assert_eq!(config.backends.len(), 2);
        assert!(config.backends[0].alive);
        assert!(!config.backends[1].alive);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_backend_requires_url() {
        let parsed: Result<DispatcherConfig, _> = toml::from_str(
            r#"
            [[backends]]
            alive = true
            "#,
        );
        assert!(parsed.is_err());
    }
}
