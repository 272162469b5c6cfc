//! Configuration types for the HTTP service

use crate::errors::ConfigError;
use ci_webhook_core::webhook::WebhookSecret;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Prefix for environment overrides, e.g. `CI_WEBHOOK__SERVER__PORT=9090`
pub const ENV_PREFIX: &str = "CI_WEBHOOK";

/// System-wide configuration file (extension resolved by the `config` crate)
pub const SYSTEM_CONFIG_PATH: &str = "/etc/ci-webhook/service";

/// Deployment-local configuration file, relative to the working directory
pub const LOCAL_CONFIG_PATH: &str = "config/service";

/// Log levels accepted by [`LoggingConfig::level`]
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Routes served regardless of configuration
const RESERVED_PATHS: [&str; 2] = ["/health", "/metrics"];

/// Service configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Webhook processing settings
    pub webhooks: WebhookConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,

    /// Maximum request size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            shutdown_timeout_seconds: 30,
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Webhook processing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Webhook endpoint path
    pub endpoint_path: String,

    /// Shared secret for `X-Hub-Signature-256` verification.
    ///
    /// `None` disables verification.
    pub secret: Option<WebhookSecret>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            endpoint_path: "/github-webhook".to_string(),
            secret: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from files and the environment.
    ///
    /// Sources are applied in order, later ones overriding earlier ones:
    ///
    /// 1. [`SYSTEM_CONFIG_PATH`] (optional)
    /// 2. [`LOCAL_CONFIG_PATH`] (optional)
    /// 3. `explicit_path`, when given (required)
    /// 4. Environment variables prefixed with [`ENV_PREFIX`] using `__` as the
    ///    separator
    ///
    /// Missing optional files fall back to built-in defaults. A malformed file
    /// or a value of the wrong type is an error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(SYSTEM_CONFIG_PATH).required(false))
            .add_source(config::File::with_name(LOCAL_CONFIG_PATH).required(false));

        if let Some(path) = explicit_path {
            info!(path = %path.display(), "Loading configuration from explicit path");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check semantic constraints serde cannot express.
    ///
    /// An empty secret never reaches this point: [`WebhookSecret`] refuses it
    /// during deserialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                message: "server.port must be non-zero".to_string(),
            });
        }

        if self.server.max_body_size == 0 {
            return Err(ConfigError::Invalid {
                message: "server.max_body_size must be non-zero".to_string(),
            });
        }

        let path = &self.webhooks.endpoint_path;
        if !path.starts_with('/') || path == "/" {
            return Err(ConfigError::Invalid {
                message: format!(
                    "webhooks.endpoint_path must start with '/' and not be the root path, \
                     got '{path}'"
                ),
            });
        }

        // The router takes the path literally; capture and wildcard syntax
        // would either panic there or match more than one path.
        let has_route_syntax = path.split('/').any(|segment| {
            segment.starts_with(':') || segment.starts_with('*') || segment.contains(['{', '}'])
        });
        if has_route_syntax {
            return Err(ConfigError::Invalid {
                message: format!(
                    "webhooks.endpoint_path '{path}' must not contain route parameters"
                ),
            });
        }

        if RESERVED_PATHS.contains(&path.as_str()) {
            return Err(ConfigError::Invalid {
                message: format!("webhooks.endpoint_path '{path}' collides with a built-in route"),
            });
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "logging.level must be one of {}, got '{}'",
                    LOG_LEVELS.join(", "),
                    self.logging.level
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
