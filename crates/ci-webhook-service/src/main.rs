//! # CI Webhook Service
//!
//! Binary entry point for the CI webhook receiver.
//!
//! This executable:
//! - Parses the command line and loads layered configuration
//! - Initializes structured logging
//! - Builds the webhook pipeline
//! - Starts the HTTP server from ci-webhook-api

use anyhow::Context;
use ci_webhook_api::{start_server, ConfigError, LoggingConfig, ServiceConfig};
use ci_webhook_core::webhook::{
    EventDispatcher, SignatureVerifier, WebhookPipeline, WebhookSecret,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Receive GitHub webhooks and acknowledge CI events
#[derive(Debug, Parser)]
#[command(name = "ci-webhook", version, about)]
struct Cli {
    /// Configuration file applied after the system and local files
    #[arg(long, env = "CI_WEBHOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Shared secret for X-Hub-Signature-256 verification
    #[arg(long, env = "GITHUB_WEBHOOK_SECRET", hide_env_values = true)]
    webhook_secret: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // -------------------------------------------------------------------------
    // Load configuration
    //
    // Sources (later sources override earlier ones):
    //  1. /etc/ci-webhook/service.{toml,yaml,json}
    //  2. ./config/service.{toml,yaml,json}
    //  3. --config / CI_WEBHOOK_CONFIG
    //  4. CI_WEBHOOK__SECTION__KEY environment variables
    //  5. Command line flags and GITHUB_WEBHOOK_SECRET
    // -------------------------------------------------------------------------
    let resolved = resolve_config(&cli);

    let logging = match &resolved {
        Ok(config) => config.logging.clone(),
        Err(_) => LoggingConfig::default(),
    };
    init_tracing(&logging)?;

    let config = match resolved {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Service configuration is invalid; aborting");
            std::process::exit(3);
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        signature_verification = config.webhooks.secret.is_some(),
        "Starting CI webhook service"
    );

    let pipeline = WebhookPipeline::new(
        SignatureVerifier::new(config.webhooks.secret.clone()),
        EventDispatcher::new(),
    );

    if let Err(e) = start_server(config, pipeline).await {
        error!(error = %e, "Failed to start server");
        std::process::exit(e.exit_code());
    }

    Ok(())
}

/// Load, override and validate the service configuration
fn resolve_config(cli: &Cli) -> Result<ServiceConfig, ConfigError> {
    let mut config = ServiceConfig::load(cli.config.as_deref())?;

    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.json_logs {
        config.logging.json_format = true;
    }
    if let Some(secret) = &cli.webhook_secret {
        let secret = WebhookSecret::new(secret.as_str()).map_err(|e| ConfigError::Invalid {
            message: e.to_string(),
        })?;
        config.webhooks.secret = Some(secret);
    }

    config.validate()?;
    Ok(config)
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let level = logging.level.to_ascii_lowercase();
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!(
            "ci_webhook={level},ci_webhook_api={level},ci_webhook_core={level},tower_http={level}"
        ))
        .context("invalid log level")?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = if logging.json_format {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.context("failed to install tracing subscriber")
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
