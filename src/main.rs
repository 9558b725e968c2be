use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ommc_interactions::completion::openai::OpenAiCompleter;
use ommc_interactions::config::Config;
use ommc_interactions::consts::{
    DEFAULT_BIND, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_OPENAI_BASE_URL,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use ommc_interactions::handler::InteractionHandler;
use ommc_interactions::server;

#[derive(Parser)]
#[command(name = "ommc-interactions", version, about = "Discord interactions endpoint for the OMMC bot.")]
struct Cli {
    /// Discord application ID
    #[arg(long, env = "APPLICATION_ID")]
    application_id: String,

    /// Application public key (hex), used to verify request signatures
    #[arg(long, env = "PUBLIC_KEY")]
    public_key: String,

    /// API key for the completion backend
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: String,

    /// Completion API base URL
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_BASE_URL)]
    openai_base_url: String,

    /// Completion model
    #[arg(long, env = "COMPLETION_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum tokens per completion
    #[arg(long, env = "COMPLETION_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Completion request timeout in seconds
    #[arg(long, env = "COMPLETION_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout: u64,

    /// Address to listen on
    #[arg(short, long, env = "BIND", default_value = DEFAULT_BIND)]
    bind: SocketAddr,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            application_id: self.application_id,
            public_key: self.public_key,
            openai_api_key: self.openai_api_key,
            openai_base_url: self.openai_base_url,
            completion_model: self.model,
            max_tokens: self.max_tokens,
            request_timeout: Duration::from_secs(self.timeout),
            bind: self.bind,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let config = Cli::parse().into_config();
    config.validate().context("invalid configuration")?;
    info!(?config, "configuration loaded");

    let completer = Arc::new(OpenAiCompleter::new(&config)?);
    let handler = Arc::new(InteractionHandler::from_config(&config, completer)?);
    let commands = handler.commands();
    for kind in commands.kinds() {
        if let Some(command) = commands.get(kind) {
            info!(command = %kind, description = command.description(), "registered command");
        }
    }
    info!("interaction handler ready");

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    server::serve(listener, handler, shutdown_signal()).await?;

    info!("server shut down cleanly");
    Ok(())
}

const DEFAULT_LOG_FILTER: &str = "ommc_interactions=info";

/// `RUST_LOG` wins when it parses; otherwise log this crate at info.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("failed to register SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_overrides_default_level() {
        assert_eq!(
            log_filter(Some("ommc_interactions=debug")).to_string(),
            "ommc_interactions=debug"
        );
    }

    #[test]
    fn default_filter_without_rust_log() {
        assert_eq!(log_filter(None).to_string(), DEFAULT_LOG_FILTER);
    }
}
