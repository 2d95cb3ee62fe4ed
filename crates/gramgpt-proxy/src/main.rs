//! gramgpt-proxy: keeps the model API key on the server.
//!
//! Browsers and other front-ends POST the model request body to
//! `/api/gemini`; the proxy attaches the key, forwards it upstream and
//! returns the upstream reply unchanged. Everything else is served from a
//! static directory.

mod routes;
mod server;
mod state;

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use gramgpt_config::GramConfig;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "gramgpt-proxy", version, about = "API-key proxy and static host for GramGPT")]
struct Args {
    /// Config file path override.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Address to bind (overrides `[proxy] bind`).
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides `[proxy] port`, then `PORT`).
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory of static files (overrides `[proxy] static_dir`).
    #[arg(long)]
    static_dir: Option<String>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = gramgpt_common::load_dotenv();
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => gramgpt_config::load_config_from(path),
        None => gramgpt_config::load_config(),
    };
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.as_directive().to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("gramgpt_proxy={level},tower_http={level}").into()),
        )
        .init();

    tracing::info!("gramgpt-proxy v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
    if let Err(e) = &loaded {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    let Some(api_key) = gramgpt_ai::gemini::api_key_from_env() else {
        tracing::error!(
            "no API key configured; set one of {}",
            gramgpt_ai::gemini::API_KEY_VARS.join(", ")
        );
        return ExitCode::FAILURE;
    };

    let addr = match listen_addr(&args, &config) {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("invalid listen address: {e}");
            return ExitCode::FAILURE;
        }
    };

    let static_dir = args
        .static_dir
        .clone()
        .unwrap_or_else(|| config.proxy.static_dir.clone());
    let state = Arc::new(AppState::new(
        api_key,
        &config.model.api_base,
        &config.model.name,
        static_dir,
        Duration::from_secs(u64::from(config.model.request_timeout_secs)),
    ));

    match server::run_server_with_shutdown(state, addr, server::ctrl_c()).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// CLI flags win over `PORT`, which wins over the config file.
fn listen_addr(args: &Args, config: &GramConfig) -> Result<SocketAddr, String> {
    let port = match args.port {
        Some(port) => port,
        None => match std::env::var("PORT") {
            Ok(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|e| format!("PORT={value}: {e}"))?,
            Err(_) => u16::try_from(config.proxy.port)
                .map_err(|_| format!("port {} out of range", config.proxy.port))?,
        },
    };
    let bind = args.bind.as_deref().unwrap_or(&config.proxy.bind);
    format!("{bind}:{port}")
        .parse()
        .map_err(|e| format!("{bind}:{port}: {e}"))
}
