//! studio-server - AI media studio backend
//!
//! Serves the JSON API (accounts, saved creations, persona agents, mood
//! mixtapes, Rhythm Roulette, synthetic audio) and the built frontend.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use studio_common::config::{CliOverrides, ServiceConfig, TomlConfig};
use studio_server::agents::{AgentHub, AnthropicClient};
use studio_server::{AppState, ServerSettings};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for studio-server
#[derive(Parser, Debug)]
#[command(name = "studio-server")]
#[command(about = "AI media studio backend")]
#[command(version)]
struct Args {
    /// Path to config.toml
    #[arg(short, long, env = "STUDIO_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding studio.db
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Address to bind
    #[arg(short, long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory of the built frontend
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Production mode (secure cookies)
    #[arg(long)]
    production: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG wins; otherwise start at info and switch to the configured
    // level once the TOML file has been read
    let env_filter = EnvFilter::try_from_default_env().ok();
    let rust_log_set = env_filter.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new("info")));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!(
        "Starting studio-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE"),
    );

    let toml_config = TomlConfig::load_or_default(args.config.as_deref());
    let config = ServiceConfig::resolve(
        &CliOverrides {
            root_folder: args.root_folder,
            bind_address: args.bind,
            port: args.port,
            static_dir: args.static_dir,
            production: args.production,
        },
        &toml_config,
    );

    if !rust_log_set {
        match EnvFilter::try_new(&config.log_level) {
            Ok(level) => {
                if let Err(e) = filter_handle.reload(level) {
                    warn!("Failed to apply log level '{}': {}", config.log_level, e);
                }
            }
            Err(e) => warn!("Invalid log level '{}': {}", config.log_level, e),
        }
    }

    config
        .ensure_root_folder()
        .context("Failed to initialize root folder")?;

    let db_path = config.database_path();
    info!("Database: {}", db_path.display());
    let db = studio_common::db::init_database(&db_path)
        .await
        .context("Failed to open database")?;

    let client = AnthropicClient::new(&config.llm).context("Failed to build LLM client")?;
    if client.is_configured() {
        info!("LLM model: {}", config.llm.model);
    } else {
        warn!("No LLM API key configured; agent endpoints will fail");
    }
    let agents = AgentHub::new(Arc::new(client), config.llm.max_tokens);

    if config.production {
        info!("Production mode: secure cookies enabled");
    }
    if let Some(dir) = &config.static_dir {
        info!("Serving frontend from {}", dir.display());
    }

    let state = AppState::new(
        db,
        agents,
        ServerSettings {
            secure_cookies: config.production,
            static_dir: config.static_dir.clone(),
        },
    );
    let app = studio_server::build_router(state);

    let address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;
    info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
