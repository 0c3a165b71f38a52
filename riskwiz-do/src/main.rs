//! riskwiz-do (Dashboard Orchestrator) - Climate risk dashboard service
//!
//! Guides the wizard UI's dashboard requests through fingerprinting,
//! caching, acquisition dispatch, and contract validation, and exposes the
//! result over a small HTTP surface.

use anyhow::Result;
use clap::Parser;
use riskwiz_common::config::ServiceConfig;
use riskwiz_common::versions::DatasetVersionRegistry;
use riskwiz_do::cache::ResultCache;
use riskwiz_do::dispatch::AcquisitionStrategy;
use riskwiz_do::orchestrator::Orchestrator;
use riskwiz_do::{build_router, AppState};
use std::path::PathBuf;
use tracing::info;

/// Command-line overrides; everything else resolves from environment,
/// TOML, then compiled defaults
#[derive(Debug, Parser)]
#[command(name = "riskwiz-do", version)]
struct Args {
    /// Path to a TOML config file (default: ~/.config/riskwiz/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,

    /// Override the acquisition mode (mock|real)
    #[arg(long)]
    mode: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Resolve configuration before tracing init: the subscriber's default
    // directive comes from the configured verbosity
    let mut config = ServiceConfig::resolve(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.listen_port = port;
    }
    if let Some(mode) = &args.mode {
        config.mode = mode.parse()?;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.verbosity.default_directive().parse()?),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Riskwiz Dashboard Orchestrator (riskwiz-do) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!(
        mode = config.mode.as_str(),
        remote_base = %config.remote_base,
        timeout_ms = config.request_timeout_ms,
        "Configuration resolved"
    );

    // Explicitly constructed collaborators; nothing ambient
    let registry = DatasetVersionRegistry::default();
    info!(dataset_hash = %registry.hash(), sources = registry.current().len(), "Dataset version registry loaded");

    let strategy = AcquisitionStrategy::from_config(&config, &registry)?;
    let orchestrator = Orchestrator::new(registry, ResultCache::new(), strategy);

    let state = AppState::new(orchestrator);
    let app = build_router(state);

    let listener =
        tokio::net::TcpListener::bind(("127.0.0.1", config.listen_port)).await?;
    info!("riskwiz-do listening on http://127.0.0.1:{}", config.listen_port);
    info!("Health check: http://127.0.0.1:{}/health", config.listen_port);

    axum::serve(listener, app).await?;

    Ok(())
}
