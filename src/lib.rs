pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod roster;
pub mod services;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
pub use config::Config;
use state::SharedState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run(config: Config) -> anyhow::Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Some(Commands::Init)) {
        if Config::create_default_if_missing()? {
            println!("✓ Config file created. Edit config.toml and run again.");
        } else {
            println!("config.toml already exists, leaving it untouched.");
        }
        return Ok(());
    }

    config.validate()?;

    init_tracing(&config);
    match &config.loaded_from {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::Init => Ok(()),
        command => {
            let state = SharedState::new(config).await?;
            run_command(&state, command).await
        }
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run_command(state: &SharedState, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Backup { file } => cli::cmd_backup(state, &file).await,
        Commands::Restore { file } => cli::cmd_restore(state, &file).await,
        Commands::ResetYear { yes } => cli::cmd_reset_year(state, yes).await,
        Commands::ImportRoster { file } => cli::cmd_import_roster(state, &file).await,
        Commands::CreateUser {
            username,
            role,
            password,
        } => cli::cmd_create_user(state, &username, &role, &password).await,
        Commands::Serve | Commands::Init => Ok(()),
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!(
        "clinicdesk v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let prometheus_handle = {
        use metrics_exporter_prometheus::PrometheusBuilder;
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!("Failed to install Prometheus recorder: {}", e);
                None
            }
        }
    };

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let shared = Arc::new(SharedState::new(config).await?);
    let app = api::router(api::create_app_state(shared, prometheus_handle));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server running at http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Web server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}
