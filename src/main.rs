//! Talkie Server: real-time chat backend
//!
//! Main entry point that loads configuration, wires the user store, and
//! starts the HTTP + WebSocket server.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use talkie_core::config::AppConfig;
use talkie_core::error::AppError;
use talkie_database::{DatabasePool, MemoryUserStore, UserStore};

/// Talkie: real-time chat backend
#[derive(Debug, Parser)]
#[command(name = "talkie-server", version, about, long_about = None)]
struct Cli {
    /// Directory holding `default.toml` and per-environment overlays
    #[arg(short, long, env = "TALKIE_CONFIG_DIR", default_value = "config")]
    config_dir: String,

    /// Environment name; selects `{config_dir}/{env}.toml`
    #[arg(short, long, env = "TALKIE_ENV", default_value = "development")]
    env: String,

    /// Override `server.host`
    #[arg(long)]
    host: Option<String>,

    /// Override `server.port`
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the server (default)
    Serve,
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run(config).await,
        Command::Migrate => migrate(config).await,
    };

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load layered configuration and apply CLI overrides
fn load_configuration(cli: &Cli) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load(&cli.config_dir, &cli.env)?;

    if let Some(ref host) = cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        environment = %config.server.environment,
        "Starting Talkie v{}",
        env!("CARGO_PKG_VERSION")
    );

    let (users, pool) = open_user_store(&config).await?;

    let result = talkie_api::run_server(config, users).await;

    if let Some(pool) = pool {
        pool.close().await;
    }
    result
}

/// Selects PostgreSQL when a URL is configured, the in-memory store otherwise
async fn open_user_store(
    config: &AppConfig,
) -> Result<(Arc<dyn UserStore>, Option<DatabasePool>), AppError> {
    if config.database.url.is_empty() {
        tracing::warn!("database.url is empty; users are kept in memory and lost on restart");
        return Ok((Arc::new(MemoryUserStore::new()), None));
    }

    let pool = DatabasePool::connect(&config.database).await?;

    if config.database.auto_migrate {
        tracing::info!("Running database migrations...");
        pool.migrate().await?;
    }

    let users: Arc<dyn UserStore> = Arc::new(pool.users());
    Ok((users, Some(pool)))
}

/// Apply migrations without starting the server
async fn migrate(config: AppConfig) -> Result<(), AppError> {
    if config.database.url.is_empty() {
        return Err(AppError::configuration(
            "database.url must be set to run migrations",
        ));
    }

    let pool = DatabasePool::connect(&config.database).await?;
    pool.migrate().await?;
    pool.close().await;
    Ok(())
}
