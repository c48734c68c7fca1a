//! Messagely CLI server
//!
//! ```sh
//! # Run with default config (~/.config/messagely/config.toml)
//! messagely
//!
//! # Custom config path
//! messagely --config /etc/messagely/config.toml
//!
//! # Ephemeral in-memory store
//! messagely --memory
//!
//! # Validate config without starting
//! messagely --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use messagely::config::{AppConfig, MEMORY_DATABASE};
use messagely::server::{init_tracing, ServerHandle, ServerOptions};

/// Messagely: two-party messaging with token authentication.
#[derive(Parser, Debug)]
#[command(
    name = "messagely",
    version,
    about = "Two-party messaging REST API",
    long_about = "Messagely - REST API for user registration, login and \
                  direct messages between two users.\n\n\
                  Default config: ~/.config/messagely/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "MESSAGELY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Use the in-memory store instead of the configured database.
    #[arg(long)]
    memory: bool,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(messagely::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    // ── CLI overrides ──────────────────────────────────────────
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.memory {
        config.database.url = MEMORY_DATABASE.to_string();
    }

    if cli.check {
        return match config.validate() {
            Ok(()) => {
                println!("Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   API address : {}", config.api_address());
                println!("   Database    : {}", config.database.connection_url());
                println!("   Work factor : {}", config.security.bcrypt_work_factor);
                println!("   Log level   : {}", config.logging.level);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Configuration is invalid: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    ExitCode::SUCCESS
}
