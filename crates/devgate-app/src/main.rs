//! Devgate - visitor gate server.
//!
//! Runs the HTTP server that classifies visitors against the configured
//! block lists, serves the client enforcement agent, and redirects marked
//! repeat visitors.

use std::path::PathBuf;

use clap::Parser;
use devgate_server::{Server, ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
use devgate_storage::Database;
use directories::ProjectDirs;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Devgate - visitor gate server
#[derive(Parser, Debug)]
#[command(name = "devgate", version, about)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port to bind to
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Database path (default: platform data directory)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Site root used as the default redirect target
    #[arg(long, default_value = "/")]
    site_root: String,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Get the logs directory path.
fn logs_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "devgate", "devgate").map(|dirs| dirs.data_dir().join("logs"))
}

/// Initialize logging with file rotation.
fn init_logging(args: &Args) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_level = if args.debug { "debug" } else { &args.log_level };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("devgate={},warn", log_level)));

    if let Some(log_dir) = logs_dir() {
        if std::fs::create_dir_all(&log_dir).is_ok() {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix("devgate")
                .filename_suffix("log")
                .build(&log_dir)
                .ok();

            if let Some(appender) = file_appender {
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().with_writer(std::io::stdout))
                    .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                    .init();

                tracing::info!("Logging to {:?}", log_dir);
                return Some(guard);
            }
        }
    }

    // Fallback: console logging only
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::warn!("File logging unavailable, using console only");
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Keep the guard alive for the duration of the program
    let _log_guard = init_logging(&args);

    tracing::info!("Starting Devgate...");

    let db = match args.db {
        Some(ref path) => Database::with_path(path)
            .map_err(|e| anyhow::anyhow!("Database error at {:?}: {}", path, e))?,
        None => {
            let db = Database::new().map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
            tracing::info!("Database opened at {:?}", Database::default_db_path()?);
            db
        }
    };

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        db_path: None,
        site_root: args.site_root,
    };

    let server = Server::with_database(config, db)?;
    tracing::info!("Listening on {}", server.addr());

    server.run().await?;

    tracing::info!("Devgate shutting down");
    Ok(())
}
