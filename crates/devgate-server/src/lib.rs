//! Devgate Server - HTTP surface for the visitor gate.
//!
//! ## Endpoints
//!
//! - `POST /api/check` - Classify visitor signals, always success-shaped
//! - `GET /gate.js` - Client enforcement agent script
//! - `GET /api/settings` - Current gate settings
//! - `PUT /api/settings` - Replace gate settings (requires auth)
//! - `POST /api/auth/setup` - First-run admin password setup
//! - `POST /api/auth/verify` - Verify password and get session token
//! - any other path - Gated page, subject to the block-marker redirect
//!
//! ## Example
//!
//! ```no_run
//! use devgate_server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::new(ServerConfig::default()).await.unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

mod enforce;
pub mod error;
mod handlers;
pub mod models;
pub mod state;

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::{middleware, Router};
use socket2::{Domain, Protocol, Socket, Type};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use devgate_storage::Database;

pub use error::{ApiError, Result};
pub use state::AppState;

/// Default server port.
pub const DEFAULT_PORT: u16 = 48080;

/// Default server host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (default: 127.0.0.1).
    pub host: String,
    /// Port to bind to (default: 48080).
    pub port: u16,
    /// Database path (None = in-memory).
    pub db_path: Option<String>,
    /// Site root used as the default redirect target.
    pub site_root: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: None,
            site_root: devgate_core::config::DEFAULT_SITE_ROOT.to_string(),
        }
    }
}

impl ServerConfig {
    /// Creates a config with a specific database path.
    pub fn with_db_path(path: impl Into<String>) -> Self {
        Self {
            db_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the site root.
    pub fn with_site_root(mut self, site_root: impl Into<String>) -> Self {
        self.site_root = site_root.into();
        self
    }
}

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to address.
    #[error("failed to bind to {0}: {1}")]
    BindError(SocketAddr, std::io::Error),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] devgate_storage::StorageError),

    /// Server runtime error.
    #[error("server error: {0}")]
    Runtime(String),
}

/// The HTTP gate server.
pub struct Server {
    router: Router,
    addr: SocketAddr,
}

impl Server {
    /// Creates a new server with the given configuration.
    pub async fn new(config: ServerConfig) -> std::result::Result<Self, ServerError> {
        let db = if let Some(ref path) = config.db_path {
            Database::with_path(path)?
        } else {
            Database::in_memory()?
        };

        Self::with_database(config, db)
    }

    /// Creates a server with an existing database.
    pub fn with_database(
        config: ServerConfig,
        db: Database,
    ) -> std::result::Result<Self, ServerError> {
        let state = AppState::new(db, config.site_root.clone())?;
        Self::with_state(config, state)
    }

    /// Creates a server with custom application state.
    pub fn with_state(
        config: ServerConfig,
        state: AppState,
    ) -> std::result::Result<Self, ServerError> {
        let router = build_router(state);

        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| ServerError::Runtime(format!("invalid address: {}", e)))?;

        Ok(Self { router, addr })
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Runs the server until shutdown.
    pub async fn run(self) -> std::result::Result<(), ServerError> {
        info!("Starting Devgate server on {}", self.addr);

        // SO_REUSEADDR so restarts are not blocked by lingering sockets
        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
            .map_err(|e| ServerError::BindError(self.addr, e))?;
        socket
            .set_reuse_address(true)
            .map_err(|e| ServerError::BindError(self.addr, e))?;
        socket
            .bind(&self.addr.into())
            .map_err(|e| ServerError::BindError(self.addr, e))?;
        socket
            .listen(128)
            .map_err(|e| ServerError::BindError(self.addr, e))?;
        socket
            .set_nonblocking(true)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        let std_listener: std::net::TcpListener = socket.into();
        let listener = tokio::net::TcpListener::from_std(std_listener)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        axum::serve(listener, self.router)
            .await
            .map_err(|e| ServerError::Runtime(e.to_string()))?;

        Ok(())
    }

    /// Returns the router for testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Builds the full router: API routes, agent script, gated fallback page,
/// with the enforcement middleware in front of everything.
fn build_router(state: AppState) -> Router {
    // The decision endpoint is deliberately open to any caller.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/check", post(handlers::check_visitor))
        .route(
            "/api/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .route("/api/auth/setup", post(handlers::auth_setup))
        .route("/api/auth/verify", post(handlers::auth_verify))
        .route("/gate.js", get(handlers::serve_agent))
        .fallback(handlers::serve_page)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            enforce::check_block_marker,
        ))
        .layer(cors)
        .with_state(state)
}
