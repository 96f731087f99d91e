//! Application state for the gate server.

use std::sync::Arc;

use devgate_core::auth::AuthManager;
use devgate_storage::{Database, Result};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Settings and credential storage.
    pub db: Arc<Database>,
    /// Admin authentication manager.
    pub auth: Arc<AuthManager>,
    /// Site root used as the default redirect target.
    pub site_root: String,
    /// Secret used to sign block markers; loaded once at startup so every
    /// worker mints and verifies with the same key.
    pub marker_secret: String,
}

impl AppState {
    /// Creates application state with the given database.
    pub fn new(db: Database, site_root: impl Into<String>) -> Result<Self> {
        let marker_secret = db.ensure_marker_secret()?;

        Ok(Self {
            db: Arc::new(db),
            auth: Arc::new(AuthManager::new()),
            site_root: site_root.into(),
            marker_secret,
        })
    }

    /// Creates application state with an in-memory database (for testing).
    pub fn in_memory() -> Self {
        let db = Database::in_memory().expect("Failed to create in-memory database");
        Self::new(db, "/").expect("Failed to initialize state")
    }
}
