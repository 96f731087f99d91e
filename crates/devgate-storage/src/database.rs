//! High-level database interface.

use std::path::PathBuf;

use directories::ProjectDirs;
use rand::RngCore;
use serde_json::json;
use tracing::info;

use devgate_core::config::{is_absolute_url, GateConfig};

use crate::error::{Result, StorageError};
use crate::pool::ConnectionPool;
use crate::repository::{AuthRepo, ConfigRepo};

/// Config key for the blocked model patterns.
const KEY_BLOCKED_MODELS: &str = "blocked_models";
/// Config key for the blocked User-Agent patterns.
const KEY_BLOCKED_UA: &str = "blocked_ua";
/// Config key for the redirect URL.
const KEY_REDIRECT_URL: &str = "redirect_url";
/// Config key for the marker signing secret.
const KEY_MARKER_SECRET: &str = "marker_secret";

/// High-level database interface for Devgate.
#[derive(Clone)]
pub struct Database {
    pool: ConnectionPool,
}

impl Database {
    /// Create a new database in the default app data directory.
    pub fn new() -> Result<Self> {
        Self::with_path(Self::default_db_path()?)
    }

    /// Create a new database at a specific path.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening database at: {:?}", path);
        let pool = ConnectionPool::new(&path)?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let pool = ConnectionPool::in_memory()?;
        Ok(Self { pool })
    }

    /// Get the default database path.
    pub fn default_db_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "devgate", "devgate")
            .ok_or_else(|| StorageError::Config("Could not determine app data directory".into()))?;

        Ok(proj_dirs.data_dir().join("devgate.db"))
    }

    // === Gate settings ===

    /// Read the configuration snapshot, applying documented defaults:
    /// empty pattern lists and a site-root redirect.
    pub fn load_gate_config(&self, site_root: &str) -> Result<GateConfig> {
        let conn = self.pool.get()?;

        let blocked_models: Vec<String> =
            ConfigRepo::get_or_default(&conn, KEY_BLOCKED_MODELS, Vec::new())?;
        let blocked_ua: Vec<String> =
            ConfigRepo::get_or_default(&conn, KEY_BLOCKED_UA, Vec::new())?;
        let redirect_url: Option<String> =
            ConfigRepo::get_or_default(&conn, KEY_REDIRECT_URL, None)?;

        Ok(GateConfig::new(
            blocked_models,
            blocked_ua,
            redirect_url.as_deref(),
            site_root,
        ))
    }

    /// Persist the gate settings.
    ///
    /// Pattern lists are stored as given (entries are re-normalized at
    /// match time anyway). The redirect URL is only written when it passes
    /// the shape check; an invalid value leaves the previous one in place.
    pub fn save_settings(
        &self,
        blocked_models: &[String],
        blocked_ua: &[String],
        redirect_url: Option<&str>,
    ) -> Result<()> {
        let conn = self.pool.get()?;

        ConfigRepo::set(&conn, KEY_BLOCKED_MODELS, &json!(blocked_models))?;
        ConfigRepo::set(&conn, KEY_BLOCKED_UA, &json!(blocked_ua))?;

        if let Some(url) = redirect_url.map(str::trim) {
            if is_absolute_url(url) {
                ConfigRepo::set(&conn, KEY_REDIRECT_URL, &json!(url))?;
            }
        }

        info!(
            models = blocked_models.len(),
            ua = blocked_ua.len(),
            "Gate settings saved"
        );

        Ok(())
    }

    /// Get an arbitrary config value.
    pub fn get_config(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.pool.get()?;
        Ok(ConfigRepo::get(&conn, key)?.map(|e| e.value))
    }

    /// Set an arbitrary config value.
    pub fn set_config(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.pool.get()?;
        ConfigRepo::set(&conn, key, value)
    }

    /// Return the marker signing secret, generating and persisting one on
    /// first use so markers survive restarts.
    pub fn ensure_marker_secret(&self) -> Result<String> {
        let conn = self.pool.get()?;

        let existing: Option<String> = ConfigRepo::get_or_default(&conn, KEY_MARKER_SECRET, None)?;
        if let Some(secret) = existing.filter(|s| !s.is_empty()) {
            return Ok(secret);
        }

        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        let secret: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();

        ConfigRepo::set(&conn, KEY_MARKER_SECRET, &json!(secret))?;
        info!("Generated new marker signing secret");

        Ok(secret)
    }

    // === Admin auth ===

    /// Check if the admin password has been set.
    pub fn is_auth_setup(&self) -> Result<bool> {
        let conn = self.pool.get()?;
        AuthRepo::is_setup(&conn)
    }

    /// Store the admin password hash.
    pub fn set_password_hash(&self, hash: &str) -> Result<()> {
        let conn = self.pool.get()?;
        AuthRepo::set_password(&conn, hash)
    }

    /// Get the stored admin password hash.
    pub fn get_password_hash(&self) -> Result<String> {
        let conn = self.pool.get()?;
        AuthRepo::get_password_hash(&conn)
    }

    /// Record a successful admin login.
    pub fn update_last_login(&self) -> Result<()> {
        let conn = self.pool.get()?;
        AuthRepo::update_last_login(&conn)
    }
}
