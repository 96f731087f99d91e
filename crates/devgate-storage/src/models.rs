//! Storage row models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A key-value configuration row; values are stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: serde_json::Value,
}

/// The single admin credential row.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub id: i64,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}
