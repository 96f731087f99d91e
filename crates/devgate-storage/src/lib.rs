//! Devgate Storage - SQLite persistence layer.
//!
//! Persists the three gate settings (blocked models, blocked User-Agents,
//! redirect URL) in a key-value config table, plus the admin password hash
//! and the secret used to sign block markers.
//!
//! # Example
//!
//! ```no_run
//! use devgate_storage::Database;
//!
//! let db = Database::in_memory().unwrap();
//!
//! db.save_settings(&["Redmi Note 8".to_string()], &[], Some("https://away.example/"))
//!     .unwrap();
//!
//! let config = db.load_gate_config("/").unwrap();
//! assert_eq!(config.blocked_models, vec!["Redmi Note 8"]);
//! ```

mod database;
pub mod error;
pub mod models;
mod pool;
pub mod repository;
mod schema;

pub use database::Database;
pub use error::{Result, StorageError};
pub use models::{AdminAuth, ConfigEntry};
pub use pool::ConnectionPool;
