//! Admin credential repository.

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::error::{Result, StorageError};
use crate::models::AdminAuth;

/// Repository for the single admin credential row.
pub struct AuthRepo;

impl AuthRepo {
    /// Check if a password has been set.
    pub fn is_setup(conn: &Connection) -> Result<bool> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM auth WHERE id = 1", [], |row| {
            row.get(0)
        })?;
        Ok(count > 0)
    }

    /// Get the credential row.
    pub fn get(conn: &Connection) -> Result<Option<AdminAuth>> {
        let mut stmt = conn
            .prepare("SELECT id, password_hash, created_at, last_login FROM auth WHERE id = 1")?;

        let auth = stmt
            .query_row([], |row| {
                Ok(AdminAuth {
                    id: row.get(0)?,
                    password_hash: row.get(1)?,
                    created_at: parse_datetime(&row.get::<_, String>(2)?),
                    last_login: row.get::<_, Option<String>>(3)?.map(|s| parse_datetime(&s)),
                })
            })
            .ok();

        Ok(auth)
    }

    /// Set the password hash (initial setup or password change).
    pub fn set_password(conn: &Connection, password_hash: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO auth (id, password_hash) VALUES (1, ?1)
             ON CONFLICT(id) DO UPDATE SET password_hash = ?1",
            [password_hash],
        )?;

        Ok(())
    }

    /// Update the last login timestamp.
    pub fn update_last_login(conn: &Connection) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        conn.execute("UPDATE auth SET last_login = ?1 WHERE id = 1", [&now])?;
        Ok(())
    }

    /// Get the password hash for verification.
    pub fn get_password_hash(conn: &Connection) -> Result<String> {
        let hash: String = conn
            .query_row("SELECT password_hash FROM auth WHERE id = 1", [], |row| {
                row.get(0)
            })
            .map_err(|_| StorageError::NotFound("Auth not setup".to_string()))?;

        Ok(hash)
    }
}

/// Parse a datetime from SQLite format.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
        })
        .unwrap_or_else(|_| Utc::now())
}
