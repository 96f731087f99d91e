//! Configuration repository.

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::ConfigEntry;

/// Repository for key-value configuration operations.
pub struct ConfigRepo;

impl ConfigRepo {
    /// Get a configuration value.
    pub fn get(conn: &Connection, key: &str) -> Result<Option<ConfigEntry>> {
        let mut stmt = conn.prepare("SELECT key, value FROM config WHERE key = ?1")?;

        let entry = stmt
            .query_row([key], |row| {
                let value_str: String = row.get(1)?;
                Ok(ConfigEntry {
                    key: row.get(0)?,
                    value: serde_json::from_str(&value_str).unwrap_or(serde_json::Value::Null),
                })
            })
            .ok();

        Ok(entry)
    }

    /// Set a configuration value (insert or update).
    pub fn set(conn: &Connection, key: &str, value: &serde_json::Value) -> Result<()> {
        let value_json = serde_json::to_string(value)?;

        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value_json],
        )?;

        Ok(())
    }

    /// Get a typed configuration value, falling back to a default when the
    /// key is absent or the stored value does not deserialize.
    pub fn get_or_default<T: serde::de::DeserializeOwned>(
        conn: &Connection,
        key: &str,
        default: T,
    ) -> Result<T> {
        match Self::get(conn, key)? {
            Some(entry) => Ok(serde_json::from_value(entry.value).unwrap_or(default)),
            None => Ok(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::run_migrations;
    use serde_json::json;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn set_and_get() {
        let conn = setup_db();

        ConfigRepo::set(&conn, "redirect_url", &json!("https://away.example/")).unwrap();
        let entry = ConfigRepo::get(&conn, "redirect_url").unwrap().unwrap();

        assert_eq!(entry.key, "redirect_url");
        assert_eq!(entry.value, json!("https://away.example/"));
    }

    #[test]
    fn update_existing() {
        let conn = setup_db();

        ConfigRepo::set(&conn, "key", &json!("original")).unwrap();
        ConfigRepo::set(&conn, "key", &json!("updated")).unwrap();

        let entry = ConfigRepo::get(&conn, "key").unwrap().unwrap();
        assert_eq!(entry.value, json!("updated"));
    }

    #[test]
    fn get_nonexistent() {
        let conn = setup_db();
        assert!(ConfigRepo::get(&conn, "nonexistent").unwrap().is_none());
    }

    #[test]
    fn get_or_default_missing_key() {
        let conn = setup_db();

        let patterns: Vec<String> =
            ConfigRepo::get_or_default(&conn, "blocked_models", Vec::new()).unwrap();
        assert!(patterns.is_empty());
    }

    #[test]
    fn get_or_default_stored_list() {
        let conn = setup_db();

        ConfigRepo::set(&conn, "blocked_models", &json!(["Redmi Note 8", "SM-A505F"])).unwrap();
        let patterns: Vec<String> =
            ConfigRepo::get_or_default(&conn, "blocked_models", Vec::new()).unwrap();

        assert_eq!(patterns, vec!["Redmi Note 8", "SM-A505F"]);
    }

    #[test]
    fn get_or_default_wrong_type_falls_back() {
        let conn = setup_db();

        ConfigRepo::set(&conn, "blocked_models", &json!(42)).unwrap();
        let patterns: Vec<String> =
            ConfigRepo::get_or_default(&conn, "blocked_models", Vec::new()).unwrap();

        assert!(patterns.is_empty());
    }
}
