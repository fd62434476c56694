//! Key/value repository implementation

use crate::error::Result;
use crate::util::now_millis;
use rusqlite::{params, Connection, OptionalExtension};

/// Trait for key/value storage operations
pub trait KeyValueRepository {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; returns whether it existed
    fn remove(&self, key: &str) -> Result<bool>;
}

/// `SQLite` implementation of `KeyValueRepository`
pub struct SqliteKeyValueRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteKeyValueRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueRepository for SqliteKeyValueRepository<'_> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, now_millis()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let removed = self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_get_missing_key() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteKeyValueRepository::new(db.connection());
        assert_eq!(repo.get("nothing").unwrap(), None);
    }

    #[test]
    fn test_set_replaces_value() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteKeyValueRepository::new(db.connection());

        repo.set("greeting", "hej").unwrap();
        repo.set("greeting", "hallo").unwrap();
        assert_eq!(repo.get("greeting").unwrap().as_deref(), Some("hallo"));
    }

    #[test]
    fn test_remove_reports_existence() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteKeyValueRepository::new(db.connection());

        repo.set("key", "value").unwrap();
        assert!(repo.remove("key").unwrap());
        assert!(!repo.remove("key").unwrap());
    }
}
