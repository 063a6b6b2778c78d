//! SQLite key-value store.
//!
//! The app keeps its whole state as a few JSON blobs, so a single `kv`
//! table is all the schema there is.

use std::path::Path;

use rusqlite::{params, Connection};

use super::data_dir;
use crate::error::{CoreError, DatabaseError};

/// SQLite database holding the `kv` table.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/tempo/tempo.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("tempo.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Set several values in one transaction: either all land or none do.
    pub fn kv_set_all(&self, entries: &[(&str, &str)]) -> Result<(), rusqlite::Error> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }
        tx.commit()
    }

    /// Remove a key. Returns true when it existed.
    pub fn kv_delete(&self, key: &str) -> Result<bool, rusqlite::Error> {
        let n = self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_set("test", "again").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn kv_delete() {
        let db = Database::open_memory().unwrap();
        db.kv_set("k", "v").unwrap();
        assert!(db.kv_delete("k").unwrap());
        assert!(!db.kv_delete("k").unwrap());
        assert!(db.kv_get("k").unwrap().is_none());
    }

    #[test]
    fn kv_set_all_writes_every_key() {
        let db = Database::open_memory().unwrap();
        db.kv_set("a", "old").unwrap();
        db.kv_set_all(&[("a", "1"), ("b", "2")]).unwrap();
        assert_eq!(db.kv_get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(db.kv_get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tempo.db");
        Database::open_at(&path).unwrap().kv_set("coins", "135").unwrap();
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.kv_get("coins").unwrap().as_deref(), Some("135"));
    }
}
