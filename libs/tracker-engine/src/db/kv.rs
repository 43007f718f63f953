//! Typed key-value persistence over SQLite.
//!
//! One JSON document per key. Reads never fail out to the caller: a missing
//! or undecodable entry falls back to the supplied default. Writes log and
//! swallow failures, leaving the in-memory value authoritative for the
//! session.

use crate::db::error::DbError;
use crate::db::schema;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

pub struct KvStore {
    conn: Connection,
}

impl KvStore {
    /// Open the cache at `path`, creating it if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open an in-memory cache (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<(), DbError> {
        self.conn.execute_batch(schema::SCHEMA)?;
        Ok(())
    }

    /// Load the value stored under `key`, or the default when the key is
    /// missing or the stored entry cannot be decoded.
    pub fn load<T, F>(&self, key: &str, default: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => default(),
            Err(error) => {
                tracing::warn!(key, %error, "load failed, falling back to default");
                default()
            }
        }
    }

    fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DbError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Persist `value` under `key`. Failures are logged and swallowed; the
    /// persisted copy may then be stale, which is an accepted degradation.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(error) = self.try_save(key, value) {
            tracing::warn!(key, %error, "save failed, persisted copy may be stale");
        }
    }

    fn try_save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), DbError> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_entries (key, value) VALUES (?1, ?2)",
            params![key, json],
        )?;
        Ok(())
    }

    /// Remove a single key. Best-effort.
    pub fn remove(&self, key: &str) {
        if let Err(error) = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1", params![key])
        {
            tracing::warn!(key, %error, "remove failed");
        }
    }

    /// Drop every entry. Best-effort.
    pub fn clear(&self) {
        if let Err(error) = self.conn.execute("DELETE FROM kv_entries", []) {
            tracing::warn!(%error, "clear failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        count: u32,
        label: String,
    }

    #[test]
    fn missing_key_returns_default() {
        let store = KvStore::open_in_memory().unwrap();
        let value: Vec<u32> = store.load("absent", Vec::new);
        assert_eq!(value, Vec::<u32>::new());
    }

    #[test]
    fn round_trips_a_value() {
        let store = KvStore::open_in_memory().unwrap();
        let sample = Sample {
            count: 3,
            label: "graphs".into(),
        };
        store.save("sample", &sample);
        let loaded: Sample = store.load("sample", || Sample {
            count: 0,
            label: String::new(),
        });
        assert_eq!(loaded, sample);
    }

    #[test]
    fn corrupt_entry_falls_back_to_default() {
        let store = KvStore::open_in_memory().unwrap();
        store.save("sample", &"not an object");
        let loaded: Sample = store.load("sample", || Sample {
            count: 7,
            label: "fallback".into(),
        });
        assert_eq!(loaded.count, 7);
    }

    #[test]
    fn save_overwrites_previous_value() {
        let store = KvStore::open_in_memory().unwrap();
        store.save("n", &1u32);
        store.save("n", &2u32);
        let loaded: u32 = store.load("n", || 0);
        assert_eq!(loaded, 2);
    }

    #[test]
    fn remove_and_clear() {
        let store = KvStore::open_in_memory().unwrap();
        store.save("a", &1u32);
        store.save("b", &2u32);
        store.remove("a");
        assert_eq!(store.load("a", || 0u32), 0);
        store.clear();
        assert_eq!(store.load("b", || 0u32), 0);
    }
}
