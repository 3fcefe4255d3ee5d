//! Key-value persistence contract and implementations.
//!
//! # Responsibility
//! - Offer the blob store the closet store persists into: `get`, `set` and
//!   `remove` on string keys holding string values.
//! - Provide a multi-key write so a cascading delete lands durably in one
//!   step.
//!
//! # Invariants
//! - `set_many` and `remove_many` are all-or-nothing.
//! - Reads of a key that was never written return `Ok(None)`, not an error.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type KvResult<T> = Result<T, KvError>;

/// Persistence collaborator failure.
#[derive(Debug)]
pub enum KvError {
    /// SQLite transport or schema failure.
    Db(DbError),
    /// Backing store refused the operation (quota, read-only medium, ...).
    Unavailable(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "key-value store unavailable: {message}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Device-local blob store used by the closet store.
pub trait KvRepository {
    /// Reads one value, `None` when the key is absent.
    fn get(&self, key: &str) -> KvResult<Option<String>>;
    /// Inserts or replaces one value.
    fn set(&mut self, key: &str, value: &str) -> KvResult<()>;
    /// Inserts or replaces several values atomically.
    fn set_many(&mut self, entries: &[(&str, &str)]) -> KvResult<()>;
    /// Removes one key; removing an absent key succeeds.
    fn remove(&mut self, key: &str) -> KvResult<()>;
    /// Removes several keys atomically.
    fn remove_many(&mut self, keys: &[&str]) -> KvResult<()>;
}

/// SQLite-backed key-value repository over the `kv_entries` table.
pub struct SqliteKvRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteKvRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `Unavailable` when migrations have not been applied to `conn`.
    pub fn try_new(conn: &'conn mut Connection) -> KvResult<Self> {
        let version = current_version(conn)?;
        if version < latest_version() {
            return Err(KvError::Unavailable(format!(
                "schema version {version} is behind {}; open the database with open_db",
                latest_version()
            )));
        }
        Ok(Self { conn })
    }
}

impl KvRepository for SqliteKvRepository<'_> {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> KvResult<()> {
        self.set_many(&[(key, value)])
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> KvResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> KvResult<()> {
        self.remove_many(&[key])
    }

    fn remove_many(&mut self, keys: &[&str]) -> KvResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        for key in keys {
            tx.execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        }
        tx.commit()?;
        Ok(())
    }
}

/// Process-local repository for tests and ephemeral closets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryKvRepository {
    entries: BTreeMap<String, String>,
}

impl MemoryKvRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvRepository for MemoryKvRepository {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> KvResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> KvResult<()> {
        for (key, value) in entries {
            self.entries.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> KvResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn remove_many(&mut self, keys: &[&str]) -> KvResult<()> {
        for key in keys {
            self.entries.remove(*key);
        }
        Ok(())
    }
}
