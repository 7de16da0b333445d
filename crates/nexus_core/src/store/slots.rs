//! Slot storage backends.
//!
//! # Responsibility
//! - Provide a synchronous string key-value medium for the Store.
//! - Surface medium failures (SQLite errors, quota) instead of hiding them.
//!
//! # Invariants
//! - `write_slot` replaces the whole value for a key.
//! - A failed write leaves the previous value untouched.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SlotResult<T> = Result<T, SlotError>;

#[derive(Debug)]
pub enum SlotError {
    Db(DbError),
    QuotaExceeded {
        key: String,
        required: usize,
        quota: usize,
    },
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded {
                key,
                required,
                quota,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: {required} bytes required, quota is {quota}"
            ),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::QuotaExceeded { .. } => None,
        }
    }
}

impl From<DbError> for SlotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous per-origin key-value medium.
pub trait SlotStorage {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>>;
    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()>;
}

/// SQLite-backed slots in the `slots` table.
pub struct SqliteSlotStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotStorage<'conn> {
    /// Wraps a connection opened through `db::open_db*` (migrations applied).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotStorage for SqliteSlotStorage<'_> {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        self.conn.execute(
            "INSERT INTO slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-process slots with an optional byte quota, mirroring browser storage.
#[derive(Debug, Default)]
pub struct MemorySlotStorage {
    slots: RefCell<BTreeMap<String, String>>,
    quota: Cell<Option<usize>>,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails writes once keys plus values would exceed `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            slots: RefCell::default(),
            quota: Cell::new(Some(quota)),
        }
    }

    /// Changes the quota for subsequent writes; stored values are kept.
    pub fn set_quota(&self, quota: Option<usize>) {
        self.quota.set(quota);
    }

    pub fn used_bytes(&self) -> usize {
        self.slots
            .borrow()
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots.borrow().contains_key(key)
    }
}

impl SlotStorage for MemorySlotStorage {
    fn read_slot(&self, key: &str) -> SlotResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        if let Some(quota) = self.quota.get() {
            let previous = self
                .slots
                .borrow()
                .get(key)
                .map_or(0, |existing| key.len() + existing.len());
            let required = self.used_bytes() - previous + key.len() + value.len();
            if required > quota {
                return Err(SlotError::QuotaExceeded {
                    key: key.to_string(),
                    required,
                    quota,
                });
            }
        }

        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
