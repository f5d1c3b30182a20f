//! SQLite bootstrap for the `kv_entries` table behind [`SqliteKvStore`].
//!
//! # Responsibility
//! - Open a connection, set its busy timeout and bring `kv_entries` to the
//!   schema this build understands.
//! - Refuse files written by a newer build instead of guessing at their layout.
//!
//! # Invariants
//! - `PRAGMA user_version` equals [`migrations::latest_version`] on every
//!   connection handed to a store.
//! - No `@toDos` or `@mode` value is read or written before migrations commit.
//!
//! [`SqliteKvStore`]: crate::storage::SqliteKvStore

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_db_with, DbOptions};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the key-value database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer build.
    ///
    /// Its `kv_entries` rows may use a layout this build cannot decode, so the
    /// stored collection and mode are left untouched rather than read.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "kv database schema version {db_version} is newer than supported \
                 {latest_supported}; refusing to read stored items"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;

    #[test]
    fn newer_schema_message_names_both_versions() {
        let err = DbError::UnsupportedSchemaVersion {
            db_version: 7,
            latest_supported: 1,
        };
        let message = err.to_string();
        assert!(message.contains("version 7"));
        assert!(message.contains("supported 1"));
        assert!(std::error::Error::source(&err).is_none());
    }
}
