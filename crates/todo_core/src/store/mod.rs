//! Durable state stores for the to-do screen.
//!
//! # Responsibility
//! - Own the in-memory item collection and the view-mode flag.
//! - Persist every mutation through an injected `KvStore` before reporting
//!   success.
//!
//! # Invariants
//! - After a successful mutation the persisted collection blob equals the
//!   in-memory collection.
//! - A failed mutation leaves in-memory state unchanged.

use crate::model::item::{ItemKey, ItemValidationError};
use crate::storage::KvError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod codec;
pub mod todo_store;
pub mod view_mode_store;

/// Storage key holding the serialized item collection.
pub const COLLECTION_STORAGE_KEY: &str = "@toDos";
/// Storage key holding the serialized view-mode flag.
pub const MODE_STORAGE_KEY: &str = "@mode";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error taxonomy.
#[derive(Debug)]
pub enum StoreError {
    /// Add or edit was called with blank text. Nothing changed.
    EmptyInput,
    /// The referenced item does not exist (stale UI reference).
    NotFound(ItemKey),
    /// A persisted blob exists but cannot be decoded or validated.
    CorruptState {
        storage_key: &'static str,
        message: String,
    },
    /// An item failed validation on a write path.
    Validation(ItemValidationError),
    /// The backend read or write failed. The mutation was not applied.
    Storage(KvError),
}

impl StoreError {
    /// Stable machine-readable code for UI and FFI callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::NotFound(_) => "not_found",
            Self::CorruptState { .. } => "corrupt_state",
            Self::Validation(_) => "invalid_item",
            Self::Storage(_) => "storage_io",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "text must not be empty"),
            Self::NotFound(key) => write!(f, "item not found: {key}"),
            Self::CorruptState {
                storage_key,
                message,
            } => write!(f, "corrupt persisted state under `{storage_key}`: {message}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::EmptyInput | Self::NotFound(_) | Self::CorruptState { .. } => None,
        }
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

impl From<ItemValidationError> for StoreError {
    fn from(value: ItemValidationError) -> Self {
        match value {
            ItemValidationError::EmptyText => Self::EmptyInput,
            other => Self::Validation(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StoreError;
    use crate::model::item::{ItemKey, ItemValidationError};
    use crate::storage::KvError;

    #[test]
    fn every_variant_has_a_stable_code() {
        let cases = [
            (StoreError::EmptyInput, "empty_input"),
            (StoreError::NotFound(ItemKey::new("k1")), "not_found"),
            (
                StoreError::CorruptState {
                    storage_key: super::COLLECTION_STORAGE_KEY,
                    message: "bad json".to_string(),
                },
                "corrupt_state",
            ),
            (
                StoreError::Validation(ItemValidationError::EmptyKey),
                "invalid_item",
            ),
            (
                StoreError::Storage(KvError::Unavailable("offline".to_string())),
                "storage_io",
            ),
        ];
        for (err, code) in cases {
            assert_eq!(err.code(), code, "{err}");
        }
    }

    #[test]
    fn blank_text_validation_maps_to_empty_input() {
        let err = StoreError::from(ItemValidationError::EmptyText);
        assert!(matches!(err, StoreError::EmptyInput));

        let err = StoreError::from(ItemValidationError::EmptyKey);
        assert_eq!(err.code(), "invalid_item");
    }
}
