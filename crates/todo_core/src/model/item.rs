//! To-do item domain model.
//!
//! # Responsibility
//! - Define the item record shown in the work and travel lists.
//! - Provide validation shared by write and read paths.
//!
//! # Invariants
//! - `key` is unique within a collection and never reused for another item.
//! - `mode` is fixed at creation; items never move between lists.
//! - `text` is non-empty after trimming.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier of one to-do item.
///
/// Keys of the form `millis` or `millis-sequence` order numerically by
/// `(millis, sequence)`, which is creation order for keys produced by
/// [`KeyGenerator`](crate::model::key::KeyGenerator) and for legacy bare
/// timestamps of any width. Other keys sort after them, lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    /// Wraps an existing key string without validation.
    ///
    /// Used for keys coming back from storage or from the UI layer.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parsed `(millis, sequence)`; `None` for keys in another format.
    pub fn position(&self) -> Option<(u64, u32)> {
        match self.0.split_once('-') {
            Some((millis, sequence)) => Some((millis.parse().ok()?, sequence.parse().ok()?)),
            None => Some((self.0.parse().ok()?, 0)),
        }
    }
}

impl Ord for ItemKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.position(), other.position()) {
            (Some(left), Some(right)) => left.cmp(&right).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ItemKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for ItemKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Active list context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Work-related items. Default when nothing is persisted.
    #[default]
    Work,
    /// Travel-related items.
    Travel,
}

impl ViewMode {
    /// Returns the other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Work => Self::Travel,
            Self::Travel => Self::Work,
        }
    }

    /// Stable lowercase label, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Travel => "travel",
        }
    }

    /// Parses a case-insensitive label (`work` or `travel`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "work" => Some(Self::Work),
            "travel" => Some(Self::Travel),
            _ => None,
        }
    }
}

impl Display for ViewMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in the to-do list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub key: ItemKey,
    pub text: String,
    pub mode: ViewMode,
    pub completed: bool,
}

/// Full set of items keyed by stable key, iterated in ascending key order.
pub type Collection = BTreeMap<ItemKey, Item>;

/// Validation errors for item invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyKey,
    EmptyText,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "item key must not be empty"),
            Self::EmptyText => write!(f, "item text must not be empty"),
        }
    }
}

impl Error for ItemValidationError {}

impl Item {
    /// Creates a new, not yet completed item.
    ///
    /// `text` is stored trimmed.
    ///
    /// # Errors
    /// - `EmptyKey` when `key` is empty.
    /// - `EmptyText` when `text` is blank.
    pub fn new(
        key: ItemKey,
        text: impl AsRef<str>,
        mode: ViewMode,
    ) -> Result<Self, ItemValidationError> {
        let item = Self {
            key,
            text: normalize_text(text.as_ref()),
            mode,
            completed: false,
        };
        item.validate()?;
        Ok(item)
    }

    /// Checks item invariants.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.key.as_str().is_empty() {
            return Err(ItemValidationError::EmptyKey);
        }
        if self.text.trim().is_empty() {
            return Err(ItemValidationError::EmptyText);
        }
        Ok(())
    }
}

/// Trims user input the same way for add and edit.
pub fn normalize_text(value: &str) -> String {
    value.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{Item, ItemKey, ItemValidationError, ViewMode};

    #[test]
    fn new_item_trims_text_and_starts_open() {
        let item = Item::new(ItemKey::new("k1"), "  Buy milk \n", ViewMode::Work).unwrap();
        assert_eq!(item.text, "Buy milk");
        assert!(!item.completed);
    }

    #[test]
    fn new_item_rejects_blank_text_and_empty_key() {
        let err = Item::new(ItemKey::new("k1"), "   ", ViewMode::Travel).unwrap_err();
        assert_eq!(err, ItemValidationError::EmptyText);

        let err = Item::new(ItemKey::new(""), "text", ViewMode::Travel).unwrap_err();
        assert_eq!(err, ItemValidationError::EmptyKey);
    }

    #[test]
    fn keys_order_by_parsed_position_not_text() {
        let short_legacy = ItemKey::new("99999");
        let generated = ItemKey::new("1700000000000-000000");
        let same_millis = ItemKey::new("1700000000000-000010");
        let opaque = ItemKey::new("abc");

        assert!(short_legacy < generated);
        assert!(generated < same_millis);
        assert!(same_millis < opaque);
        assert_eq!(ItemKey::new("42").position(), Some((42, 0)));
        assert_eq!(opaque.position(), None);
    }

    #[test]
    fn view_mode_toggles_and_parses() {
        assert_eq!(ViewMode::default(), ViewMode::Work);
        assert_eq!(ViewMode::Work.toggled(), ViewMode::Travel);
        assert_eq!(ViewMode::Travel.toggled(), ViewMode::Work);
        assert_eq!(ViewMode::parse(" TRAVEL "), Some(ViewMode::Travel));
        assert_eq!(ViewMode::parse("home"), None);
    }

    #[test]
    fn view_mode_serializes_as_lowercase_label() {
        let json = serde_json::to_string(&ViewMode::Travel).unwrap();
        assert_eq!(json, "\"travel\"");
    }
}
