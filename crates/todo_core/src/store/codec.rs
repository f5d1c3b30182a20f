//! JSON wire format for persisted blobs.
//!
//! Collection shape: `{ "<key>": { "text": "...", "mode": "work", "completed": false } }`.
//! Mode shape: `"work"` / `"travel"`; a legacy boolean `working` flag is
//! accepted on read.

use super::{StoreError, StoreResult, COLLECTION_STORAGE_KEY};
use crate::model::item::{Collection, Item, ItemKey, ViewMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize)]
struct ItemRecordRef<'a> {
    text: &'a str,
    mode: ViewMode,
    completed: bool,
}

#[derive(Deserialize)]
struct ItemRecord {
    text: String,
    mode: ViewMode,
    completed: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ModeWire {
    Label(ViewMode),
    Working(bool),
}

/// Serializes the full collection.
pub fn encode_collection(items: &Collection) -> StoreResult<Vec<u8>> {
    let wire: BTreeMap<&str, ItemRecordRef<'_>> = items
        .values()
        .map(|item| {
            (
                item.key.as_str(),
                ItemRecordRef {
                    text: item.text.as_str(),
                    mode: item.mode,
                    completed: item.completed,
                },
            )
        })
        .collect();
    serde_json::to_vec(&wire).map_err(|err| corrupt(err.to_string()))
}

/// Deserializes and validates a collection blob.
///
/// # Errors
/// - `CorruptState` when the blob is not a valid collection object or any
///   record violates item invariants.
pub fn decode_collection(bytes: &[u8]) -> StoreResult<Collection> {
    let wire: BTreeMap<String, ItemRecord> =
        serde_json::from_slice(bytes).map_err(|err| corrupt(err.to_string()))?;

    let mut items = Collection::new();
    for (key, record) in wire {
        let item = Item {
            key: ItemKey::new(key),
            text: record.text,
            mode: record.mode,
            completed: record.completed,
        };
        item.validate()
            .map_err(|err| corrupt(format!("item `{}`: {err}", item.key)))?;
        items.insert(item.key.clone(), item);
    }
    Ok(items)
}

pub fn encode_mode(mode: ViewMode) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(&mode).map_err(|err| StoreError::CorruptState {
        storage_key: super::MODE_STORAGE_KEY,
        message: err.to_string(),
    })
}

/// Decodes a mode blob; `None` when it is not a recognized shape.
pub fn decode_mode(bytes: &[u8]) -> Option<ViewMode> {
    match serde_json::from_slice::<ModeWire>(bytes).ok()? {
        ModeWire::Label(mode) => Some(mode),
        ModeWire::Working(true) => Some(ViewMode::Work),
        ModeWire::Working(false) => Some(ViewMode::Travel),
    }
}

fn corrupt(message: String) -> StoreError {
    StoreError::CorruptState {
        storage_key: COLLECTION_STORAGE_KEY,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_collection, decode_mode, encode_collection, encode_mode};
    use crate::model::item::{Collection, Item, ItemKey, ViewMode};
    use crate::store::StoreError;

    #[test]
    fn collection_wire_shape_is_keyed_object() {
        let mut items = Collection::new();
        let mut item = Item::new(ItemKey::new("0000000000001-000000"), "pack", ViewMode::Travel)
            .unwrap();
        item.completed = true;
        items.insert(item.key.clone(), item);

        let json: serde_json::Value =
            serde_json::from_slice(&encode_collection(&items).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "0000000000001-000000": { "text": "pack", "mode": "travel", "completed": true }
            })
        );
    }

    #[test]
    fn empty_collection_encodes_as_empty_object() {
        let bytes = encode_collection(&Collection::new()).unwrap();
        assert_eq!(bytes, b"{}");
        assert!(decode_collection(&bytes).unwrap().is_empty());
    }

    #[test]
    fn decode_rejects_invalid_json_and_blank_text() {
        let err = decode_collection(b"[not json").unwrap_err();
        assert!(matches!(err, StoreError::CorruptState { .. }));

        let blank = br#"{"k": {"text": "  ", "mode": "work", "completed": false}}"#;
        let err = decode_collection(blank).unwrap_err();
        assert!(err.to_string().contains("item `k`"), "unexpected error: {err}");
    }

    #[test]
    fn mode_decodes_labels_and_legacy_booleans() {
        assert_eq!(decode_mode(&encode_mode(ViewMode::Travel).unwrap()), Some(ViewMode::Travel));
        assert_eq!(decode_mode(b"true"), Some(ViewMode::Work));
        assert_eq!(decode_mode(b"false"), Some(ViewMode::Travel));
        assert_eq!(decode_mode(b"\"home\""), None);
        assert_eq!(decode_mode(b""), None);
    }
}
