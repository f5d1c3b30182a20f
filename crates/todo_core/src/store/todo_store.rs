//! Durable CRUD over the to-do item collection.
//!
//! # Responsibility
//! - Load the persisted collection and keep it in memory.
//! - Apply add/delete/toggle/edit and persist the full collection each time.
//! - Serve per-mode listings in ascending key (creation) order.
//!
//! # Invariants
//! - Mutations are applied to a working copy; the in-memory collection is
//!   replaced only after the write succeeded.
//! - Item mode is never changed after creation.
//! - Item text is never logged.

use super::codec::{decode_collection, encode_collection};
use super::{StoreError, StoreResult, COLLECTION_STORAGE_KEY};
use crate::model::item::{normalize_text, Collection, Item, ItemKey, ViewMode};
use crate::model::key::KeyGenerator;
use crate::storage::KvStore;
use log::{debug, error, info};
use std::time::Instant;

/// Completion counters for one list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeCounts {
    pub total: usize,
    pub completed: usize,
}

/// To-do collection bound to a storage backend.
pub struct ToDoStore<'s, S: KvStore + ?Sized> {
    storage: &'s S,
    items: Collection,
    keys: KeyGenerator,
}

impl<'s, S: KvStore + ?Sized> ToDoStore<'s, S> {
    /// Loads the persisted collection from `storage`.
    ///
    /// # Errors
    /// - `CorruptState` when a blob exists but cannot be decoded.
    /// - `Storage` when the backend read fails.
    pub fn load(storage: &'s S) -> StoreResult<Self> {
        let items = load_collection(storage)?;
        let keys = KeyGenerator::seeded_from(items.keys());
        Ok(Self {
            storage,
            items,
            keys,
        })
    }

    /// Re-reads the persisted collection, replacing in-memory state.
    ///
    /// In-memory state is kept when the read fails.
    pub fn reload(&mut self) -> StoreResult<&Collection> {
        let items = load_collection(self.storage)?;
        self.keys.observe(items.keys());
        self.items = items;
        Ok(&self.items)
    }

    pub fn collection(&self) -> &Collection {
        &self.items
    }

    pub fn get(&self, key: &ItemKey) -> Option<&Item> {
        self.items.get(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items of one list, oldest first.
    pub fn list_by_mode(&self, mode: ViewMode) -> Vec<&Item> {
        self.items
            .values()
            .filter(|item| item.mode == mode)
            .collect()
    }

    pub fn counts(&self, mode: ViewMode) -> ModeCounts {
        self.items
            .values()
            .filter(|item| item.mode == mode)
            .fold(ModeCounts::default(), |mut counts, item| {
                counts.total += 1;
                if item.completed {
                    counts.completed += 1;
                }
                counts
            })
    }

    /// Creates an open item in `mode` and persists the collection.
    ///
    /// # Errors
    /// - `EmptyInput` when `text` is blank. Nothing is written.
    /// - `Storage` when the write fails. The item is not added.
    /// - `CorruptState` when a stored key leaves no greater key to issue.
    pub fn add(&mut self, text: &str, mode: ViewMode) -> StoreResult<Item> {
        let text = normalize_text(text);
        if text.is_empty() {
            debug!("event=todo_add module=store status=skipped reason=empty_input");
            return Err(StoreError::EmptyInput);
        }

        let Some(key) = self.keys.next_key() else {
            error!(
                "event=todo_add module=store status=error error_code=corrupt_state reason=key_space_exhausted"
            );
            return Err(StoreError::CorruptState {
                storage_key: COLLECTION_STORAGE_KEY,
                message: "no item key sorts after the stored keys".to_string(),
            });
        };
        let item = Item::new(key, text, mode)?;
        let created = item.clone();
        self.apply("todo_add", &created.key, move |items| {
            items.insert(item.key.clone(), item);
            Ok(())
        })?;
        Ok(created)
    }

    /// Removes an item and persists the collection.
    ///
    /// Returns the removed item.
    pub fn delete(&mut self, key: &ItemKey) -> StoreResult<Item> {
        self.apply("todo_delete", key, |items| {
            items
                .remove(key)
                .ok_or_else(|| StoreError::NotFound(key.clone()))
        })
    }

    /// Flips the completed flag and persists the collection.
    pub fn toggle_completed(&mut self, key: &ItemKey) -> StoreResult<Item> {
        self.apply("todo_toggle", key, |items| {
            let item = items
                .get_mut(key)
                .ok_or_else(|| StoreError::NotFound(key.clone()))?;
            item.completed = !item.completed;
            Ok(item.clone())
        })
    }

    /// Replaces item text and persists the collection.
    ///
    /// Completion state and mode are kept.
    ///
    /// # Errors
    /// - `EmptyInput` when `new_text` is blank, checked before lookup.
    /// - `NotFound` when `key` is absent.
    pub fn edit_text(&mut self, key: &ItemKey, new_text: &str) -> StoreResult<Item> {
        let text = normalize_text(new_text);
        if text.is_empty() {
            debug!("event=todo_edit module=store status=skipped reason=empty_input key={key}");
            return Err(StoreError::EmptyInput);
        }

        self.apply("todo_edit", key, move |items| {
            let item = items
                .get_mut(key)
                .ok_or_else(|| StoreError::NotFound(key.clone()))?;
            item.text = text;
            item.validate()?;
            Ok(item.clone())
        })
    }

    fn apply<T>(
        &mut self,
        event: &str,
        key: &ItemKey,
        mutate: impl FnOnce(&mut Collection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut next = self.items.clone();
        let output = match mutate(&mut next) {
            Ok(output) => output,
            Err(err) => {
                debug!(
                    "event={event} module=store status=rejected key={key} error_code={}",
                    err.code()
                );
                return Err(err);
            }
        };

        save_collection(self.storage, &next)?;
        self.items = next;
        info!(
            "event={event} module=store status=ok key={key} count={}",
            self.items.len()
        );
        Ok(output)
    }
}

/// Reads and decodes the persisted collection.
///
/// A missing blob yields an empty collection.
pub fn load_collection<S: KvStore + ?Sized>(storage: &S) -> StoreResult<Collection> {
    let started_at = Instant::now();
    let bytes = match storage.get(COLLECTION_STORAGE_KEY) {
        Ok(bytes) => bytes,
        Err(err) => {
            error!(
                "event=todo_load module=store status=error error_code=storage_io error={err}"
            );
            return Err(err.into());
        }
    };

    let Some(bytes) = bytes else {
        info!("event=todo_load module=store status=ok source=empty count=0");
        return Ok(Collection::new());
    };

    match decode_collection(&bytes) {
        Ok(items) => {
            info!(
                "event=todo_load module=store status=ok source=storage count={} duration_ms={}",
                items.len(),
                started_at.elapsed().as_millis()
            );
            Ok(items)
        }
        Err(err) => {
            error!(
                "event=todo_load module=store status=error error_code=corrupt_state bytes={}",
                bytes.len()
            );
            Err(err)
        }
    }
}

/// Encodes and writes the full collection.
pub fn save_collection<S: KvStore + ?Sized>(storage: &S, items: &Collection) -> StoreResult<()> {
    let bytes = encode_collection(items)?;
    storage.set(COLLECTION_STORAGE_KEY, &bytes).map_err(|err| {
        error!(
            "event=todo_save module=store status=error error_code=storage_io count={} error={err}",
            items.len()
        );
        StoreError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::{ModeCounts, ToDoStore};
    use crate::model::item::ViewMode;
    use crate::storage::MemoryKvStore;

    #[test]
    fn counts_track_totals_per_mode() {
        let storage = MemoryKvStore::new();
        let mut store = ToDoStore::load(&storage).unwrap();
        let first = store.add("email", ViewMode::Work).unwrap();
        store.add("slides", ViewMode::Work).unwrap();
        store.add("passport", ViewMode::Travel).unwrap();
        store.toggle_completed(&first.key).unwrap();

        assert_eq!(
            store.counts(ViewMode::Work),
            ModeCounts {
                total: 2,
                completed: 1
            }
        );
        assert_eq!(
            store.counts(ViewMode::Travel),
            ModeCounts {
                total: 1,
                completed: 0
            }
        );
    }

    #[test]
    fn rejected_mutation_does_not_write() {
        let storage = MemoryKvStore::new();
        let mut store = ToDoStore::load(&storage).unwrap();
        store.add("email", ViewMode::Work).unwrap();
        let writes = storage.write_count();

        assert!(store.add("   ", ViewMode::Work).is_err());
        assert!(store.delete(&"missing".into()).is_err());
        assert_eq!(storage.write_count(), writes);
    }
}
