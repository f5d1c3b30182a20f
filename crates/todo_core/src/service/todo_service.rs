//! To-do screen use-case service.
//!
//! # Responsibility
//! - Combine the item store and the view-mode flag into screen-level calls.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # Invariants
//! - The cached mode always equals the last successfully persisted mode.
//! - New items are always created in the currently selected mode.

use crate::model::item::{Collection, Item, ItemKey, ViewMode};
use crate::storage::KvStore;
use crate::store::todo_store::{ModeCounts, ToDoStore};
use crate::store::view_mode_store::ViewModeStore;
use crate::store::StoreResult;

/// Use-case wrapper for the work/travel to-do screen.
pub struct TodoService<'s, S: KvStore + ?Sized> {
    todos: ToDoStore<'s, S>,
    modes: ViewModeStore<'s, S>,
    mode: ViewMode,
}

impl<'s, S: KvStore + ?Sized> TodoService<'s, S> {
    /// Loads the collection and the selected mode from `storage`.
    pub fn open(storage: &'s S) -> StoreResult<Self> {
        let todos = ToDoStore::load(storage)?;
        let modes = ViewModeStore::new(storage);
        let mode = modes.load()?;
        Ok(Self { todos, modes, mode })
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Selects `mode` and persists the choice.
    pub fn switch_mode(&mut self, mode: ViewMode) -> StoreResult<ViewMode> {
        self.modes.set(mode)?;
        self.mode = mode;
        Ok(mode)
    }

    pub fn toggle_mode(&mut self) -> StoreResult<ViewMode> {
        self.switch_mode(self.mode.toggled())
    }

    /// Items of the selected list, oldest first.
    pub fn visible_items(&self) -> Vec<&Item> {
        self.todos.list_by_mode(self.mode)
    }

    pub fn items(&self, mode: ViewMode) -> Vec<&Item> {
        self.todos.list_by_mode(mode)
    }

    pub fn collection(&self) -> &Collection {
        self.todos.collection()
    }

    pub fn counts(&self, mode: ViewMode) -> ModeCounts {
        self.todos.counts(mode)
    }

    /// Adds an item to the selected list.
    pub fn add(&mut self, text: &str) -> StoreResult<Item> {
        self.todos.add(text, self.mode)
    }

    pub fn add_to(&mut self, text: &str, mode: ViewMode) -> StoreResult<Item> {
        self.todos.add(text, mode)
    }

    pub fn toggle_completed(&mut self, key: &ItemKey) -> StoreResult<Item> {
        self.todos.toggle_completed(key)
    }

    pub fn edit_text(&mut self, key: &ItemKey, text: &str) -> StoreResult<Item> {
        self.todos.edit_text(key, text)
    }

    /// Deletes unconditionally; confirmation is the caller's job.
    pub fn delete(&mut self, key: &ItemKey) -> StoreResult<Item> {
        self.todos.delete(key)
    }

    pub fn reload(&mut self) -> StoreResult<()> {
        self.todos.reload()?;
        self.mode = self.modes.load()?;
        Ok(())
    }
}
