//! Core domain logic for the work/travel to-do app.
//! This crate is the single source of truth for list state and persistence.

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{Collection, Item, ItemKey, ItemValidationError, ViewMode};
pub use model::key::KeyGenerator;
pub use service::todo_service::TodoService;
pub use storage::{FileKvStore, KvError, KvResult, KvStore, MemoryKvStore, SqliteKvStore};
pub use store::todo_store::{load_collection, save_collection, ModeCounts, ToDoStore};
pub use store::view_mode_store::ViewModeStore;
pub use store::{StoreError, StoreResult, COLLECTION_STORAGE_KEY, MODE_STORAGE_KEY};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
