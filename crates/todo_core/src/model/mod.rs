//! Domain model for the work/travel to-do lists.
//!
//! # Responsibility
//! - Define the item record, its key type and the view-mode flag.
//! - Generate collision-free, creation-ordered item keys.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemKey`.
//! - Deletion is a hard delete; there is no tombstone or recovery.

pub mod item;
pub mod key;
