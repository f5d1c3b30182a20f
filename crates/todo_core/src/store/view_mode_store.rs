//! Persisted work/travel view-mode flag.
//!
//! # Invariants
//! - A missing or unreadable flag value resolves to `ViewMode::Work`.
//! - `set` persists before returning; there is no cached copy to go stale.

use super::codec::{decode_mode, encode_mode};
use super::{StoreResult, MODE_STORAGE_KEY};
use crate::model::item::ViewMode;
use crate::storage::KvStore;
use log::{info, warn};

/// View-mode flag bound to a storage backend.
pub struct ViewModeStore<'s, S: KvStore + ?Sized> {
    storage: &'s S,
}

impl<'s, S: KvStore + ?Sized> ViewModeStore<'s, S> {
    pub fn new(storage: &'s S) -> Self {
        Self { storage }
    }

    /// Reads the persisted mode.
    ///
    /// # Errors
    /// - `Storage` when the backend read fails. Undecodable values are not an
    ///   error and fall back to `Work`.
    pub fn load(&self) -> StoreResult<ViewMode> {
        let Some(bytes) = self.storage.get(MODE_STORAGE_KEY)? else {
            return Ok(ViewMode::default());
        };

        match decode_mode(&bytes) {
            Some(mode) => Ok(mode),
            None => {
                warn!(
                    "event=view_mode_load module=store status=fallback reason=unparseable bytes={}",
                    bytes.len()
                );
                Ok(ViewMode::default())
            }
        }
    }

    /// Persists `mode`.
    pub fn set(&self, mode: ViewMode) -> StoreResult<()> {
        let bytes = encode_mode(mode)?;
        self.storage.set(MODE_STORAGE_KEY, &bytes)?;
        info!("event=view_mode_set module=store status=ok mode={mode}");
        Ok(())
    }

    /// Switches to the other mode and returns it.
    pub fn toggle(&self) -> StoreResult<ViewMode> {
        let next = self.load()?.toggled();
        self.set(next)?;
        Ok(next)
    }
}
