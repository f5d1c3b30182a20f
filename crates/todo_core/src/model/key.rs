//! Item key generation.
//!
//! # Responsibility
//! - Produce unique item keys even for several adds within one millisecond.
//! - Keep key order equal to creation order.
//!
//! # Invariants
//! - Every key issued by one generator is strictly greater than the previous.
//! - A generator seeded from a collection never issues a key that is already
//!   present in it.

use super::item::ItemKey;
use std::time::{SystemTime, UNIX_EPOCH};

const SEQUENCE_MAX: u32 = 999_999;

/// Monotonic `{millis:013}-{sequence:06}` key source.
#[derive(Debug, Clone, Default)]
pub struct KeyGenerator {
    last_millis: u64,
    last_sequence: u32,
}

impl KeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the generator so that new keys sort after `existing`.
    pub fn seeded_from<'a>(existing: impl IntoIterator<Item = &'a ItemKey>) -> Self {
        let mut generator = Self::new();
        generator.observe(existing);
        generator
    }

    /// Advances past every key in `keys`; never moves the generator back.
    ///
    /// Keys that do not follow the generated format are ignored, except that a
    /// bare timestamp key still advances the clock.
    pub fn observe<'a>(&mut self, keys: impl IntoIterator<Item = &'a ItemKey>) {
        for key in keys {
            if let Some(position) = key.position() {
                if position > (self.last_millis, self.last_sequence) {
                    (self.last_millis, self.last_sequence) = position;
                }
            }
        }
    }

    /// Issues a key using the system clock.
    pub fn next_key(&mut self) -> Option<ItemKey> {
        self.next_key_at(now_millis())
    }

    /// Issues a key for the given clock reading.
    ///
    /// When `now_millis` does not advance past the last issued key, the last
    /// millisecond is reused with the next sequence number. Returns `None`
    /// once no greater key exists (observed `u64::MAX` millis with an
    /// exhausted sequence); the generator state is left unchanged.
    pub fn next_key_at(&mut self, now_millis: u64) -> Option<ItemKey> {
        let (millis, sequence) = if now_millis > self.last_millis {
            (now_millis, 0)
        } else if self.last_sequence >= SEQUENCE_MAX {
            (self.last_millis.checked_add(1)?, 0)
        } else {
            (self.last_millis, self.last_sequence + 1)
        };
        self.last_millis = millis;
        self.last_sequence = sequence;
        Some(ItemKey::new(format!("{millis:013}-{sequence:06}")))
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
