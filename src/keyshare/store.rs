//! Key share storage
//!
//! In-memory, process-lifetime storage for key shares indexed by name.
//! Every write is stamped with a generation so delayed expiry can tell
//! whether the record it was scheduled for has since been replaced.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::debug;
use zeroize::Zeroize;

use super::types::KeyShare;

/// Stored share with the generation of the write that produced it
struct StoredShare {
    share: KeyShare,
    generation: u64,
}

impl Drop for StoredShare {
    fn drop(&mut self) {
        // Clear key material on overwrite, delete and expiry alike
        self.share.zeroize();
    }
}

/// Key share store with concurrent access
pub struct KeyShareStore {
    shares: DashMap<String, StoredShare>,
    next_generation: AtomicU64,
}

impl KeyShareStore {
    pub fn new() -> Self {
        Self {
            shares: DashMap::new(),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Store a share under `name`, replacing any previous share of that name.
    ///
    /// Returns the generation assigned to this write.
    pub fn put(&self, name: &str, share: KeyShare) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let replaced = self
            .shares
            .insert(name.to_string(), StoredShare { share, generation })
            .is_some();

        debug!(
            "Key share store: put {:?} (generation {}, replaced={}), count={}",
            name,
            generation,
            replaced,
            self.shares.len()
        );

        generation
    }

    /// Look up a share without removing it
    pub fn get(&self, name: &str) -> Option<KeyShare> {
        self.shares.get(name).map(|entry| entry.share.clone())
    }

    /// Generation of the share currently stored under `name`
    pub fn generation(&self, name: &str) -> Option<u64> {
        self.shares.get(name).map(|entry| entry.generation)
    }

    /// Remove a share. Removing an absent name is a no-op.
    ///
    /// Returns whether a share was removed.
    pub fn delete(&self, name: &str) -> bool {
        let removed = self.shares.remove(name).is_some();
        if removed {
            debug!("Key share store: deleted {:?}, count={}", name, self.shares.len());
        }
        removed
    }

    /// Remove a share only if it is still the one written at `generation`
    pub fn delete_if_generation(&self, name: &str, generation: u64) -> bool {
        let removed = self
            .shares
            .remove_if(name, |_, entry| entry.generation == generation)
            .is_some();
        if removed {
            debug!(
                "Key share store: deleted {:?} at generation {}, count={}",
                name,
                generation,
                self.shares.len()
            );
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

impl Default for KeyShareStore {
    fn default() -> Self {
        Self::new()
    }
}
