//! Delayed removal of key shares
//!
//! Each write made with a non-zero TTL spawns one task that sleeps for the
//! TTL and then applies the configured [`ExpiryPolicy`]. Scheduled expiries
//! cannot be cancelled and are not extended by reads.

use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use tokio::task::JoinHandle;
use tracing::debug;

use super::store::KeyShareStore;

/// What an expiry deletes when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExpiryPolicy {
    /// Delete whatever is stored under the name, even if it was rewritten
    /// after the expiry was scheduled.
    #[default]
    Unconditional,
    /// Delete only the record written by the request that scheduled the
    /// expiry. Rewrites keep their own, later expiry.
    LatestWrite,
}

impl ExpiryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unconditional => "unconditional",
            Self::LatestWrite => "latest-write",
        }
    }

    /// Remove `name` from the store according to this policy.
    ///
    /// Returns whether a share was removed. Firing against an absent name
    /// is a no-op.
    pub fn apply(self, store: &KeyShareStore, name: &str, generation: u64) -> bool {
        match self {
            Self::Unconditional => store.delete(name),
            Self::LatestWrite => store.delete_if_generation(name, generation),
        }
    }
}

/// Spawn a task that expires `name` after `ttl`
///
/// The handle resolves to whether the share was removed. Callers are free
/// to drop it; the task runs to completion regardless.
pub fn schedule_expiry(
    store: Arc<KeyShareStore>,
    name: String,
    generation: u64,
    ttl: Duration,
    policy: ExpiryPolicy,
) -> JoinHandle<bool> {
    tokio::spawn(async move {
        tokio::time::sleep(ttl).await;
        let removed = policy.apply(&store, &name, generation);
        debug!(
            "Key share expiry fired for {:?} (generation {}, policy {}, removed={})",
            name,
            generation,
            policy.as_str(),
            removed
        );
        removed
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyshare::KeyShare;

    fn named(name: &str) -> KeyShare {
        KeyShare {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unconditional_removes_newer_write() {
        let store = KeyShareStore::new();
        let stale = store.put("Alice", named("Alice"));
        store.put("Alice", named("Alice"));

        assert!(ExpiryPolicy::Unconditional.apply(&store, "Alice", stale));
        assert!(store.get("Alice").is_none());
    }

    #[test]
    fn test_latest_write_keeps_newer_write() {
        let store = KeyShareStore::new();
        let stale = store.put("Alice", named("Alice"));
        let current = store.put("Alice", named("Alice"));

        assert!(!ExpiryPolicy::LatestWrite.apply(&store, "Alice", stale));
        assert!(store.get("Alice").is_some());
        assert!(ExpiryPolicy::LatestWrite.apply(&store, "Alice", current));
        assert!(store.get("Alice").is_none());
    }

    #[test]
    fn test_apply_to_absent_name_is_noop() {
        let store = KeyShareStore::new();
        assert!(!ExpiryPolicy::Unconditional.apply(&store, "Alice", 1));
        assert!(!ExpiryPolicy::LatestWrite.apply(&store, "Alice", 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_expiry_fires_after_ttl() {
        let store = Arc::new(KeyShareStore::new());
        let generation = store.put("Alice", named("Alice"));

        let handle = schedule_expiry(
            Arc::clone(&store),
            "Alice".to_string(),
            generation,
            Duration::from_secs(1),
            ExpiryPolicy::Unconditional,
        );

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(store.get("Alice").is_some());

        assert!(handle.await.unwrap());
        assert!(store.get("Alice").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_after_manual_delete_is_harmless() {
        let store = Arc::new(KeyShareStore::new());
        let generation = store.put("Alice", named("Alice"));

        let handle = schedule_expiry(
            Arc::clone(&store),
            "Alice".to_string(),
            generation,
            Duration::from_secs(1),
            ExpiryPolicy::Unconditional,
        );
        store.delete("Alice");

        assert!(!handle.await.unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_policy_names() {
        assert_eq!(ExpiryPolicy::default(), ExpiryPolicy::Unconditional);
        assert_eq!(
            ExpiryPolicy::from_str("latest-write", false),
            Ok(ExpiryPolicy::LatestWrite)
        );
        assert_eq!(ExpiryPolicy::LatestWrite.as_str(), "latest-write");
    }
}
