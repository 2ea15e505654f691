use crate::error::StoreResult;

/// Key-value medium that survives across sessions.
///
/// All implementations must satisfy these invariants:
/// - `get` after a successful `set` returns exactly the blob that was set.
/// - `get` after a successful `remove` returns `Ok(None)`.
/// - Every call either completes or fails before returning; there is no
///   deferred flush.
/// - The store never interprets blob contents.
pub trait DurableStore: Send + Sync {
    /// Read the blob stored under `key`.
    ///
    /// Returns `Ok(None)` if the key is absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Create or replace the blob stored under `key`.
    fn set(&self, key: &str, blob: &str) -> StoreResult<()>;

    /// Remove `key`. Returns `true` if it was present.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// Check whether `key` is present.
    ///
    /// Default implementation reads the blob. Backends may override with a
    /// cheaper check.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: DurableStore + ?Sized> DurableStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, blob: &str) -> StoreResult<()> {
        (**self).set(key, blob)
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        (**self).remove(key)
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        (**self).contains(key)
    }
}

impl<S: DurableStore + ?Sized> DurableStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, blob: &str) -> StoreResult<()> {
        (**self).set(key, blob)
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        (**self).remove(key)
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        (**self).contains(key)
    }
}
