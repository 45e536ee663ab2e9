use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::future::{BoxFuture, Shared};

use crate::key::CacheKey;

/// Shared handle to a remote lookup. Resolves to `None` when the lookup failed.
pub type PendingTranslation = Shared<BoxFuture<'static, Option<String>>>;

/// Tracks the one in-flight remote request allowed per key
#[derive(Default)]
pub struct InFlightRegistry {
    pending: Mutex<HashMap<CacheKey, PendingTranslation>>,
}

/// Exclusive view of the registry.
///
/// Callers hold it across check-then-register so two tasks can't both decide
/// to dispatch the same key.
pub struct PendingSlots<'a> {
    pending: MutexGuard<'a, HashMap<CacheKey, PendingTranslation>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> PendingSlots<'_> {
        PendingSlots {
            pending: self.pending.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Forget settled keys
    pub fn release(&self, keys: &[CacheKey]) {
        let mut slots = self.lock();
        for key in keys {
            slots.pending.remove(key);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PendingSlots<'_> {
    pub fn get(&self, key: &CacheKey) -> Option<PendingTranslation> {
        self.pending.get(key).cloned()
    }

    pub fn register(&mut self, key: CacheKey, pending: PendingTranslation) {
        self.pending.insert(key, pending);
    }
}

#[cfg(test)]
mod tests {
    use futures_util::FutureExt;

    use super::*;

    #[tokio::test]
    async fn registered_future_is_shared() {
        let registry = InFlightRegistry::new();
        let key = CacheKey::new("Hello", "en", "hi");

        {
            let mut slots = registry.lock();
            assert!(slots.get(&key).is_none());
            let pending = async { Some("नमस्ते".to_string()) }.boxed().shared();
            slots.register(key.clone(), pending);
        }

        let first = registry.lock().get(&key).unwrap();
        let second = registry.lock().get(&key).unwrap();
        assert_eq!(first.await.as_deref(), Some("नमस्ते"));
        assert_eq!(second.await.as_deref(), Some("नमस्ते"));

        registry.release(&[key.clone()]);
        assert!(registry.is_empty());
    }
}
