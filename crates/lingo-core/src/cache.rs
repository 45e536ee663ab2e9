use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::key::CacheKey;
use crate::storage::KeyValueStore;

/// Bounded translation cache mirrored into a durable store.
///
/// Entries keep insertion order; once `capacity` is reached the oldest entry
/// is evicted. Every mutation rewrites the whole cache as one JSON blob
/// (`[[key, value], ...]`, oldest first) under `storage_key`.
pub struct TranslationCache {
    state: Mutex<CacheState>,
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
    capacity: usize,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, String>,
    order: VecDeque<CacheKey>,
}

impl CacheState {
    fn evict_to(&mut self, capacity: usize) -> usize {
        let mut evicted = 0;
        while self.order.len() > capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                evicted += 1;
            }
        }
        evicted
    }
}

impl TranslationCache {
    /// Load from the store. Missing or unreadable data yields an empty cache.
    pub fn load(store: Arc<dyn KeyValueStore>, storage_key: &str, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut state = CacheState::default();

        match store.get(storage_key) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<(CacheKey, String)>>(&blob) {
                Ok(pairs) => {
                    for (key, value) in pairs {
                        if state.entries.insert(key.clone(), value).is_none() {
                            state.order.push_back(key);
                        }
                    }
                    state.evict_to(capacity);
                    tracing::debug!("Loaded {} cached translations", state.order.len());
                }
                Err(e) => {
                    tracing::warn!("Discarding corrupt translation cache: {}", e);
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Failed to read translation cache: {}", e);
            }
        }

        Self {
            state: Mutex::new(state),
            store,
            storage_key: storage_key.to_string(),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &CacheKey) -> Option<String> {
        self.lock().entries.get(key).cloned()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// Insert or overwrite, evict past capacity, persist.
    ///
    /// Overwriting keeps the entry's original position in the eviction order.
    pub fn insert(&self, key: CacheKey, value: String) {
        let mut state = self.lock();

        if state.entries.insert(key.clone(), value).is_none() {
            state.order.push_back(key);
        }

        let evicted = state.evict_to(self.capacity);
        if evicted > 0 {
            tracing::trace!("Evicted {} cached translations", evicted);
        }

        self.persist(&state);
    }

    /// Drop every entry and persist the empty cache
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.order.clear();
        self.persist(&state);
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys from oldest to newest
    pub fn keys(&self) -> Vec<CacheKey> {
        self.lock().order.iter().cloned().collect()
    }

    // Called with the state lock held so set + persist is one step.
    fn persist(&self, state: &CacheState) {
        let pairs: Vec<(&CacheKey, &String)> = state
            .order
            .iter()
            .filter_map(|key| state.entries.get(key).map(|value| (key, value)))
            .collect();

        let blob = match serde_json::to_string(&pairs) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!("Failed to serialize translation cache: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.set(&self.storage_key, &blob) {
            tracing::warn!("Failed to persist translation cache: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const KEY: &str = "translation_cache";

    fn key(i: usize) -> CacheKey {
        CacheKey::new(&format!("text-{i}"), "en", "hi")
    }

    #[test]
    fn bound_evicts_single_oldest() {
        let cache = TranslationCache::load(Arc::new(MemoryStore::new()), KEY, 500);

        for i in 0..501 {
            cache.insert(key(i), format!("value-{i}"));
        }

        assert_eq!(cache.len(), 500);
        assert!(!cache.contains(&key(0)));
        assert!(cache.contains(&key(1)));
        assert!(cache.contains(&key(500)));
    }

    #[test]
    fn overwrite_keeps_position() {
        let cache = TranslationCache::load(Arc::new(MemoryStore::new()), KEY, 2);
        cache.insert(key(0), "a".into());
        cache.insert(key(1), "b".into());
        cache.insert(key(0), "a2".into());
        cache.insert(key(2), "c".into());

        assert_eq!(cache.get(&key(0)), None);
        assert_eq!(cache.get(&key(1)).as_deref(), Some("b"));
        assert_eq!(cache.get(&key(2)).as_deref(), Some("c"));
    }

    #[test]
    fn every_insert_is_persisted_in_order() {
        let store = Arc::new(MemoryStore::new());
        let cache = TranslationCache::load(store.clone(), KEY, 10);
        cache.insert(key(0), "zero".into());
        cache.insert(key(1), "one".into());

        let blob = store.get(KEY).unwrap().unwrap();
        assert_eq!(
            blob,
            r#"[["text-0::en::hi","zero"],["text-1::en::hi","one"]]"#
        );

        let reloaded = TranslationCache::load(store, KEY, 10);
        assert_eq!(reloaded.keys(), vec![key(0), key(1)]);
        assert_eq!(reloaded.get(&key(1)).as_deref(), Some("one"));
    }

    #[test]
    fn corrupt_blob_loads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(KEY, "{not json").unwrap();

        let cache = TranslationCache::load(store.clone(), KEY, 10);
        assert!(cache.is_empty());

        cache.insert(key(0), "zero".into());
        assert_eq!(TranslationCache::load(store, KEY, 10).len(), 1);
    }

    #[test]
    fn oversized_blob_keeps_newest() {
        let store = Arc::new(MemoryStore::new());
        let big = TranslationCache::load(store.clone(), KEY, 10);
        for i in 0..10 {
            big.insert(key(i), i.to_string());
        }

        let small = TranslationCache::load(store, KEY, 3);
        assert_eq!(small.keys(), vec![key(7), key(8), key(9)]);
    }

    #[test]
    fn clear_persists_empty_cache() {
        let store = Arc::new(MemoryStore::new());
        let cache = TranslationCache::load(store.clone(), KEY, 10);
        cache.insert(key(0), "zero".into());
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(store.get(KEY).unwrap().as_deref(), Some("[]"));
    }
}
