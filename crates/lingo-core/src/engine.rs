use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use lingo_config::Config;
use lingo_config::engine::EngineConfig;
use lingo_translator::Translator;

use crate::batch::{BatchDispatcher, Lookup};
use crate::breaker::CircuitBreaker;
use crate::cache::TranslationCache;
use crate::inflight::{InFlightRegistry, PendingSlots, PendingTranslation};
use crate::key::{CacheKey, normalize_text, same_language};
use crate::overrides::StaticOverrides;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

const DEFAULT_STORAGE_KEY: &str = "translation_cache";

/// Client-side translation service.
///
/// Cheap to clone; every clone shares one cache, one in-flight registry and
/// one circuit breaker. Failures never surface to callers: whatever goes
/// wrong, the original text comes back.
#[derive(Clone)]
pub struct TranslationEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    overrides: StaticOverrides,
    cache: Arc<TranslationCache>,
    registry: Arc<InFlightRegistry>,
    breaker: Arc<CircuitBreaker>,
    dispatcher: BatchDispatcher,
    source_language: String,
}

/// Where one input position gets its value from
enum Resolution {
    Ready(String),
    Awaiting(PendingTranslation),
}

impl Resolution {
    async fn resolve(self, original: &str) -> String {
        match self {
            Resolution::Ready(value) => value,
            Resolution::Awaiting(pending) => pending.await.unwrap_or_else(|| original.to_string()),
        }
    }
}

pub struct EngineBuilder {
    client: Arc<dyn Translator>,
    store: Option<Arc<dyn KeyValueStore>>,
    overrides: Option<StaticOverrides>,
    storage_key: String,
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn overrides(mut self, overrides: StaticOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn storage_key(mut self, key: &str) -> Self {
        self.storage_key = key.to_string();
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> TranslationEngine {
        let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let cache = Arc::new(TranslationCache::load(
            store,
            &self.storage_key,
            self.config.cache_capacity,
        ));
        let registry = Arc::new(InFlightRegistry::new());
        let breaker = Arc::new(CircuitBreaker::new());
        let dispatcher = BatchDispatcher::new(
            self.client,
            cache.clone(),
            registry.clone(),
            breaker.clone(),
            self.config.chunk_size,
        );

        TranslationEngine {
            inner: Arc::new(EngineInner {
                overrides: self.overrides.unwrap_or_default(),
                cache,
                registry,
                breaker,
                dispatcher,
                source_language: self.config.source_language,
            }),
        }
    }
}

impl TranslationEngine {
    pub fn builder(client: Arc<dyn Translator>) -> EngineBuilder {
        EngineBuilder {
            client,
            store: None,
            overrides: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            config: EngineConfig::default(),
        }
    }

    /// Wire an engine from app config: file store when a cache dir is set,
    /// built-in overrides plus the optional override file.
    pub fn from_config(config: &Config, client: Arc<dyn Translator>) -> Self {
        let store: Arc<dyn KeyValueStore> = match &config.storage.cache_dir {
            Some(dir) => Arc::new(FileStore::new(dir)),
            None => Arc::new(MemoryStore::new()),
        };

        let overrides = match &config.engine.overrides_path {
            Some(path) => StaticOverrides::load_from_file(Path::new(path)).unwrap_or_else(|e| {
                tracing::warn!("Ignoring override file {}: {}", path, e);
                StaticOverrides::with_defaults()
            }),
            None => StaticOverrides::with_defaults(),
        };

        Self::builder(client)
            .store(store)
            .overrides(overrides)
            .storage_key(&config.storage.storage_key)
            .config(config.engine.clone())
            .build()
    }

    /// Default language of source strings
    pub fn source_language(&self) -> &str {
        &self.inner.source_language
    }

    /// Translate from the default source language
    pub async fn translate(&self, text: &str, target: &str) -> String {
        self.translate_one(text, target, &self.inner.source_language)
            .await
    }

    pub async fn translate_one(&self, text: &str, target: &str, source: &str) -> String {
        self.resolve_one(text, target, source).resolve(text).await
    }

    /// Translate many texts. The output has the input's length and order.
    pub async fn translate_many(&self, texts: &[String], target: &str, source: &str) -> Vec<String> {
        let resolutions = self.resolve_many(texts, target, source);

        let mut translated = Vec::with_capacity(texts.len());
        for (resolution, original) in resolutions.into_iter().zip(texts) {
            translated.push(resolution.resolve(original).await);
        }
        translated
    }

    /// Answer from the override table or cache only, never the network
    pub fn translate_sync(&self, text: &str, target: &str, source: &str) -> Option<String> {
        self.known(text, target, source)
    }

    /// Empty the cache (language switch or explicit reset)
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    pub fn reset(&self) {
        tracing::info!("Resetting translation cache");
        self.clear_cache();
    }

    pub fn cache_len(&self) -> usize {
        self.inner.cache.len()
    }

    pub fn pending_len(&self) -> usize {
        self.inner.registry.len()
    }

    /// True once the provider refused access
    pub fn is_disabled(&self) -> bool {
        self.inner.breaker.is_tripped()
    }

    /// Passthrough, override or cache hit
    fn known(&self, text: &str, target: &str, source: &str) -> Option<String> {
        if same_language(source, target) || normalize_text(text).is_empty() {
            return Some(text.to_string());
        }

        if let Some(value) = self.inner.overrides.lookup(text, target) {
            tracing::trace!("Override hit for '{}'", text);
            return Some(value.to_string());
        }

        self.inner.cache.get(&CacheKey::new(text, source, target))
    }

    fn resolve_one(&self, text: &str, target: &str, source: &str) -> Resolution {
        if self.inner.breaker.is_tripped() {
            return Resolution::Ready(text.to_string());
        }

        let mut slots = self.inner.registry.lock();
        match self.classify(&slots, text, target, source) {
            Classified::Ready(value) => Resolution::Ready(value),
            Classified::Awaiting(pending) => Resolution::Awaiting(pending),
            Classified::Missing(lookup) => {
                let mut pending = self
                    .inner
                    .dispatcher
                    .dispatch(&mut slots, vec![lookup], source, target);
                match pending.pop() {
                    Some(pending) => Resolution::Awaiting(pending),
                    None => Resolution::Ready(text.to_string()),
                }
            }
        }
    }

    fn resolve_many(&self, texts: &[String], target: &str, source: &str) -> Vec<Resolution> {
        if self.inner.breaker.is_tripped() {
            return texts.iter().cloned().map(Resolution::Ready).collect();
        }

        enum Planned {
            Ready(String),
            Awaiting(PendingTranslation),
            Fresh(usize),
        }

        let mut slots = self.inner.registry.lock();
        let mut planned = Vec::with_capacity(texts.len());
        let mut fresh: Vec<Lookup> = Vec::new();
        let mut fresh_index: HashMap<CacheKey, usize> = HashMap::new();

        for text in texts {
            match self.classify(&slots, text, target, source) {
                Classified::Ready(value) => planned.push(Planned::Ready(value)),
                Classified::Awaiting(pending) => planned.push(Planned::Awaiting(pending)),
                Classified::Missing(lookup) => {
                    // Repeated texts within one batch share a slot
                    let index = *fresh_index.entry(lookup.key.clone()).or_insert_with(|| {
                        fresh.push(lookup);
                        fresh.len() - 1
                    });
                    planned.push(Planned::Fresh(index));
                }
            }
        }

        let resolved_locally = planned
            .iter()
            .filter(|p| matches!(p, Planned::Ready(_)))
            .count();
        let fresh_count = fresh.len();

        let pending = self
            .inner
            .dispatcher
            .dispatch(&mut slots, fresh, source, target);
        drop(slots);

        tracing::debug!(
            "Batch of {}: {} resolved locally, {} sent in {} chunks",
            texts.len(),
            resolved_locally,
            fresh_count,
            fresh_count.div_ceil(self.inner.dispatcher.chunk_size())
        );

        planned
            .into_iter()
            .zip(texts)
            .map(|(plan, original)| match plan {
                Planned::Ready(value) => Resolution::Ready(value),
                Planned::Awaiting(pending) => Resolution::Awaiting(pending),
                Planned::Fresh(index) => match pending.get(index) {
                    Some(pending) => Resolution::Awaiting(pending.clone()),
                    None => Resolution::Ready(original.clone()),
                },
            })
            .collect()
    }

    // Must run with the registry locked: a settled task writes the cache
    // before releasing its key, so a miss here plus no pending entry means
    // nobody is fetching this key.
    fn classify(
        &self,
        slots: &PendingSlots<'_>,
        text: &str,
        target: &str,
        source: &str,
    ) -> Classified {
        if let Some(value) = self.known(text, target, source) {
            return Classified::Ready(value);
        }

        let key = CacheKey::new(text, source, target);
        if let Some(pending) = slots.get(&key) {
            tracing::trace!("Joining in-flight request for '{}'", key);
            return Classified::Awaiting(pending);
        }

        Classified::Missing(Lookup {
            key,
            text: normalize_text(text).to_string(),
        })
    }
}

enum Classified {
    Ready(String),
    Awaiting(PendingTranslation),
    Missing(Lookup),
}
