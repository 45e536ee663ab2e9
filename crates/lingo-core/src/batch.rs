use std::sync::Arc;

use futures_util::FutureExt;
use lingo_translator::{TranslateRequest, Translator};

use crate::breaker::CircuitBreaker;
use crate::cache::TranslationCache;
use crate::inflight::{InFlightRegistry, PendingSlots, PendingTranslation};
use crate::key::CacheKey;

/// Per-position results of one remote call, `None` where it failed
type ChunkOutcome = Arc<Vec<Option<String>>>;

/// A text that needs a remote lookup
#[derive(Debug, Clone)]
pub struct Lookup {
    pub key: CacheKey,
    pub text: String,
}

/// Turns cache misses into chunked provider calls.
///
/// Each chunk runs as its own spawned task, so a caller dropping its future
/// doesn't stop the call or the cache write that follows.
#[derive(Clone)]
pub struct BatchDispatcher {
    client: Arc<dyn Translator>,
    cache: Arc<TranslationCache>,
    registry: Arc<InFlightRegistry>,
    breaker: Arc<CircuitBreaker>,
    chunk_size: usize,
}

impl BatchDispatcher {
    pub fn new(
        client: Arc<dyn Translator>,
        cache: Arc<TranslationCache>,
        registry: Arc<InFlightRegistry>,
        breaker: Arc<CircuitBreaker>,
        chunk_size: usize,
    ) -> Self {
        let metadata = client.metadata();
        // Never send more per call than the provider accepts
        let chunk_size = match metadata.max_batch_size {
            Some(limit) if limit < chunk_size => {
                tracing::info!(
                    "Capping chunk size {} to {} for provider {}",
                    chunk_size,
                    limit,
                    metadata.name
                );
                limit
            }
            _ => chunk_size,
        };

        Self {
            client,
            cache,
            registry,
            breaker,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Spawn one provider call per chunk and register every key in `slots`.
    ///
    /// Returns the pending results in `lookups` order.
    pub fn dispatch(
        &self,
        slots: &mut PendingSlots<'_>,
        lookups: Vec<Lookup>,
        source: &str,
        target: &str,
    ) -> Vec<PendingTranslation> {
        let mut pending = Vec::with_capacity(lookups.len());

        for chunk in lookups.chunks(self.chunk_size) {
            let keys: Vec<CacheKey> = chunk.iter().map(|l| l.key.clone()).collect();
            let texts: Vec<String> = chunk.iter().map(|l| l.text.clone()).collect();
            let request = TranslateRequest::new(texts, source, target);

            let handle = tokio::spawn(self.clone().run_chunk(keys.clone(), request));
            let outcome = async move {
                match handle.await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        tracing::warn!("Translation task failed: {}", e);
                        Arc::new(Vec::new())
                    }
                }
            }
            .boxed()
            .shared();

            for (index, key) in keys.into_iter().enumerate() {
                let item = outcome
                    .clone()
                    .map(move |outcome: ChunkOutcome| outcome.get(index).cloned().flatten())
                    .boxed()
                    .shared();
                slots.register(key, item.clone());
                pending.push(item);
            }
        }

        pending
    }

    async fn run_chunk(self, keys: Vec<CacheKey>, request: TranslateRequest) -> ChunkOutcome {
        // Cache writes below happen before the keys leave the registry
        let _release = ReleaseOnDrop {
            registry: &self.registry,
            keys: &keys,
        };
        let count = keys.len();

        if self.breaker.is_tripped() {
            return Arc::new(vec![None; count]);
        }

        tracing::debug!(
            "Requesting {} translations {} -> {}",
            count,
            request.source,
            request.target
        );

        let outcome = match self.client.translate(&request).await {
            Ok(response) if response.translations.len() == count => response
                .into_texts()
                .into_iter()
                .zip(&keys)
                .map(|(translated, key)| {
                    if translated.trim().is_empty() {
                        return None;
                    }
                    self.cache.insert(key.clone(), translated.clone());
                    Some(translated)
                })
                .collect(),
            Ok(response) => {
                tracing::warn!(
                    "Provider returned {} translations for {} texts",
                    response.translations.len(),
                    count
                );
                vec![None; count]
            }
            Err(e) => {
                if self.breaker.record(&e) {
                    tracing::error!("Translation disabled for this session: {}", e);
                } else if !e.is_fatal() {
                    tracing::warn!("Translation of {} texts failed: {}", count, e);
                }
                vec![None; count]
            }
        };

        Arc::new(outcome)
    }
}

struct ReleaseOnDrop<'a> {
    registry: &'a InFlightRegistry,
    keys: &'a [CacheKey],
}

impl Drop for ReleaseOnDrop<'_> {
    fn drop(&mut self) {
        self.registry.release(self.keys);
    }
}
