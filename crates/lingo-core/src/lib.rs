pub mod batch;
pub mod breaker;
pub mod cache;
pub mod debounce;
pub mod engine;
pub mod inflight;
pub mod key;
pub mod language;
pub mod overrides;
pub mod storage;

#[cfg(test)]
mod tests;

pub use debounce::Debouncer;
pub use engine::{EngineBuilder, TranslationEngine};
pub use key::CacheKey;
pub use language::{LanguageBackend, LanguageCoordinator, LoopbackBackend};
pub use overrides::StaticOverrides;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
