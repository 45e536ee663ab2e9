use std::sync::Arc;

use lingo_config::Config;
use lingo_core::{Debouncer, LanguageBackend, LanguageCoordinator, TranslationEngine};
use lingo_translator::Translator;
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub engine: TranslationEngine,
    pub coordinator: Arc<LanguageCoordinator>,
    pub debouncer: Debouncer,
}

impl AppState {
    pub fn new(
        config: Config,
        client: Arc<dyn Translator>,
        backend: Arc<dyn LanguageBackend>,
    ) -> Self {
        let engine = TranslationEngine::from_config(&config, client);
        let coordinator = Arc::new(LanguageCoordinator::new(
            engine.clone(),
            backend,
            &config.engine.default_language,
        ));
        let debouncer = Debouncer::new(config.engine.debounce_delay());

        Self {
            config: Arc::new(RwLock::new(config)),
            engine,
            coordinator,
            debouncer,
        }
    }
}
