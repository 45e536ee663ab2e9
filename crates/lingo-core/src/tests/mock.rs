use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lingo_translator::{
    ProviderMetadata, TranslateError, TranslateRequest, TranslateResponse, Translator,
};
use tokio::sync::Semaphore;

use crate::engine::TranslationEngine;
use crate::overrides::StaticOverrides;

#[derive(Debug, Clone, Copy)]
pub enum MockFailure {
    Forbidden,
    Transient,
    /// Answers with no translations at all
    Short,
}

/// Scripted provider: known texts map through `dictionary`, anything else
/// becomes `"<target>:<text>"`.
pub struct MockTranslator {
    dictionary: HashMap<String, String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<TranslateRequest>>,
    scripted: Mutex<VecDeque<MockFailure>>,
    poisoned: Mutex<HashSet<String>>,
    gate: Option<Arc<Semaphore>>,
    max_batch_size: Option<usize>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::with_entries(&[])
    }

    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        Self {
            dictionary: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            scripted: Mutex::new(VecDeque::new()),
            poisoned: Mutex::new(HashSet::new()),
            gate: None,
            max_batch_size: None,
        }
    }

    /// Every call waits for one permit on the returned semaphore
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    /// Advertise a per-call limit through `metadata()`
    pub fn with_max_batch_size(mut self, limit: usize) -> Self {
        self.max_batch_size = Some(limit);
        self
    }

    pub fn fail_next(&self, failure: MockFailure) {
        self.scripted.lock().unwrap().push_back(failure);
    }

    /// Any call containing `text` fails transiently
    pub fn poison(&self, text: &str) {
        self.poisoned.lock().unwrap().insert(text.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<TranslateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        request: &TranslateRequest,
    ) -> Result<TranslateResponse, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let scripted = self.scripted.lock().unwrap().pop_front();
        match scripted {
            Some(MockFailure::Forbidden) => return Err(TranslateError::Forbidden),
            Some(MockFailure::Transient) => {
                return Err(TranslateError::ApiError("HTTP 503".to_string()));
            }
            Some(MockFailure::Short) => return Ok(TranslateResponse::default()),
            None => {}
        }

        let poisoned = {
            let poisoned = self.poisoned.lock().unwrap();
            request.texts.iter().any(|t| poisoned.contains(t))
        };
        if poisoned {
            return Err(TranslateError::ApiError("HTTP 500".to_string()));
        }

        Ok(TranslateResponse::from_texts(request.texts.iter().map(
            |text| match self.dictionary.get(text) {
                Some(translated) => translated.clone(),
                None => format!("{}:{}", request.target, text),
            },
        )))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "mock".to_string(),
            max_batch_size: self.max_batch_size,
        }
    }
}

pub fn engine_with(mock: &Arc<MockTranslator>) -> TranslationEngine {
    TranslationEngine::builder(mock.clone())
        .overrides(StaticOverrides::new())
        .build()
}

pub fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Poll `condition` until it holds, failing the test after two seconds
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("condition never held");
}
