use std::sync::{Arc, PoisonError, RwLock};

use kanal::{AsyncReceiver, AsyncSender};
use lingo_types::{LanguageChanged, LanguageCode, LanguagePhase, LanguageSelection, LanguageState};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::engine::TranslationEngine;

/// A display language the directory supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub display_code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    Language { code: "en", display_code: "EN", name: "English", native_name: "English" },
    Language { code: "hi", display_code: "HI", name: "Hindi", native_name: "हिन्दी" },
    Language { code: "mr", display_code: "MR", name: "Marathi", native_name: "मराठी" },
    Language { code: "gu", display_code: "GU", name: "Gujarati", native_name: "ગુજરાતી" },
    Language { code: "bn", display_code: "BN", name: "Bengali", native_name: "বাংলা" },
    Language { code: "ta", display_code: "TA", name: "Tamil", native_name: "தமிழ்" },
    Language { code: "te", display_code: "TE", name: "Telugu", native_name: "తెలుగు" },
    Language { code: "kn", display_code: "KN", name: "Kannada", native_name: "ಕನ್ನಡ" },
    Language { code: "ml", display_code: "ML", name: "Malayalam", native_name: "മലയാളം" },
    Language { code: "pa", display_code: "PA", name: "Punjabi", native_name: "ਪੰਜਾਬੀ" },
];

pub fn find_language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

/// Canonical form of a raw code: trimmed, lowercase, region dropped
/// (`hi-IN` -> `hi`). `None` unless it names a supported language.
pub fn normalize_code(raw: &str) -> Option<LanguageCode> {
    let primary = raw.trim().split(['-', '_']).next()?.to_lowercase();
    find_language(&primary).map(|l| l.code.to_string())
}

/// Display form of a canonical code
pub fn display_code(code: &str) -> String {
    find_language(code)
        .map(|l| l.display_code.to_string())
        .unwrap_or_else(|| code.to_uppercase())
}

/// The external i18n engine that performs the actual switch.
///
/// It reports back asynchronously; the coordinator only commits the change
/// once `confirm_change` is called.
pub trait LanguageBackend: Send + Sync {
    fn request_change(&self, code: &str);
}

/// Backend that confirms every request through a channel
pub struct LoopbackBackend {
    tx: AsyncSender<LanguageCode>,
}

impl LoopbackBackend {
    pub fn new() -> (Self, AsyncReceiver<LanguageCode>) {
        let (tx, rx) = kanal::unbounded_async();
        (Self { tx }, rx)
    }
}

impl LanguageBackend for LoopbackBackend {
    fn request_change(&self, code: &str) {
        if let Err(e) = self.tx.try_send(code.to_string()) {
            tracing::warn!("Language backend channel closed: {}", e);
        }
    }
}

/// Single source of truth for the active display language
pub struct LanguageCoordinator {
    state: RwLock<LanguageState>,
    backend: Arc<dyn LanguageBackend>,
    engine: TranslationEngine,
    events: broadcast::Sender<LanguageChanged>,
    default_language: LanguageCode,
}

impl LanguageCoordinator {
    pub fn new(
        engine: TranslationEngine,
        backend: Arc<dyn LanguageBackend>,
        default_language: &str,
    ) -> Self {
        let default_language = normalize_code(default_language).unwrap_or_else(|| "en".to_string());
        let (events, _) = broadcast::channel(16);

        Self {
            state: RwLock::new(LanguageState {
                current_language_code: display_code(&default_language),
                current_language: default_language.clone(),
                is_translating: false,
                phase: LanguagePhase::Idle,
                requested: None,
            }),
            backend,
            engine,
            events,
            default_language,
        }
    }

    pub fn state(&self) -> LanguageState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn current_language(&self) -> LanguageCode {
        self.state().current_language
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LanguageChanged> {
        self.events.subscribe()
    }

    /// Ask the backend to switch. Malformed or unsupported input falls back
    /// to the default language. Returns the canonical code requested.
    pub fn set_language(&self, selection: impl Into<LanguageSelection>) -> LanguageCode {
        let selection = selection.into();
        let code = self.canonical(selection.raw_code());

        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.phase = LanguagePhase::ChangeRequested;
            state.requested = Some(code.clone());
            state.is_translating = true;
        }

        tracing::info!("Language change requested: {}", code);
        self.backend.request_change(&code);
        code
    }

    /// Commit a switch the backend confirmed: update state, invalidate the
    /// cache, notify listeners.
    ///
    /// A confirmation for an older request applies that language but leaves
    /// the newer request outstanding.
    pub fn confirm_change(&self, confirmed: &str) -> LanguageChanged {
        let language = self.canonical(Some(confirmed));
        let changed = LanguageChanged {
            code: display_code(&language),
            language,
        };

        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.current_language = changed.language.clone();
            state.current_language_code = changed.code.clone();

            let superseded = matches!(&state.requested, Some(requested) if *requested != changed.language);
            if superseded {
                tracing::debug!(
                    "Confirmed {} while {:?} is still pending",
                    changed.language,
                    state.requested
                );
            } else {
                state.phase = LanguagePhase::Idle;
                state.requested = None;
                state.is_translating = false;
            }
        }

        tracing::info!("Language applied: {} ({})", changed.language, changed.code);

        // Listeners re-render on the event, so the cache must already be empty
        self.engine.clear_cache();

        // No subscribers is fine
        let _ = self.events.send(changed.clone());
        changed
    }

    /// Apply confirmations from the backend until cancelled or the channel closes
    pub async fn run_confirmations(
        self: Arc<Self>,
        confirmations: AsyncReceiver<LanguageCode>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Language coordinator stopping");
                    break;
                }
                received = confirmations.recv() => match received {
                    Ok(code) => {
                        self.confirm_change(&code);
                    }
                    Err(e) => {
                        tracing::warn!("Language confirmations closed: {}", e);
                        break;
                    }
                }
            }
        }
    }

    fn canonical(&self, raw: Option<&str>) -> LanguageCode {
        match raw.and_then(normalize_code) {
            Some(code) => code,
            None => {
                tracing::warn!(
                    "Unrecognized language {:?}, using {}",
                    raw,
                    self.default_language
                );
                self.default_language.clone()
            }
        }
    }
}
