use serde::{Deserialize, Serialize};

pub type LanguageCode = String;

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Raw line typed by the user
    TextInput(String),
    /// Translate a single string into the active language
    Translate(String),
    /// Text from a field that is still being edited, debounced
    LiveInput(String),
    /// Translate several strings at once, output keeps input order
    TranslateBatch(Vec<String>),
    SetLanguage(LanguageSelection),
    ResetCache,
    ShowState,
    ShowTranslation {
        text: String,
        from_lang: String,
        to_lang: String,
    },
    ShowBatch {
        texts: Vec<String>,
        to_lang: String,
    },
    Status(String),
    /// Input source is exhausted, finish outstanding work
    EndOfInput,
}

/// Input accepted by `set_language`.
///
/// Hosts pass either a bare code (`"hi"`) or a language record carrying a
/// `code` field (`{"code": "hi", "name": "Hindi"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LanguageSelection {
    Code(String),
    Record {
        code: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl LanguageSelection {
    pub fn raw_code(&self) -> Option<&str> {
        match self {
            LanguageSelection::Code(code) => Some(code.as_str()),
            LanguageSelection::Record { code, .. } => code.as_deref(),
        }
    }
}

impl From<&str> for LanguageSelection {
    fn from(code: &str) -> Self {
        LanguageSelection::Code(code.to_string())
    }
}

impl From<String> for LanguageSelection {
    fn from(code: String) -> Self {
        LanguageSelection::Code(code)
    }
}

/// Broadcast after the language backend confirms a switch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageChanged {
    /// Canonical lowercase code, e.g. `hi`
    pub language: LanguageCode,
    /// Display form, e.g. `HI`
    pub code: String,
}

impl LanguageChanged {
    /// Older listeners only expect the bare language code
    pub fn legacy(&self) -> &str {
        &self.language
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguagePhase {
    Idle,
    ChangeRequested,
}

/// Snapshot of the coordinator's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageState {
    pub current_language: LanguageCode,
    pub current_language_code: String,
    pub is_translating: bool,
    pub phase: LanguagePhase,
    pub requested: Option<LanguageCode>,
}
