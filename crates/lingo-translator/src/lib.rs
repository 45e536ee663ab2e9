use serde::{Deserialize, Serialize};

pub mod http;

pub use http::HttpTranslator;
pub use lingo_types::LanguageCode;

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate every text in the request, answering in request order
    async fn translate(&self, request: &TranslateRequest)
    -> Result<TranslateResponse, TranslateError>;

    /// Provider name and per-call limits
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub texts: Vec<String>,
    pub target: LanguageCode,
    pub source: LanguageCode,
}

impl TranslateRequest {
    pub fn new(texts: Vec<String>, source: &str, target: &str) -> Self {
        Self {
            texts,
            target: target.to_string(),
            source: source.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translations: Vec<TranslatedText>,
}

impl TranslateResponse {
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            translations: texts
                .into_iter()
                .map(|text| TranslatedText {
                    translated_text: text.into(),
                })
                .collect(),
        }
    }

    pub fn into_texts(self) -> Vec<String> {
        self.translations
            .into_iter()
            .map(|t| t.translated_text)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedText {
    pub translated_text: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub max_batch_size: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Permission denied by provider (HTTP 403)")]
    Forbidden,
}

impl TranslateError {
    /// Permission failures disable translation for the rest of the process
    pub fn is_fatal(&self) -> bool {
        matches!(self, TranslateError::Forbidden)
    }
}
