use lingo_translator::{
    ProviderMetadata, TranslateError, TranslateRequest, TranslateResponse, Translator,
};

/// Stand-in provider when no API key is configured.
///
/// Every call fails with a non-fatal error, so only override hits are
/// translated and everything else passes through unchanged.
pub struct OfflineTranslator;

#[async_trait::async_trait]
impl Translator for OfflineTranslator {
    async fn translate(
        &self,
        _request: &TranslateRequest,
    ) -> Result<TranslateResponse, TranslateError> {
        Err(TranslateError::ApiError("no API key configured".to_string()))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "offline".to_string(),
            max_batch_size: None,
        }
    }
}
