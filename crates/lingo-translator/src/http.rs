use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{ProviderMetadata, TranslateError, TranslateRequest, TranslateResponse, Translator};

/// Client for a Google Translate v2 compatible endpoint
#[derive(Clone)]
pub struct HttpTranslator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl HttpTranslator {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            api_url,
        })
    }
}

#[derive(Serialize)]
struct WireRequest<'a> {
    q: &'a [String],
    target: &'a str,
    source: &'a str,
    format: &'static str,
}

// Some deployments wrap the payload in `data`, proxies usually don't.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireResponse {
    Wrapped { data: TranslateResponse },
    Bare(TranslateResponse),
}

impl WireResponse {
    fn into_inner(self) -> TranslateResponse {
        match self {
            WireResponse::Wrapped { data } => data,
            WireResponse::Bare(response) => response,
        }
    }
}

fn decode_body(body: &str, expected: usize) -> Result<TranslateResponse, TranslateError> {
    let response = serde_json::from_str::<WireResponse>(body)
        .map_err(|e| TranslateError::InvalidResponse(format!("Failed to parse response: {}", e)))?
        .into_inner();

    if response.translations.len() != expected {
        return Err(TranslateError::InvalidResponse(format!(
            "expected {} translations, got {}",
            expected,
            response.translations.len()
        )));
    }

    Ok(response)
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        request: &TranslateRequest,
    ) -> Result<TranslateResponse, TranslateError> {
        if request.texts.is_empty() {
            return Ok(TranslateResponse::default());
        }

        let body = WireRequest {
            q: &request.texts,
            target: &request.target,
            source: &request.source,
            format: "text",
        };

        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == 403 {
            return Err(TranslateError::Forbidden);
        }

        if status == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if !status.is_success() {
            return Err(TranslateError::ApiError(format!("HTTP {}", status)));
        }

        let text = response.text().await?;
        tracing::trace!("provider answered {} bytes", text.len());

        decode_body(&text, request.texts.len())
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "google-v2".to_string(),
            max_batch_size: Some(128),
        }
    }
}
