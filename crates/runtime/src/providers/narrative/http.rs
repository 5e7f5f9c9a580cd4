//! HTTP narrative client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{NarrativeError, NarrativeLine, NarrativeRequest, Tone};
use crate::api::NarrativeProvider;

/// Response body expected from the narrative endpoint.
#[derive(Debug, Deserialize)]
struct NarrativeResponse {
    text: String,
    #[serde(default)]
    tone: Tone,
    #[serde(default = "default_success")]
    success: bool,
}

fn default_success() -> bool {
    true
}

/// Posts [`NarrativeRequest`] as JSON to a configured endpoint.
///
/// The client sets no timeout of its own; the coordinator bounds every call.
pub struct HttpNarrativeProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpNarrativeProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    /// Sends the key as a bearer token on every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl NarrativeProvider for HttpNarrativeProvider {
    async fn generate(&self, request: &NarrativeRequest) -> Result<NarrativeLine, NarrativeError> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| NarrativeError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NarrativeError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let body: NarrativeResponse = response
            .json()
            .await
            .map_err(|e| NarrativeError::Decode(e.to_string()))?;

        if !body.success {
            return Err(NarrativeError::Rejected);
        }
        let text = body.text.trim();
        if text.is_empty() {
            return Err(NarrativeError::EmptyText);
        }
        Ok(NarrativeLine::generated(text, body.tone))
    }
}
