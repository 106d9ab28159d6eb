//! Ollama (local LLM) suggestion generator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use faqcoach_core::traits::{SuggestionGenerator, SuggestionRequest};

use crate::error::{build_client, check_status, from_reqwest, ProviderError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2";
const DEFAULT_TIMEOUT_SECS: u64 = 300; // Local models are slower

/// Ollama local LLM generator.
pub struct OllamaSuggester {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaSuggester {
    pub fn new(base_url: &str, model: Option<String>) -> Result<Self, ProviderError> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client: build_client(DEFAULT_TIMEOUT_SECS)?,
        })
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

#[derive(Serialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: OllamaResponseMessage,
}

#[derive(Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

#[async_trait]
impl SuggestionGenerator for OllamaSuggester {
    fn name(&self) -> &str {
        "ollama"
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn suggest(&self, request: &SuggestionRequest) -> anyhow::Result<String> {
        let body = OllamaRequest {
            model: self.model.clone(),
            messages: vec![OllamaMessage {
                role: "user".to_string(),
                content: request.prompt(),
            }],
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ProviderError::NetworkError(format!(
                        "Ollama not reachable at {}. Is it running? Start with: ollama serve",
                        self.base_url
                    ))
                } else {
                    from_reqwest(e, DEFAULT_TIMEOUT_SECS)
                }
            })?;

        let response = check_status(response, &self.model, true).await?;

        let api_response: OllamaResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to parse response: {e}"))
        })?;

        Ok(api_response.message.content)
    }
}
