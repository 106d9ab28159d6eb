//! OpenAI chat-completions suggestion generator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use faqcoach_core::traits::{SuggestionGenerator, SuggestionRequest};

use crate::error::{build_client, check_status, from_reqwest, ProviderError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const MAX_TOKENS: u32 = 400;

/// OpenAI-compatible chat API generator.
pub struct OpenAiSuggester {
    api_key: String,
    base_url: String,
    org_id: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl OpenAiSuggester {
    pub fn new(
        api_key: &str,
        base_url: Option<String>,
        org_id: Option<String>,
        model: Option<String>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            org_id,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client: build_client(DEFAULT_TIMEOUT_SECS)?,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<OpenAiMessage>,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Deserialize)]
struct OpenAiChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl SuggestionGenerator for OpenAiSuggester {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn suggest(&self, request: &SuggestionRequest) -> anyhow::Result<String> {
        tracing::info!("requesting summary of differences");

        let body = OpenAiRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![OpenAiMessage {
                role: "user".to_string(),
                content: request.prompt(),
            }],
        };

        let mut req = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json");

        if let Some(org) = &self.org_id {
            req = req.header("OpenAI-Organization", org);
        }

        let response = req
            .json(&body)
            .send()
            .await
            .map_err(|e| from_reqwest(e, DEFAULT_TIMEOUT_SECS))?;
        let response = check_status(response, &self.model, true).await?;

        let api_response: OpenAiResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to parse response: {e}"))
        })?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        tracing::debug!(chars = content.len(), "suggestion received");
        Ok(content)
    }
}
