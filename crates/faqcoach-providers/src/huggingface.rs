//! Hugging Face Inference API sentence-similarity scorer.

use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;

use faqcoach_core::traits::SimilarityScorer;

use crate::error::{build_client, check_status, from_reqwest, ProviderError};

const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/hf-inference";
pub const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Scores similarity with a hosted sentence-transformers model.
pub struct HuggingFaceScorer {
    api_token: Option<String>,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl HuggingFaceScorer {
    pub fn new(
        api_token: Option<String>,
        base_url: Option<String>,
        model: Option<String>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            api_token: api_token.filter(|t| !t.is_empty()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client: build_client(DEFAULT_TIMEOUT_SECS)?,
        })
    }
}

#[derive(Serialize)]
struct SimilarityRequest<'a> {
    inputs: SimilarityInputs<'a>,
}

#[derive(Serialize)]
struct SimilarityInputs<'a> {
    source_sentence: &'a str,
    sentences: [&'a str; 1],
}

#[async_trait]
impl SimilarityScorer for HuggingFaceScorer {
    fn name(&self) -> &str {
        "huggingface"
    }

    #[instrument(skip(self, a, b), fields(model = %self.model))]
    async fn similarity(&self, a: &str, b: &str) -> anyhow::Result<f64> {
        let body = SimilarityRequest {
            inputs: SimilarityInputs {
                source_sentence: a,
                sentences: [b],
            },
        };

        let mut req = self
            .client
            .post(format!(
                "{}/models/{}/pipeline/sentence-similarity",
                self.base_url, self.model
            ))
            .header("content-type", "application/json");

        if let Some(token) = &self.api_token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let response = req
            .json(&body)
            .send()
            .await
            .map_err(|e| from_reqwest(e, DEFAULT_TIMEOUT_SECS))?;
        let response = check_status(response, &self.model, true).await?;

        let scores: Vec<f64> = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to parse response: {e}"))
        })?;

        let score = scores.first().copied().ok_or_else(|| {
            ProviderError::InvalidResponse("empty similarity list".to_string())
        })?;

        Ok(score)
    }
}
