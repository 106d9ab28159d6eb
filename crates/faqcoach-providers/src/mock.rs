//! Mock collaborators for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use faqcoach_core::error::ProviderError;
use faqcoach_core::traits::{SimilarityScorer, SuggestionGenerator, SuggestionRequest};

/// A mock suggestion generator for exercising the engine without API calls.
pub struct MockSuggester {
    /// Text returned on success.
    response: String,
    /// When set, every call fails with this error instead.
    failure: Option<ProviderError>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<SuggestionRequest>>,
}

impl MockSuggester {
    /// Create a mock that always returns the same suggestion.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            response: response.to_string(),
            failure: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            response: String::new(),
            failure: Some(error),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this generator.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this generator.
    pub fn last_request(&self) -> Option<SuggestionRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl SuggestionGenerator for MockSuggester {
    fn name(&self) -> &str {
        "mock"
    }

    async fn suggest(&self, request: &SuggestionRequest) -> anyhow::Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(request.clone());

        match &self.failure {
            Some(err) => Err(err.clone().into()),
            None => Ok(self.response.clone()),
        }
    }
}

/// Scorer that returns the same raw similarity for every pair.
#[derive(Debug, Clone)]
pub struct FixedScorer(pub f64);

#[async_trait]
impl SimilarityScorer for FixedScorer {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn similarity(&self, _a: &str, _b: &str) -> anyhow::Result<f64> {
        Ok(self.0)
    }
}

/// Scorer that always fails, as an unreachable service would.
#[derive(Debug, Clone, Default)]
pub struct FailingScorer;

#[async_trait]
impl SimilarityScorer for FailingScorer {
    fn name(&self) -> &str {
        "failing"
    }

    async fn similarity(&self, _a: &str, _b: &str) -> anyhow::Result<f64> {
        Err(ProviderError::NetworkError("similarity service unreachable".into()).into())
    }
}
