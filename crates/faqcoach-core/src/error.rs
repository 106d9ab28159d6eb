//! Error types shared across the feedback pipeline.
//!
//! `ProviderError` lives here rather than in `faqcoach-providers` so the
//! engine can downcast and classify collaborator failures for retry decisions
//! without string matching.

use thiserror::Error;

use crate::model::SessionPhase;

/// Errors that can occur when talking to an external scorer or generator.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key or token).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// Failures while computing a single feedback artifact.
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// The similarity scorer could not produce a value.
    #[error("similarity scorer unavailable: {0}")]
    ScorerUnavailable(String),

    /// The scorer returned something that is not a finite number.
    #[error("similarity scorer returned a non-finite value: {0}")]
    InvalidScore(f64),
}

/// Errors raised by a [`crate::bank::QuestionBank`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BankError {
    #[error("question bank is empty")]
    Empty,

    #[error("no entry with id '{0}'")]
    NotFound(String),
}

/// Errors raised by the session state machine.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The requested transition is not valid from the current phase.
    #[error("cannot {action} while session is {from}")]
    InvalidTransition {
        from: SessionPhase,
        action: &'static str,
    },

    #[error(transparent)]
    Bank(#[from] BankError),
}

/// Problems found while validating a [`crate::config::FeedbackConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("forbidden phrase at position {0} is empty")]
    EmptyPhrase(usize),

    #[error("forbidden phrase '{phrase}' cannot be compiled: {reason}")]
    InvalidPhrase { phrase: String, reason: String },

    #[error("suggestion timeout must be greater than zero")]
    ZeroTimeout,
}
