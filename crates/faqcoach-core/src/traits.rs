//! Core trait definitions for the external collaborators of the engine.
//!
//! These async traits are implemented by the `faqcoach-providers` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Similarity scorer trait
// ---------------------------------------------------------------------------

/// Trait for backends that measure semantic similarity between two texts.
#[async_trait]
pub trait SimilarityScorer: Send + Sync {
    /// Human-readable scorer name (e.g. "huggingface").
    fn name(&self) -> &str;

    /// Similarity of `b` to `a`, nominally in `[0, 1]`.
    ///
    /// Cosine-style metrics may dip slightly below zero; callers clamp.
    async fn similarity(&self, a: &str, b: &str) -> anyhow::Result<f64>;
}

// ---------------------------------------------------------------------------
// Suggestion generator trait
// ---------------------------------------------------------------------------

/// Trait for LLM backends that write improvement suggestions.
#[async_trait]
pub trait SuggestionGenerator: Send + Sync {
    /// Human-readable generator name (e.g. "openai").
    fn name(&self) -> &str;

    /// Produce finished prose describing how to improve the attempt.
    async fn suggest(&self, request: &SuggestionRequest) -> anyhow::Result<String>;
}

/// What the generator is asked to compare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    /// The approved answer.
    pub approved: String,
    /// The learner's attempt.
    pub attempt: String,
}

impl SuggestionRequest {
    pub fn new(approved: impl Into<String>, attempt: impl Into<String>) -> Self {
        Self {
            approved: approved.into(),
            attempt: attempt.into(),
        }
    }

    /// The full user prompt for chat-style generators.
    pub fn prompt(&self) -> String {
        build_suggestion_prompt(&self.approved, &self.attempt)
    }
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Every generated suggestion is asked to open with this phrase.
pub const SUGGESTION_OPENING: &str = "To improve your answer, think about ";

/// Build the prompt that asks for a short improvement paragraph.
pub fn build_suggestion_prompt(approved: &str, attempt: &str) -> String {
    format!(
        "Write a short paragraph summarizing the one or two most important ways that the \
         submitted answer block of text below can be improved to become more similar to the \
         approved answer block of text. Do not include a new version of the submitted answer. \
         Do not include any lists. The summary text should start with '{SUGGESTION_OPENING}'.\n\n\
         Approved answer: {approved}\n\n\
         Submitted answer: {attempt}"
    )
}
