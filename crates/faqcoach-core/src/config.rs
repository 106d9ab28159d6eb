//! Feedback configuration.
//!
//! A [`FeedbackConfig`] is built once at startup, validated, and then shared
//! read-only by the engine and the state machine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Canned texts substituted when placeholder mode is on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoTexts {
    #[serde(default = "default_demo_status")]
    pub status: String,
    #[serde(default = "default_demo_alert")]
    pub alert: String,
    #[serde(default = "default_demo_suggestions")]
    pub suggestions: String,
}

fn default_demo_status() -> String {
    "This is placeholder text for demo only. If the program has notes attached to this \
     question in the copy repository, it would appear here."
        .to_string()
}

fn default_demo_alert() -> String {
    "This is placeholder text for demo only. To get a real result, try including one or \
     more of the following phrases in your answer: research subject, human subjects."
        .to_string()
}

fn default_demo_suggestions() -> String {
    "This is placeholder text for demo only. If the app is connected to OpenAI, ChatGPT \
     will write suggestions for how to rewrite the learner's answer to be more like the \
     accepted answer."
        .to_string()
}

impl Default for DemoTexts {
    fn default() -> Self {
        Self {
            status: default_demo_status(),
            alert: default_demo_alert(),
            suggestions: default_demo_suggestions(),
        }
    }
}

/// Read-only inputs to the feedback engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Substitute demo text when a real value is absent.
    #[serde(default = "default_true")]
    pub show_placeholder_text: bool,
    /// Skip the suggestion generator entirely.
    #[serde(default)]
    pub local_only: bool,
    /// Phrases learners must avoid, in display order.
    #[serde(default = "default_forbidden_phrases")]
    pub forbidden_phrases: Vec<String>,
    #[serde(default)]
    pub demo_texts: DemoTexts,
    /// Upper bound on a single suggestion request.
    #[serde(default = "default_timeout_secs")]
    pub suggestion_timeout_secs: u64,
    /// Retries on transient generator errors.
    #[serde(default = "default_retries")]
    pub max_suggestion_retries: u32,
    /// Initial delay between retries, doubled after each one.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_forbidden_phrases() -> Vec<String> {
    ["research subject", "research subjects", "human subject", "human subjects"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retries() -> u32 {
    2
}

fn default_retry_delay() -> u64 {
    500
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            show_placeholder_text: true,
            local_only: false,
            forbidden_phrases: default_forbidden_phrases(),
            demo_texts: DemoTexts::default(),
            suggestion_timeout_secs: default_timeout_secs(),
            max_suggestion_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

impl FeedbackConfig {
    pub fn suggestion_timeout(&self) -> Duration {
        Duration::from_secs(self.suggestion_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Check the configuration and normalize the phrase list.
    ///
    /// Phrases are trimmed and deduplicated case-insensitively, keeping the
    /// first occurrence so the configured order is preserved.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.suggestion_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let mut seen: Vec<String> = Vec::with_capacity(self.forbidden_phrases.len());
        let mut phrases = Vec::with_capacity(self.forbidden_phrases.len());
        for (i, phrase) in self.forbidden_phrases.iter().enumerate() {
            let trimmed = phrase.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::EmptyPhrase(i));
            }
            let canonical = trimmed.to_lowercase();
            if seen.contains(&canonical) {
                tracing::debug!(phrase = trimmed, "dropping duplicate forbidden phrase");
                continue;
            }
            seen.push(canonical);
            phrases.push(trimmed.to_string());
        }
        self.forbidden_phrases = phrases;

        Ok(self)
    }
}
