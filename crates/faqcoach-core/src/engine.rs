//! Feedback engine.
//!
//! Computes each feedback artifact from a session snapshot. The engine never
//! mutates a session; it returns artifact values that the state machine
//! merges.

use std::sync::Arc;
use std::time::Duration;

use regex::{Regex, RegexBuilder};

use crate::config::FeedbackConfig;
use crate::error::{ConfigError, FeedbackError, ProviderError};
use crate::feedback::{PhrasingAlert, StatusNotes, Suggestion, SUGGESTION_APOLOGY};
use crate::model::{ScoreLabel, Session};
use crate::traits::{SimilarityScorer, SuggestionGenerator, SuggestionRequest};

/// Upper bound on any wait between suggestion attempts.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Case-insensitive, word-boundary anchored matcher for forbidden phrases.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    patterns: Vec<(String, Regex)>,
}

impl PhraseMatcher {
    /// Compile one pattern per phrase. Words inside a phrase may be separated
    /// by any run of whitespace in the matched text.
    ///
    /// Phrases are anchored with `\b`, so a phrase that starts or ends with a
    /// non-word character (`C++`, `.NET`) will never match.
    pub fn new(phrases: &[String]) -> Result<Self, ConfigError> {
        let patterns = phrases
            .iter()
            .map(|phrase| {
                let words: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
                let pattern = format!(r"\b{}\b", words.join(r"\s+"));
                RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|re| (phrase.clone(), re))
                    .map_err(|e| ConfigError::InvalidPhrase {
                        phrase: phrase.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Configured phrases found in `text`, in configured order.
    pub fn find(&self, text: &str) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(phrase, _)| phrase.clone())
            .collect()
    }
}

/// Turn a raw similarity into a 0-100 score.
///
/// The raw value is scaled and truncated toward zero. Negative noise becomes
/// 0 and anything above 1 becomes 100.
pub fn clamp_score(raw: f64) -> Result<u8, FeedbackError> {
    if !raw.is_finite() {
        return Err(FeedbackError::InvalidScore(raw));
    }
    let scaled = (raw * 100.0).trunc();
    Ok(scaled.clamp(0.0, 100.0) as u8)
}

/// Stateless artifact computations over a session snapshot.
pub struct FeedbackEngine {
    config: Arc<FeedbackConfig>,
    matcher: PhraseMatcher,
    scorer: Arc<dyn SimilarityScorer>,
    generator: Option<Arc<dyn SuggestionGenerator>>,
}

impl FeedbackEngine {
    /// Validate `config` and build an engine around the given collaborators.
    ///
    /// `generator` may be `None` only when suggestions are not needed, i.e.
    /// in local-only mode; otherwise every suggestion resolves to the apology.
    pub fn new(
        config: FeedbackConfig,
        scorer: Arc<dyn SimilarityScorer>,
        generator: Option<Arc<dyn SuggestionGenerator>>,
    ) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let matcher = PhraseMatcher::new(&config.forbidden_phrases)?;

        if generator.is_none() && !config.local_only {
            tracing::warn!("no suggestion generator configured; suggestions will fail");
        }

        Ok(Self {
            config: Arc::new(config),
            matcher,
            scorer,
            generator,
        })
    }

    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }

    pub fn matcher(&self) -> &PhraseMatcher {
        &self.matcher
    }

    /// Score the attempt against the approved answer.
    ///
    /// A scorer failure is returned as an error; no score is ever invented.
    pub async fn score_similarity(
        &self,
        session: &Session,
    ) -> Result<(u8, ScoreLabel), FeedbackError> {
        let raw = self
            .scorer
            .similarity(&session.answer, &session.attempt)
            .await
            .map_err(|e| FeedbackError::ScorerUnavailable(format!("{e:#}")))?;

        let score = clamp_score(raw)?;
        tracing::debug!(scorer = self.scorer.name(), raw, score, "similarity scored");
        Ok((score, ScoreLabel::from_score(score)))
    }

    /// Configured forbidden phrases present in the attempt.
    pub fn check_forbidden_phrases(&self, session: &Session) -> Vec<String> {
        self.matcher.find(&session.attempt)
    }

    /// Shape the phrasing alert for a set of matches.
    pub fn phrasing_alert(&self, matches: &[String]) -> PhrasingAlert {
        match matches {
            [] if self.config.show_placeholder_text => {
                PhrasingAlert::Demo(self.config.demo_texts.alert.clone())
            }
            [] => PhrasingAlert::Suppressed,
            [phrase] => PhrasingAlert::Single(phrase.clone()),
            phrases => PhrasingAlert::Multiple(phrases.to_vec()),
        }
    }

    /// Real notes, demo notes, or nothing.
    pub fn resolve_status_notes(&self, session: &Session) -> StatusNotes {
        if session.has_notes() {
            StatusNotes::Notes(session.status.clone())
        } else if self.config.show_placeholder_text {
            StatusNotes::Placeholder(self.config.demo_texts.status.clone())
        } else {
            StatusNotes::Suppressed
        }
    }

    /// Ask the generator for an improvement suggestion.
    ///
    /// Always resolves to something displayable (or to a suppressed artifact
    /// when the generator returns nothing and placeholders are off). Failures
    /// and timeouts become the fixed apology.
    pub async fn request_suggestion(&self, session: &Session) -> Suggestion {
        if self.config.local_only {
            return Suggestion::Placeholder(self.config.demo_texts.suggestions.clone());
        }

        let Some(generator) = &self.generator else {
            tracing::warn!("suggestion requested but no generator is configured");
            return Suggestion::Apology(SUGGESTION_APOLOGY.to_string());
        };

        let request = SuggestionRequest::new(&session.answer, &session.attempt);
        let timeout = self.config.suggestion_timeout();

        match tokio::time::timeout(timeout, self.suggest_with_retry(generator.as_ref(), &request))
            .await
        {
            Ok(Ok(text)) if !text.trim().is_empty() => Suggestion::Generated(text),
            Ok(Ok(_)) => {
                tracing::warn!(generator = generator.name(), "generator returned an empty suggestion");
                if self.config.show_placeholder_text {
                    Suggestion::Placeholder(self.config.demo_texts.suggestions.clone())
                } else {
                    Suggestion::Suppressed
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(generator = generator.name(), "suggestion failed: {e:#}");
                Suggestion::Apology(SUGGESTION_APOLOGY.to_string())
            }
            Err(_) => {
                tracing::warn!(
                    generator = generator.name(),
                    "suggestion timed out after {}s",
                    timeout.as_secs()
                );
                Suggestion::Apology(SUGGESTION_APOLOGY.to_string())
            }
        }
    }

    /// Retry transient generator errors with exponential backoff.
    async fn suggest_with_retry(
        &self,
        generator: &dyn SuggestionGenerator,
        request: &SuggestionRequest,
    ) -> anyhow::Result<String> {
        let mut last_error = None;
        let mut retry_delay = self.config.retry_delay();

        for retry in 0..=self.config.max_suggestion_retries {
            if retry > 0 {
                tokio::time::sleep(retry_delay).await;
                retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
            }
            match generator.suggest(request).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    if let Some(provider_err) = e.downcast_ref::<ProviderError>() {
                        if provider_err.is_permanent() {
                            return Err(e);
                        }
                        if let Some(ms) = provider_err.retry_after_ms() {
                            retry_delay = Duration::from_millis(ms).min(MAX_RETRY_DELAY);
                        }
                    }
                    tracing::debug!(attempt = retry + 1, "suggestion attempt failed: {e:#}");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error")))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::model::Entry;

    struct StaticScorer(f64);

    #[async_trait]
    impl SimilarityScorer for StaticScorer {
        fn name(&self) -> &str {
            "static"
        }

        async fn similarity(&self, _: &str, _: &str) -> anyhow::Result<f64> {
            Ok(self.0)
        }
    }

    struct DownScorer;

    #[async_trait]
    impl SimilarityScorer for DownScorer {
        fn name(&self) -> &str {
            "down"
        }

        async fn similarity(&self, _: &str, _: &str) -> anyhow::Result<f64> {
            Err(ProviderError::NetworkError("connection refused".into()).into())
        }
    }

    /// Fails the first `failures` calls with `error`, then answers.
    struct FlakyGenerator {
        failures: u32,
        permanent: bool,
        calls: AtomicU32,
        reply: String,
    }

    impl FlakyGenerator {
        fn new(failures: u32, permanent: bool, reply: &str) -> Self {
            Self {
                failures,
                permanent,
                calls: AtomicU32::new(0),
                reply: reply.to_string(),
            }
        }
    }

    #[async_trait]
    impl SuggestionGenerator for FlakyGenerator {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn suggest(&self, _: &SuggestionRequest) -> anyhow::Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                if self.permanent {
                    return Err(ProviderError::AuthenticationFailed("bad key".into()).into());
                }
                return Err(ProviderError::ApiError {
                    status: 503,
                    message: "overloaded".into(),
                }
                .into());
            }
            Ok(self.reply.clone())
        }
    }

    struct StalledGenerator;

    #[async_trait]
    impl SuggestionGenerator for StalledGenerator {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn suggest(&self, _: &SuggestionRequest) -> anyhow::Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("too late".into())
        }
    }

    fn engine_with(
        config: FeedbackConfig,
        scorer: Arc<dyn SimilarityScorer>,
        generator: Option<Arc<dyn SuggestionGenerator>>,
    ) -> FeedbackEngine {
        FeedbackEngine::new(config, scorer, generator).unwrap()
    }

    fn default_engine() -> FeedbackEngine {
        engine_with(FeedbackConfig::default(), Arc::new(StaticScorer(0.5)), None)
    }

    fn session_with(attempt: &str) -> Session {
        let mut session = Session::from_entry(&Entry::new("Q1", "A1"));
        session.attempt = attempt.to_string();
        session
    }

    #[test]
    fn clamp_negative_to_zero() {
        assert_eq!(clamp_score(-0.0001).unwrap(), 0);
        assert_eq!(clamp_score(-0.5).unwrap(), 0);
        assert_eq!(clamp_score(-1e-12).unwrap(), 0);
    }

    #[test]
    fn clamp_truncates_and_caps() {
        assert_eq!(clamp_score(0.799).unwrap(), 79);
        assert_eq!(clamp_score(0.8).unwrap(), 80);
        assert_eq!(clamp_score(1.0).unwrap(), 100);
        assert_eq!(clamp_score(1.2).unwrap(), 100);
        assert!(clamp_score(f64::NAN).is_err());
    }

    #[test]
    fn phrases_match_case_insensitively_on_word_boundaries() {
        let engine = default_engine();
        let matches = engine.check_forbidden_phrases(&session_with("I am a Research Subject"));
        assert_eq!(matches, vec!["research subject".to_string()]);

        let matches = engine.check_forbidden_phrases(&session_with("researchsubjectology"));
        assert!(matches.is_empty());
    }

    #[test]
    fn plural_does_not_match_singular_phrase() {
        let engine = default_engine();
        let matches = engine.check_forbidden_phrases(&session_with("I study human subjects"));
        assert_eq!(matches, vec!["human subjects".to_string()]);
    }

    #[test]
    fn matches_follow_configured_order() {
        let engine = default_engine();
        let matches = engine.check_forbidden_phrases(&session_with(
            "Our human subjects are never called a research subject.",
        ));
        assert_eq!(
            matches,
            vec!["research subject".to_string(), "human subjects".to_string()]
        );
        assert!(matches!(
            engine.phrasing_alert(&matches),
            PhrasingAlert::Multiple(ref p) if p.len() == 2
        ));
    }

    #[test]
    fn phrase_spans_line_breaks() {
        let engine = default_engine();
        let matches = engine.check_forbidden_phrases(&session_with("each human\nsubject"));
        assert_eq!(matches, vec!["human subject".to_string()]);
    }

    #[test]
    fn phrase_ending_in_symbol_never_matches() {
        let matcher = PhraseMatcher::new(&["C++".to_string()]).unwrap();
        assert!(matcher.find("I write C++ daily").is_empty());
        assert!(matcher.find("C++").is_empty());
    }

    #[test]
    fn empty_attempt_has_no_matches() {
        let engine = default_engine();
        assert!(engine.check_forbidden_phrases(&session_with("")).is_empty());
    }

    #[test]
    fn alert_policy_branches() {
        let engine = default_engine();
        assert_eq!(
            engine.phrasing_alert(&[]),
            PhrasingAlert::Demo(engine.config().demo_texts.alert.clone())
        );
        assert_eq!(
            engine.phrasing_alert(&["human subject".to_string()]),
            PhrasingAlert::Single("human subject".into())
        );

        let quiet = engine_with(
            FeedbackConfig {
                show_placeholder_text: false,
                ..Default::default()
            },
            Arc::new(StaticScorer(0.5)),
            None,
        );
        assert_eq!(quiet.phrasing_alert(&[]), PhrasingAlert::Suppressed);
    }

    #[test]
    fn status_notes_three_states() {
        let engine = default_engine();
        let mut session = session_with("x");
        assert!(matches!(
            engine.resolve_status_notes(&session),
            StatusNotes::Placeholder(_)
        ));

        session.status = "Use 'participant'.".into();
        assert_eq!(
            engine.resolve_status_notes(&session),
            StatusNotes::Notes("Use 'participant'.".into())
        );

        let quiet = engine_with(
            FeedbackConfig {
                show_placeholder_text: false,
                ..Default::default()
            },
            Arc::new(StaticScorer(0.5)),
            None,
        );
        assert_eq!(
            quiet.resolve_status_notes(&session_with("x")),
            StatusNotes::Suppressed
        );
    }

    #[tokio::test]
    async fn score_maps_to_label() {
        let engine = engine_with(FeedbackConfig::default(), Arc::new(StaticScorer(0.79)), None);
        let (score, label) = engine.score_similarity(&session_with("x")).await.unwrap();
        assert_eq!(score, 79);
        assert_eq!(label, ScoreLabel::High);
    }

    #[tokio::test]
    async fn negative_similarity_scores_zero() {
        let engine = engine_with(FeedbackConfig::default(), Arc::new(StaticScorer(-0.03)), None);
        let (score, label) = engine.score_similarity(&session_with("x")).await.unwrap();
        assert_eq!(score, 0);
        assert_eq!(label, ScoreLabel::VeryLow);
    }

    #[tokio::test]
    async fn scorer_failure_is_an_error() {
        let engine = engine_with(FeedbackConfig::default(), Arc::new(DownScorer), None);
        let err = engine.score_similarity(&session_with("x")).await.unwrap_err();
        assert!(matches!(err, FeedbackError::ScorerUnavailable(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn local_only_skips_generator() {
        let generator = Arc::new(FlakyGenerator::new(0, false, "real"));
        let engine = engine_with(
            FeedbackConfig {
                local_only: true,
                ..Default::default()
            },
            Arc::new(StaticScorer(0.5)),
            Some(generator.clone()),
        );
        let suggestion = engine.request_suggestion(&session_with("x")).await;
        assert_eq!(
            suggestion,
            Suggestion::Placeholder(engine.config().demo_texts.suggestions.clone())
        );
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried() {
        let generator = Arc::new(FlakyGenerator::new(2, false, "To improve your answer, think about consent."));
        let engine = engine_with(
            FeedbackConfig::default(),
            Arc::new(StaticScorer(0.5)),
            Some(generator.clone()),
        );
        let suggestion = engine.request_suggestion(&session_with("x")).await;
        assert_eq!(
            suggestion,
            Suggestion::Generated("To improve your answer, think about consent.".into())
        );
        assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_failure_is_not_retried() {
        let generator = Arc::new(FlakyGenerator::new(5, true, "never"));
        let engine = engine_with(
            FeedbackConfig::default(),
            Arc::new(StaticScorer(0.5)),
            Some(generator.clone()),
        );
        let suggestion = engine.request_suggestion(&session_with("x")).await;
        assert_eq!(suggestion, Suggestion::Apology(SUGGESTION_APOLOGY.into()));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_yield_apology() {
        let generator = Arc::new(FlakyGenerator::new(10, false, "never"));
        let engine = engine_with(
            FeedbackConfig::default(),
            Arc::new(StaticScorer(0.5)),
            Some(generator.clone()),
        );
        let suggestion = engine.request_suggestion(&session_with("x")).await;
        assert_eq!(suggestion, Suggestion::Apology(SUGGESTION_APOLOGY.into()));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_generator_times_out() {
        let engine = engine_with(
            FeedbackConfig::default(),
            Arc::new(StaticScorer(0.5)),
            Some(Arc::new(StalledGenerator)),
        );
        let suggestion = engine.request_suggestion(&session_with("x")).await;
        assert_eq!(suggestion, Suggestion::Apology(SUGGESTION_APOLOGY.into()));
    }

    #[tokio::test]
    async fn blank_suggestion_falls_back_to_placeholder_or_nothing() {
        let engine = engine_with(
            FeedbackConfig::default(),
            Arc::new(StaticScorer(0.5)),
            Some(Arc::new(FlakyGenerator::new(0, false, "   "))),
        );
        assert!(matches!(
            engine.request_suggestion(&session_with("x")).await,
            Suggestion::Placeholder(_)
        ));

        let quiet = engine_with(
            FeedbackConfig {
                show_placeholder_text: false,
                ..Default::default()
            },
            Arc::new(StaticScorer(0.5)),
            Some(Arc::new(FlakyGenerator::new(0, false, ""))),
        );
        assert_eq!(
            quiet.request_suggestion(&session_with("x")).await,
            Suggestion::Suppressed
        );
    }

    #[tokio::test]
    async fn missing_generator_yields_apology() {
        let engine = default_engine();
        assert_eq!(
            engine.request_suggestion(&session_with("x")).await,
            Suggestion::Apology(SUGGESTION_APOLOGY.into())
        );
    }
}
