//! Offline bag-of-words similarity scorer.
//!
//! Cosine similarity over lowercase word counts. Much cruder than a
//! sentence-embedding model, but needs no network and no API token, so it is
//! the default scorer and the one used in tests.

use std::collections::HashMap;

use async_trait::async_trait;

use faqcoach_core::traits::SimilarityScorer;

/// Bag-of-words cosine scorer.
#[derive(Debug, Default, Clone)]
pub struct LexicalScorer;

impl LexicalScorer {
    pub fn new() -> Self {
        Self
    }
}

fn word_counts(text: &str) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for word in text
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
    {
        *counts.entry(word.to_lowercase()).or_insert(0) += 1;
    }
    counts
}

/// Cosine similarity of two texts' word-count vectors, in `0.0..=1.0`.
pub fn cosine_similarity(a: &str, b: &str) -> f64 {
    let left = word_counts(a);
    let right = word_counts(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let dot: f64 = left
        .iter()
        .filter_map(|(word, &n)| right.get(word).map(|&m| f64::from(n) * f64::from(m)))
        .sum();
    let norm_sq = |counts: &HashMap<String, u32>| {
        counts.values().map(|&n| f64::from(n).powi(2)).sum::<f64>()
    };

    // One sqrt over the product keeps identical texts at exactly 1.0.
    (dot / (norm_sq(&left) * norm_sq(&right)).sqrt()).min(1.0)
}

#[async_trait]
impl SimilarityScorer for LexicalScorer {
    fn name(&self) -> &str {
        "lexical"
    }

    async fn similarity(&self, a: &str, b: &str) -> anyhow::Result<f64> {
        Ok(cosine_similarity(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_scores_one() {
        let s = cosine_similarity("The IRB reviews research.", "the irb reviews RESEARCH");
        assert_eq!(s, 1.0);
    }

    #[test]
    fn disjoint_text_scores_zero() {
        assert_eq!(cosine_similarity("consent forms", "parking permits"), 0.0);
    }

    #[test]
    fn empty_text_scores_zero() {
        assert_eq!(cosine_similarity("", "anything"), 0.0);
        assert_eq!(cosine_similarity("...", "anything"), 0.0);
    }

    #[test]
    fn partial_overlap_is_between() {
        let s = cosine_similarity(
            "participants sign a consent form",
            "participants give verbal consent",
        );
        assert!(s > 0.0 && s < 1.0, "got {s}");
    }

    #[test]
    fn apostrophes_stay_inside_words() {
        assert_eq!(word_counts("participant's 'rights'").len(), 2);
        assert!(word_counts("participant's").contains_key("participant's"));
    }

    #[tokio::test]
    async fn scorer_uses_cosine() {
        let scorer = LexicalScorer::new();
        let s = scorer.similarity("a b", "a b").await.unwrap();
        assert!((s - 1.0).abs() < 1e-9);
        assert_eq!(scorer.name(), "lexical");
    }
}
