//! FAQ question bank.
//!
//! Loads entries from TOML or JSON files, hands out random entries, and
//! validates a corpus for common issues.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;

use crate::error::BankError;
use crate::model::Entry;

/// Source of FAQ entries for new sessions.
pub trait QuestionBank: Send + Sync {
    /// Uniformly pick one entry. Repeats are allowed.
    fn pick_random(&self) -> Result<Entry, BankError>;

    /// Look up an entry by id.
    fn get(&self, id: &str) -> Result<Entry, BankError>;

    /// All entry ids, sorted.
    fn ids(&self) -> Vec<String>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory bank keyed by entry id.
pub struct FaqBank {
    entries: BTreeMap<String, Entry>,
    ids: Vec<String>,
    rng: Mutex<StdRng>,
}

impl FaqBank {
    pub fn new(entries: BTreeMap<String, Entry>) -> Self {
        Self::with_rng(entries, StdRng::from_entropy())
    }

    /// A bank whose random picks are reproducible.
    pub fn with_seed(entries: BTreeMap<String, Entry>, seed: u64) -> Self {
        Self::with_rng(entries, StdRng::seed_from_u64(seed))
    }

    fn with_rng(entries: BTreeMap<String, Entry>, rng: StdRng) -> Self {
        let ids = entries.keys().cloned().collect();
        Self {
            entries,
            ids,
            rng: Mutex::new(rng),
        }
    }
}

impl QuestionBank for FaqBank {
    fn pick_random(&self) -> Result<Entry, BankError> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let id = self.ids.choose(&mut *rng).ok_or(BankError::Empty)?;
        tracing::debug!(entry_id = %id, "selected question");
        self.get(id)
    }

    fn get(&self, id: &str) -> Result<Entry, BankError> {
        self.entries
            .get(id)
            .cloned()
            .ok_or_else(|| BankError::NotFound(id.to_string()))
    }

    fn ids(&self) -> Vec<String> {
        self.ids.clone()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// TOML layout: one `[entries.<id>]` table per question.
#[derive(Debug, Deserialize)]
struct TomlFaqFile {
    #[serde(default)]
    entries: BTreeMap<String, Entry>,
}

/// Load a FAQ file, choosing the format from its extension.
pub fn load_faq(path: &Path) -> Result<FaqBank> {
    Ok(FaqBank::new(read_faq_entries(path)?))
}

/// Read and parse a FAQ file without building a bank.
pub fn read_faq_entries(path: &Path) -> Result<BTreeMap<String, Entry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read FAQ file: {}", path.display()))?;

    let entries = parse_faq_str(&content, path)?;
    tracing::info!(entries = entries.len(), path = %path.display(), "FAQ loaded");
    Ok(entries)
}

/// Parse FAQ content (useful for testing). `.json` files hold an object of
/// id → entry; anything else is read as TOML.
pub fn parse_faq_str(content: &str, source_path: &Path) -> Result<BTreeMap<String, Entry>> {
    let is_json = source_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))
    } else {
        let parsed: TomlFaqFile = toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
        Ok(parsed.entries)
    }
}

/// A warning from FAQ validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The entry id (if applicable).
    pub entry_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a corpus for common issues.
pub fn validate_bank(entries: &BTreeMap<String, Entry>) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if entries.is_empty() {
        warnings.push(ValidationWarning {
            entry_id: None,
            message: "no entries found".into(),
        });
        return warnings;
    }

    for (id, entry) in entries {
        if entry.question.trim().is_empty() {
            warnings.push(ValidationWarning {
                entry_id: Some(id.clone()),
                message: "question is empty".into(),
            });
        }
        if entry.answer.trim().is_empty() {
            warnings.push(ValidationWarning {
                entry_id: Some(id.clone()),
                message: "answer is empty".into(),
            });
        }
        if entry.status.as_deref().map_or(true, |s| s.trim().is_empty()) {
            warnings.push(ValidationWarning {
                entry_id: Some(id.clone()),
                message: "no approved-answer notes".into(),
            });
        }
    }

    // Same question text under two ids
    let mut seen: HashMap<String, &str> = HashMap::new();
    for (id, entry) in entries {
        let key = entry.question.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        if let Some(first) = seen.get(&key) {
            warnings.push(ValidationWarning {
                entry_id: Some(id.clone()),
                message: format!("duplicate question (also in '{first}')"),
            });
        } else {
            seen.insert(key, id);
        }
    }

    warnings
}
