//! Application configuration and collaborator factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use faqcoach_core::config::FeedbackConfig;
use faqcoach_core::traits::{SimilarityScorer, SuggestionGenerator};

use crate::huggingface::HuggingFaceScorer;
use crate::lexical::LexicalScorer;
use crate::ollama::OllamaSuggester;
use crate::openai::OpenAiSuggester;

/// Which similarity scorer to use.
///
/// Note: Custom Debug impl masks the API token.
#[derive(Clone, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScorerConfig {
    HuggingFace {
        #[serde(default)]
        api_token: Option<String>,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
    #[default]
    Lexical,
}

impl std::fmt::Debug for ScorerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScorerConfig::HuggingFace {
                api_token,
                base_url,
                model,
            } => f
                .debug_struct("HuggingFace")
                .field("api_token", &api_token.as_ref().map(|_| "***"))
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
            ScorerConfig::Lexical => f.write_str("Lexical"),
        }
    }
}

/// Which suggestion generator to use.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SuggesterConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        #[serde(default)]
        model: Option<String>,
    },
}

impl std::fmt::Debug for SuggesterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggesterConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
                model,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .field("model", model)
                .finish(),
            SuggesterConfig::Ollama { base_url, model } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
        }
    }
}

fn default_ollama_url() -> String {
    crate::ollama::DEFAULT_BASE_URL.to_string()
}

/// Top-level faqcoach configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachConfig {
    /// Path to the FAQ corpus.
    #[serde(default = "default_faq_path")]
    pub faq: PathBuf,
    /// Feedback policy.
    #[serde(default)]
    pub feedback: FeedbackConfig,
    /// Similarity scorer.
    #[serde(default)]
    pub scorer: ScorerConfig,
    /// Suggestion generator; none means every suggestion is the apology
    /// (or the demo text in local-only mode).
    #[serde(default)]
    pub suggester: Option<SuggesterConfig>,
}

fn default_faq_path() -> PathBuf {
    PathBuf::from("faq.toml")
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            faq: default_faq_path(),
            feedback: FeedbackConfig::default(),
            scorer: ScorerConfig::default(),
            suggester: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_opt(s: &Option<String>) -> Option<String> {
    s.as_deref().map(resolve_env_vars)
}

fn resolve_scorer_config(config: &ScorerConfig) -> ScorerConfig {
    match config {
        ScorerConfig::HuggingFace {
            api_token,
            base_url,
            model,
        } => ScorerConfig::HuggingFace {
            api_token: resolve_opt(api_token),
            base_url: resolve_opt(base_url),
            model: resolve_opt(model),
        },
        ScorerConfig::Lexical => ScorerConfig::Lexical,
    }
}

fn resolve_suggester_config(config: &SuggesterConfig) -> SuggesterConfig {
    match config {
        SuggesterConfig::OpenAI {
            api_key,
            base_url,
            org_id,
            model,
        } => SuggesterConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: resolve_opt(base_url),
            org_id: resolve_opt(org_id),
            model: resolve_opt(model),
        },
        SuggesterConfig::Ollama { base_url, model } => SuggesterConfig::Ollama {
            base_url: resolve_env_vars(base_url),
            model: resolve_opt(model),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `faqcoach.toml` in the current directory
/// 2. `~/.config/faqcoach/config.toml`
///
/// Environment variable overrides: `FAQCOACH_OPENAI_KEY`, `FAQCOACH_HF_TOKEN`.
pub fn load_config() -> Result<CoachConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<CoachConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("faqcoach.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => CoachConfig::default(),
    };

    Ok(apply_env_overrides(config))
}

/// Parse a TOML config document.
pub fn parse_config_str(content: &str) -> Result<CoachConfig> {
    Ok(toml::from_str::<CoachConfig>(content)?)
}

fn apply_env_overrides(mut config: CoachConfig) -> CoachConfig {
    if let Ok(key) = std::env::var("FAQCOACH_OPENAI_KEY") {
        match &mut config.suggester {
            Some(SuggesterConfig::OpenAI { api_key, .. }) => *api_key = key,
            // An Ollama suggester stays in place; the key only creates an
            // OpenAI suggester when none is configured.
            Some(SuggesterConfig::Ollama { .. }) => {}
            None => {
                config.suggester = Some(SuggesterConfig::OpenAI {
                    api_key: key,
                    base_url: None,
                    org_id: None,
                    model: None,
                });
            }
        }
    }

    if let Ok(token) = std::env::var("FAQCOACH_HF_TOKEN") {
        match &mut config.scorer {
            ScorerConfig::HuggingFace { api_token, .. } => *api_token = Some(token),
            ScorerConfig::Lexical => {
                config.scorer = ScorerConfig::HuggingFace {
                    api_token: Some(token),
                    base_url: None,
                    model: None,
                };
            }
        }
    }

    config.scorer = resolve_scorer_config(&config.scorer);
    config.suggester = config.suggester.as_ref().map(resolve_suggester_config);
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("faqcoach"))
}

/// Create a similarity scorer from its configuration.
pub fn create_scorer(config: &ScorerConfig) -> Result<Arc<dyn SimilarityScorer>> {
    match config {
        ScorerConfig::HuggingFace {
            api_token,
            base_url,
            model,
        } => Ok(Arc::new(HuggingFaceScorer::new(
            api_token.clone(),
            base_url.clone(),
            model.clone(),
        )?)),
        ScorerConfig::Lexical => Ok(Arc::new(LexicalScorer::new())),
    }
}

/// Create a suggestion generator from its configuration.
pub fn create_suggester(config: &SuggesterConfig) -> Result<Arc<dyn SuggestionGenerator>> {
    match config {
        SuggesterConfig::OpenAI {
            api_key,
            base_url,
            org_id,
            model,
        } => {
            if api_key.is_empty() {
                anyhow::bail!("OpenAI suggester configured without an API key");
            }
            Ok(Arc::new(OpenAiSuggester::new(
                api_key,
                base_url.clone(),
                org_id.clone(),
                model.clone(),
            )?))
        }
        SuggesterConfig::Ollama { base_url, model } => {
            Ok(Arc::new(OllamaSuggester::new(base_url, model.clone())?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_FAQCOACH_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_FAQCOACH_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_FAQCOACH_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars ${unterminated"), "no vars ${unterminated");
        std::env::remove_var("_FAQCOACH_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = CoachConfig::default();
        assert_eq!(config.faq, PathBuf::from("faq.toml"));
        assert!(matches!(config.scorer, ScorerConfig::Lexical));
        assert!(config.suggester.is_none());
        assert!(config.feedback.show_placeholder_text);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
faq = "irb-faq.toml"

[feedback]
show_placeholder_text = false
forbidden_phrases = ["research subject", "test subject"]
suggestion_timeout_secs = 10

[scorer]
type = "huggingface"
api_token = "hf_abc"

[suggester]
type = "openai"
api_key = "sk-openai"
model = "gpt-4.1-mini"
"#;
        let config = parse_config_str(toml_str).unwrap();
        assert_eq!(config.faq, PathBuf::from("irb-faq.toml"));
        assert!(!config.feedback.show_placeholder_text);
        assert_eq!(config.feedback.forbidden_phrases.len(), 2);
        assert_eq!(config.feedback.suggestion_timeout_secs, 10);
        assert!(matches!(
            config.scorer,
            ScorerConfig::HuggingFace { api_token: Some(ref t), .. } if t == "hf_abc"
        ));
        assert!(matches!(
            config.suggester,
            Some(SuggesterConfig::OpenAI { ref model, .. }) if model.as_deref() == Some("gpt-4.1-mini")
        ));
    }

    #[test]
    fn parse_ollama_defaults_base_url() {
        let config = parse_config_str("[suggester]\ntype = \"ollama\"\n").unwrap();
        match config.suggester {
            Some(SuggesterConfig::Ollama { base_url, model }) => {
                assert_eq!(base_url, "http://localhost:11434");
                assert!(model.is_none());
            }
            other => panic!("unexpected suggester: {other:?}"),
        }
    }

    #[test]
    fn debug_masks_secrets() {
        let scorer = ScorerConfig::HuggingFace {
            api_token: Some("hf_secret".into()),
            base_url: None,
            model: None,
        };
        let suggester = SuggesterConfig::OpenAI {
            api_key: "sk-secret".into(),
            base_url: None,
            org_id: None,
            model: None,
        };
        let rendered = format!("{scorer:?} {suggester:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn interpolates_env_in_file() {
        std::env::set_var("_FAQCOACH_TEST_KEY", "sk-from-env");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faqcoach.toml");
        std::fs::write(
            &path,
            "[suggester]\ntype = \"openai\"\napi_key = \"${_FAQCOACH_TEST_KEY}\"\n",
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        std::env::remove_var("_FAQCOACH_TEST_KEY");
        match config.suggester {
            Some(SuggesterConfig::OpenAI { api_key, .. }) => assert_eq!(api_key, "sk-from-env"),
            other => panic!("unexpected suggester: {other:?}"),
        }
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/faqcoach.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn factory_builds_collaborators() {
        let scorer = create_scorer(&ScorerConfig::Lexical).unwrap();
        assert_eq!(scorer.name(), "lexical");

        let suggester = create_suggester(&SuggesterConfig::Ollama {
            base_url: default_ollama_url(),
            model: None,
        })
        .unwrap();
        assert_eq!(suggester.name(), "ollama");
    }

    #[test]
    fn openai_without_key_is_rejected() {
        let result = create_suggester(&SuggesterConfig::OpenAI {
            api_key: String::new(),
            base_url: None,
            org_id: None,
            model: None,
        });
        assert!(result.is_err());
    }
}
