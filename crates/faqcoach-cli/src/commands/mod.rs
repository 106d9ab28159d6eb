//! Subcommand implementations and the setup they share.

pub mod check;
pub mod init;
pub mod quiz;
pub mod validate;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use faqcoach_core::traits::{SimilarityScorer, SuggestionGenerator};
use faqcoach_core::FeedbackEngine;
use faqcoach_providers::{create_scorer, create_suggester, load_config_from, CoachConfig};

/// Flags that override values from the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// FAQ file (.toml or .json); defaults to the config's `faq`
    #[arg(long)]
    pub faq: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Never call the suggestion generator; show the demo suggestion instead
    #[arg(long)]
    pub local_only: bool,

    /// Hide cards that have no real content instead of showing demo text
    #[arg(long)]
    pub no_placeholders: bool,
}

/// Load the config file and apply command-line overrides.
pub fn load_settings(overrides: &Overrides) -> Result<CoachConfig> {
    let mut config = load_config_from(overrides.config.as_deref())?;
    if let Some(faq) = &overrides.faq {
        config.faq = faq.clone();
    }
    if overrides.local_only {
        config.feedback.local_only = true;
    }
    if overrides.no_placeholders {
        config.feedback.show_placeholder_text = false;
    }
    tracing::debug!(?config, "settings loaded");
    Ok(config)
}

/// Build the feedback engine from the configured collaborators.
pub fn build_engine(config: &CoachConfig) -> Result<Arc<FeedbackEngine>> {
    let scorer = create_scorer(&config.scorer)?;
    let generator = if config.feedback.local_only {
        None
    } else {
        config.suggester.as_ref().map(create_suggester).transpose()?
    };
    tracing::info!(
        scorer = scorer.name(),
        suggester = generator.as_ref().map(|g| g.name()).unwrap_or("none"),
        "engine ready"
    );
    Ok(Arc::new(FeedbackEngine::new(
        config.feedback.clone(),
        scorer,
        generator,
    )?))
}
