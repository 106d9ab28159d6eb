//! faqcoach-providers: Similarity scorers and suggestion generators.
//!
//! Implements the core `SimilarityScorer` and `SuggestionGenerator` traits
//! against the Hugging Face Inference API, OpenAI, and Ollama, plus an
//! offline lexical scorer and test mocks. Also owns the application config
//! file and the factory that turns it into collaborators.

pub mod config;
pub mod error;
pub mod huggingface;
pub mod lexical;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{
    create_scorer, create_suggester, load_config, load_config_from, CoachConfig, ScorerConfig,
    SuggesterConfig,
};
pub use error::ProviderError;
pub use lexical::LexicalScorer;
