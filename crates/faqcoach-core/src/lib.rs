//! faqcoach-core: Feedback engine, session state machine, and traits.
//!
//! This crate defines the data model, the collaborator traits, and the logic
//! that turns a learner's attempt at an FAQ question into feedback.

pub mod bank;
pub mod config;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod model;
pub mod session;
pub mod traits;

pub use bank::{FaqBank, QuestionBank};
pub use config::{DemoTexts, FeedbackConfig};
pub use engine::FeedbackEngine;
pub use error::{BankError, ConfigError, FeedbackError, ProviderError, SessionError};
pub use model::{Entry, ScoreLabel, Session, SessionPhase};
pub use session::{FeedbackObserver, NoopObserver, SessionStateMachine};
