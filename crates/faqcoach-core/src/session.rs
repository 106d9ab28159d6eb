//! Session lifecycle state machine.
//!
//! Owns the single live [`Session`], sequences artifact computation on submit
//! and replaces the session wholesale on reset.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::bank::QuestionBank;
use crate::engine::FeedbackEngine;
use crate::error::SessionError;
use crate::feedback::{ArtifactKind, ScoreCard};
use crate::model::{Entry, Session, SessionPhase};

/// Hook for presenters that render incrementally.
pub trait FeedbackObserver: Send + Sync {
    /// Input has been locked; external results are outstanding.
    fn on_locked(&self, session: &Session);
    /// One artifact has been merged into the session.
    fn on_artifact(&self, session: &Session, kind: ArtifactKind);
    /// All artifacts are ready.
    fn on_submitted(&self, session: &Session);
    /// A fresh session has replaced the previous one.
    fn on_reset(&self, session: &Session);
}

/// No-op observer.
pub struct NoopObserver;

impl FeedbackObserver for NoopObserver {
    fn on_locked(&self, _: &Session) {}
    fn on_artifact(&self, _: &Session, _: ArtifactKind) {}
    fn on_submitted(&self, _: &Session) {}
    fn on_reset(&self, _: &Session) {}
}

/// Idle → Pending → Submitted → (reset) → Idle.
pub struct SessionStateMachine {
    engine: Arc<FeedbackEngine>,
    bank: Arc<dyn QuestionBank>,
    session: Session,
}

impl SessionStateMachine {
    /// Start in `Idle` with a randomly drawn entry.
    pub fn new(engine: Arc<FeedbackEngine>, bank: Arc<dyn QuestionBank>) -> Result<Self, SessionError> {
        let entry = bank.pick_random()?;
        Ok(Self::with_entry(engine, bank, &entry))
    }

    /// Start in `Idle` with a specific entry.
    pub fn with_entry(engine: Arc<FeedbackEngine>, bank: Arc<dyn QuestionBank>, entry: &Entry) -> Self {
        let session = Session::from_entry(entry);
        info!(session_id = %session.id, "session initialized");
        debug!(?session, "session state");
        Self {
            engine,
            bank,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase
    }

    pub fn engine(&self) -> &FeedbackEngine {
        &self.engine
    }

    /// Record an attempt and compute all four artifacts.
    ///
    /// Input is locked before the first suspension point. A scorer failure
    /// does not abort the transition: the score card is marked unavailable
    /// and the remaining artifacts are still produced.
    pub async fn submit(
        &mut self,
        attempt: &str,
        observer: &dyn FeedbackObserver,
    ) -> Result<&Session, SessionError> {
        if !self.session.phase.accepts_input() {
            return Err(SessionError::InvalidTransition {
                from: self.session.phase,
                action: "submit",
            });
        }

        self.session.attempt = attempt.to_string();
        self.session.phase = SessionPhase::Pending;
        info!(session_id = %self.session.id, chars = attempt.len(), "attempt submitted");
        observer.on_locked(&self.session);

        let card = match self.engine.score_similarity(&self.session).await {
            Ok((score, label)) => ScoreCard::Scored { score, label },
            Err(e) => {
                warn!(session_id = %self.session.id, "score unavailable: {e}");
                ScoreCard::Unavailable {
                    reason: e.to_string(),
                }
            }
        };
        self.session.apply_score(card);
        observer.on_artifact(&self.session, ArtifactKind::Score);

        let matches = self.engine.check_forbidden_phrases(&self.session);
        let alert = self.engine.phrasing_alert(&matches);
        if !matches.is_empty() {
            info!(session_id = %self.session.id, ?matches, "forbidden phrases used");
        }
        self.session.apply_phrasing(matches, alert);
        observer.on_artifact(&self.session, ArtifactKind::PhrasingAlert);

        let notes = self.engine.resolve_status_notes(&self.session);
        self.session.apply_notes(notes);
        observer.on_artifact(&self.session, ArtifactKind::StatusNotes);

        let suggestion = self.engine.request_suggestion(&self.session).await;
        self.session.apply_suggestion(suggestion);
        observer.on_artifact(&self.session, ArtifactKind::Suggestion);

        self.session.phase = SessionPhase::Submitted;
        match self.session.scored() {
            Some((score, label)) => {
                info!(session_id = %self.session.id, score, label = %label, "feedback ready")
            }
            None => info!(session_id = %self.session.id, "feedback ready without a score"),
        }
        debug!(session = ?self.session, "session state");
        observer.on_submitted(&self.session);

        Ok(&self.session)
    }

    /// Discard the current session and draw a new question.
    pub fn reset(&mut self, observer: &dyn FeedbackObserver) -> Result<&Session, SessionError> {
        if !self.session.phase.can_reset() {
            return Err(SessionError::InvalidTransition {
                from: self.session.phase,
                action: "reset",
            });
        }

        let entry = self.bank.pick_random()?;
        let previous = self.session.id;
        self.session = Session::from_entry(&entry);
        info!(session_id = %self.session.id, %previous, "session reset");
        debug!(session = ?self.session, "session state");
        observer.on_reset(&self.session);

        Ok(&self.session)
    }
}
