//! JSON presenter for machine consumers.

use serde::Serialize;
use serde_json::Value;

use faqcoach_core::feedback::ArtifactKind;
use faqcoach_core::model::Session;

use crate::{answer_revealed, is_shown, Presenter};

/// Renders a session or a single artifact as pretty-printed JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPresenter;

impl JsonPresenter {
    pub fn new() -> Self {
        Self
    }
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

impl Presenter for JsonPresenter {
    fn question(&self, session: &Session) -> String {
        pretty(&serde_json::json!({ "id": session.id, "question": session.question }))
    }

    fn approved_answer(&self, session: &Session) -> Option<String> {
        answer_revealed(session).then(|| pretty(&serde_json::json!({ "answer": session.answer })))
    }

    fn artifact(&self, session: &Session, kind: ArtifactKind) -> Option<String> {
        if !is_shown(session, kind) {
            return None;
        }
        let feedback = &session.feedback;
        let value = match kind {
            ArtifactKind::Score => serde_json::to_value(&feedback.score),
            ArtifactKind::PhrasingAlert => serde_json::to_value(&feedback.phrasing),
            ArtifactKind::StatusNotes => serde_json::to_value(&feedback.notes),
            ArtifactKind::Suggestion => serde_json::to_value(&feedback.suggestion),
        }
        .ok()?;
        Some(pretty(&serde_json::json!({ "artifact": kind, "value": value })))
    }

    /// The whole session snapshot, hidden artifacts included, so consumers
    /// can apply their own visibility policy.
    fn render(&self, session: &Session) -> String {
        pretty(&to_value(session))
    }
}

/// The session as a JSON value.
///
/// `score` and `score_label` are `null` unless a score was actually
/// computed, so the pre-submit placeholder never reads as a result.
pub fn to_value(session: &Session) -> Value {
    let mut value = serde_json::to_value(session).unwrap_or(Value::Null);
    if session.scored().is_none() {
        if let Some(fields) = value.as_object_mut() {
            fields.insert("score".into(), Value::Null);
            fields.insert("score_label".into(), Value::Null);
        }
    }
    value
}
