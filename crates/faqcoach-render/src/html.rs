//! HTML presenter.
//!
//! Fragments are feedback cards meant to be swapped into a page one at a
//! time; [`generate_page`] wraps them in a self-contained document with the
//! CSS inlined.

use anyhow::Result;
use std::path::Path;

use faqcoach_core::feedback::{
    ArtifactKind, PhrasingAlert, ScoreCard, ANSWER_HEADING, NOTES_HEADING, SCORE_UNAVAILABLE,
    SUGGESTION_HEADING,
};
use faqcoach_core::model::Session;

use crate::{answer_revealed, is_shown, Presenter};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Renders feedback as HTML card fragments.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlPresenter;

impl HtmlPresenter {
    pub fn new() -> Self {
        Self
    }
}

fn card(color: &str, heading: &str, body: &str) -> String {
    format!(
        "<div class=\"feedback-card {color}-card\"><div class=\"feedback-head\">{}</div>{body}</div>",
        html_escape(heading)
    )
}

fn score_html(card_state: &ScoreCard) -> String {
    match card_state {
        ScoreCard::Scored { score, label } => format!(
            "<div class=\"center-box\"><div role=\"progressbar\" aria-valuenow=\"{score}\" \
             aria-valuemin=\"0\" aria-valuemax=\"100\" style=\"--value: {score}\">\
             <div class=\"label\">{label}</div></div></div>"
        ),
        ScoreCard::Unavailable { reason } => format!(
            "<div class=\"feedback-card gray-card\" title=\"{}\"><div class=\"feedback-head\">{SCORE_UNAVAILABLE}</div></div>",
            html_escape(reason)
        ),
    }
}

fn alert_html(alert: &PhrasingAlert) -> Option<String> {
    let heading = alert.heading()?;
    let body = match alert {
        PhrasingAlert::Single(phrase) => format!(
            "OOPS! You used the phrase <em>'{}'</em> which is forbidden.",
            html_escape(phrase)
        ),
        PhrasingAlert::Multiple(phrases) => {
            let items: String = phrases
                .iter()
                .map(|p| format!("<li>{}</li>", html_escape(p)))
                .collect();
            format!(
                "<p>{} <ul>{items}</ul></p><p>{}</p>",
                html_escape(&alert.lead().unwrap_or_default()),
                html_escape(alert.footer().unwrap_or_default())
            )
        }
        _ => html_escape(&alert.lead().unwrap_or_default()),
    };
    Some(card("red", heading, &body))
}

impl Presenter for HtmlPresenter {
    fn question(&self, session: &Session) -> String {
        format!(
            "<span class=\"info-question\">ℹ️ </span><span class=\"question-text\">{}</span>",
            html_escape(&session.question)
        )
    }

    fn approved_answer(&self, session: &Session) -> Option<String> {
        answer_revealed(session)
            .then(|| card("amber", ANSWER_HEADING, &html_escape(&session.answer)))
    }

    fn artifact(&self, session: &Session, kind: ArtifactKind) -> Option<String> {
        if !is_shown(session, kind) {
            return None;
        }
        let feedback = &session.feedback;
        match kind {
            ArtifactKind::Score => feedback.score.as_ref().map(score_html),
            ArtifactKind::PhrasingAlert => feedback.phrasing.as_ref().and_then(alert_html),
            ArtifactKind::StatusNotes => feedback
                .notes
                .as_ref()
                .and_then(|n| n.text())
                .map(|text| card("blue", NOTES_HEADING, &html_escape(text))),
            ArtifactKind::Suggestion => feedback
                .suggestion
                .as_ref()
                .and_then(|s| s.text())
                .map(|text| card("green", SUGGESTION_HEADING, &html_escape(text))),
        }
    }
}

/// Generate a standalone HTML page for a session.
pub fn generate_page(session: &Session) -> String {
    let presenter = HtmlPresenter::new();
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>faqcoach feedback</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str(&presenter.question(session));
    html.push_str(&format!(
        "\n<p class=\"meta\">Session {} | {}</p>\n",
        session.id,
        session.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    if !session.attempt.is_empty() {
        html.push_str(&format!(
            "<section class=\"attempt\"><h2>Your answer</h2><p>{}</p></section>\n",
            html_escape(&session.attempt)
        ));
    }

    if let Some(answer) = presenter.approved_answer(session) {
        html.push_str("<section class=\"approved-answer\">\n");
        html.push_str(&answer);
        html.push_str("\n</section>\n");
    }

    html.push_str("<section class=\"feedback\">\n");
    html.push_str(&presenter.feedback(session));
    html.push_str("\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write a standalone HTML page to a file.
pub fn write_page(session: &Session, path: &Path) -> Result<()> {
    let html = generate_page(session);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --red: #fde2e2; --blue: #dbeafe; --green: #dcfce7; --gray: #e5e7eb; --amber: #fef3c7; --bar: #2563eb; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --red: #7f1d1d; --blue: #1e3a8a; --green: #064e3b; --gray: #374151; --amber: #78350f; --bar: #60a5fa; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
.meta { color: #6b7280; }
.question-text { font-size: 1.25rem; font-weight: bold; }
.feedback-card { border-radius: 8px; padding: 1rem; margin: 1rem 0; }
.feedback-head { font-weight: bold; margin-bottom: 0.5rem; }
.red-card { background: var(--red); }
.blue-card { background: var(--blue); }
.green-card { background: var(--green); }
.gray-card { background: var(--gray); }
.amber-card { background: var(--amber); }
.center-box { display: flex; justify-content: center; margin: 1rem 0; }
[role="progressbar"] {
  --size: 8rem; width: var(--size); height: var(--size); border-radius: 50%;
  display: grid; place-items: center;
  background: radial-gradient(closest-side, var(--bg) 79%, transparent 80% 100%),
              conic-gradient(var(--bar) calc(var(--value) * 1%), var(--gray) 0);
}
.label { font-weight: bold; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use faqcoach_core::feedback::{StatusNotes, Suggestion};

    #[test]
    fn question_is_escaped() {
        let html = HtmlPresenter::new().question(&fixtures::idle());
        assert!(html.contains("Can I call participants &lt;subjects&gt;?"));
        assert!(!html.contains("<subjects>"));
    }

    #[test]
    fn score_card_is_a_progressbar() {
        let html = HtmlPresenter::new()
            .artifact(&fixtures::submitted(), ArtifactKind::Score)
            .unwrap();
        assert!(html.contains("role=\"progressbar\""));
        assert!(html.contains("aria-valuenow=\"72\""));
        assert!(html.contains("--value: 72"));
        assert!(html.contains(">High<"));
    }

    #[test]
    fn unavailable_score_card() {
        let mut session = fixtures::submitted();
        session.feedback.score = Some(ScoreCard::Unavailable {
            reason: "network error".into(),
        });
        let html = HtmlPresenter::new()
            .artifact(&session, ArtifactKind::Score)
            .unwrap();
        assert!(html.contains(SCORE_UNAVAILABLE));
        assert!(!html.contains("progressbar"));
    }

    #[test]
    fn single_alert_card() {
        let html = HtmlPresenter::new()
            .artifact(&fixtures::submitted(), ArtifactKind::PhrasingAlert)
            .unwrap();
        assert!(html.contains("red-card"));
        assert!(html.contains("Watch your phrasing!"));
        assert!(html.contains("<em>'human subjects'</em>"));
    }

    #[test]
    fn multiple_alert_card_lists_phrases() {
        let mut session = fixtures::submitted();
        session.feedback.phrasing = Some(PhrasingAlert::Multiple(vec![
            "research subject".into(),
            "human subjects".into(),
        ]));
        let html = HtmlPresenter::new()
            .artifact(&session, ArtifactKind::PhrasingAlert)
            .unwrap();
        assert!(html.contains("<li>research subject</li><li>human subjects</li>"));
        assert!(html.contains("OH NO! You used these forbidden phrases:"));
        assert!(html.contains("The program IRB forbids the use of these phrases!"));
    }

    #[test]
    fn demo_alert_card() {
        let mut session = fixtures::submitted();
        session.feedback.phrasing = Some(PhrasingAlert::Demo("Remember the guidance.".into()));
        let html = HtmlPresenter::new()
            .artifact(&session, ArtifactKind::PhrasingAlert)
            .unwrap();
        assert!(html.contains("Demo Alert"));
        assert!(html.contains("Remember the guidance."));
    }

    #[test]
    fn notes_and_suggestion_cards() {
        let session = fixtures::submitted();
        let presenter = HtmlPresenter::new();
        let notes = presenter
            .artifact(&session, ArtifactKind::StatusNotes)
            .unwrap();
        assert!(notes.contains("blue-card"));
        assert!(notes.contains("Approved by the IRB office &amp; legal."));

        let suggestion = presenter
            .artifact(&session, ArtifactKind::Suggestion)
            .unwrap();
        assert!(suggestion.contains("green-card"));
        assert!(suggestion.contains(SUGGESTION_HEADING));
    }

    #[test]
    fn suppressed_artifacts_render_nothing() {
        let mut session = fixtures::submitted();
        session.feedback.notes = Some(StatusNotes::Suppressed);
        session.feedback.suggestion = Some(Suggestion::Suppressed);
        let presenter = HtmlPresenter::new();
        assert!(presenter
            .artifact(&session, ArtifactKind::StatusNotes)
            .is_none());
        assert!(presenter
            .artifact(&session, ArtifactKind::Suggestion)
            .is_none());
    }

    #[test]
    fn page_contains_cards_in_order() {
        let page = generate_page(&fixtures::submitted());
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.ends_with("</html>"));
        let start = page.find("<section class=\"feedback\">").unwrap();
        let html = &page[start..];
        let score = html.find("progressbar").unwrap();
        let alert = html.find("red-card").unwrap();
        let notes = html.find("blue-card").unwrap();
        let suggestion = html.find("green-card").unwrap();
        assert!(score < alert && alert < notes && notes < suggestion);
    }

    #[test]
    fn approved_answer_card_after_submit() {
        let presenter = HtmlPresenter::new();
        assert!(presenter.approved_answer(&fixtures::idle()).is_none());

        let card = presenter.approved_answer(&fixtures::submitted()).unwrap();
        assert!(card.contains("amber-card"));
        assert!(card.contains(ANSWER_HEADING));
        assert!(card.contains("Use &#x27;participants&#x27; in all materials."));

        let page = generate_page(&fixtures::submitted());
        let answer = page.find("<section class=\"approved-answer\">").unwrap();
        let feedback = page.find("<section class=\"feedback\">").unwrap();
        assert!(answer < feedback);
        assert!(!generate_page(&fixtures::idle()).contains("<section class=\"approved-answer\">"));
    }

    #[test]
    fn page_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("feedback.html");

        write_page(&fixtures::submitted(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
