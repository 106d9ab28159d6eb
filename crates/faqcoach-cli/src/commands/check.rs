//! The `faqcoach check` command.

use std::sync::Arc;

use anyhow::Result;

use faqcoach_core::bank::{read_faq_entries, FaqBank, QuestionBank};
use faqcoach_core::{NoopObserver, SessionStateMachine};
use faqcoach_render::html::generate_page;
use faqcoach_render::{JsonPresenter, Presenter, TextPresenter};

use super::{build_engine, load_settings, Overrides};

pub async fn execute(overrides: Overrides, id: String, answer: String, format: String) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "html" | "json"),
        "unknown format '{format}' (expected text, html, or json)"
    );

    let config = load_settings(&overrides)?;
    let bank = FaqBank::new(read_faq_entries(&config.faq)?);
    let entry = bank.get(&id)?;

    let engine = build_engine(&config)?;
    let mut machine = SessionStateMachine::with_entry(engine, Arc::new(bank), &entry);
    let session = machine.submit(&answer, &NoopObserver).await?;

    let output = match format.as_str() {
        "html" => generate_page(session),
        "json" => JsonPresenter::new().render(session),
        _ => TextPresenter::new().render(session),
    };
    println!("{output}");

    Ok(())
}
