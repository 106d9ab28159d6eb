//! The `faqcoach quiz` command.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;

use faqcoach_core::bank::{read_faq_entries, FaqBank};
use faqcoach_core::feedback::ArtifactKind;
use faqcoach_core::model::Session;
use faqcoach_core::{FeedbackObserver, SessionStateMachine};
use faqcoach_render::{Presenter, TextPresenter};

use super::{build_engine, load_settings, Overrides};

/// Prints each card as soon as the state machine merges it.
struct ConsoleObserver {
    presenter: TextPresenter,
}

impl FeedbackObserver for ConsoleObserver {
    fn on_locked(&self, _session: &Session) {
        println!("\nChecking your answer...\n");
    }

    fn on_artifact(&self, session: &Session, kind: ArtifactKind) {
        if let Some(card) = self.presenter.artifact(session, kind) {
            println!("{card}\n");
        }
    }

    fn on_submitted(&self, session: &Session) {
        if let Some(answer) = self.presenter.approved_answer(session) {
            println!("{answer}\n");
        }
    }

    fn on_reset(&self, _session: &Session) {
        println!("----------------------------------------");
    }
}

/// Read answer lines until a blank line. `None` means stdin closed before
/// anything was typed.
fn read_answer(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Option<String>> {
    let mut answer: Vec<String> = Vec::new();
    let mut saw_input = false;
    for line in lines {
        let line = line?;
        saw_input = true;
        if line.trim().is_empty() {
            break;
        }
        answer.push(line);
    }
    Ok(saw_input.then(|| answer.join("\n")))
}

pub async fn execute(overrides: Overrides, seed: Option<u64>) -> Result<()> {
    let config = load_settings(&overrides)?;
    let entries = read_faq_entries(&config.faq)?;
    anyhow::ensure!(
        !entries.is_empty(),
        "no questions found in {}",
        config.faq.display()
    );
    let bank = match seed {
        Some(seed) => FaqBank::with_seed(entries, seed),
        None => FaqBank::new(entries),
    };

    let engine = build_engine(&config)?;
    let mut machine = SessionStateMachine::new(engine, Arc::new(bank))?;
    let observer = ConsoleObserver {
        presenter: TextPresenter::new(),
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut answered = 0u32;

    loop {
        println!("{}", observer.presenter.question(machine.session()));
        println!("Your answer (finish with an empty line):");

        let Some(attempt) = read_answer(&mut lines)? else {
            break;
        };
        machine.submit(&attempt, &observer).await?;
        answered += 1;

        print!("Another question? [Y/n] ");
        io::stdout().flush()?;
        let Some(reply) = lines.next() else {
            break;
        };
        if reply?.trim().eq_ignore_ascii_case("n") {
            break;
        }
        machine.reset(&observer)?;
    }

    println!("\nAnswered {answered} question(s). Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(input: &str) -> impl Iterator<Item = io::Result<String>> + '_ {
        input.lines().map(|l| Ok(l.to_string()))
    }

    #[test]
    fn answer_stops_at_blank_line() {
        let mut input = lines("first line\nsecond line\n\nnext");
        let answer = read_answer(&mut input).unwrap();
        assert_eq!(answer.as_deref(), Some("first line\nsecond line"));
        assert_eq!(input.next().unwrap().unwrap(), "next");
    }

    #[test]
    fn immediate_blank_line_is_an_empty_answer() {
        let answer = read_answer(&mut lines("\n")).unwrap();
        assert_eq!(answer.as_deref(), Some(""));
    }

    #[test]
    fn closed_stdin_ends_the_quiz() {
        assert_eq!(read_answer(&mut lines("")).unwrap(), None);
    }

    #[test]
    fn eof_without_blank_line_keeps_text() {
        let answer = read_answer(&mut lines("only line")).unwrap();
        assert_eq!(answer.as_deref(), Some("only line"));
    }
}
