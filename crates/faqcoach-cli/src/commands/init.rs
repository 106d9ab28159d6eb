//! The `faqcoach init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("faqcoach.toml").exists() {
        println!("faqcoach.toml already exists, skipping.");
    } else {
        std::fs::write("faqcoach.toml", SAMPLE_CONFIG)?;
        println!("Created faqcoach.toml");
    }

    if std::path::Path::new("faq.toml").exists() {
        println!("faq.toml already exists, skipping.");
    } else {
        std::fs::write("faq.toml", SAMPLE_FAQ)?;
        println!("Created faq.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit faq.toml with your approved answers");
    println!("  2. Run: faqcoach validate --faq faq.toml");
    println!("  3. Run: faqcoach quiz --local-only");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# faqcoach configuration

faq = "faq.toml"

[feedback]
show_placeholder_text = true
local_only = false
forbidden_phrases = ["research subject", "research subjects", "human subject", "human subjects"]
suggestion_timeout_secs = 30
max_suggestion_retries = 2
retry_delay_ms = 500

# Offline scoring; switch to the Hugging Face model for semantic similarity:
# [scorer]
# type = "huggingface"
# api_token = "${HF_TOKEN}"
[scorer]
type = "lexical"

[suggester]
type = "openai"
api_key = "${OPENAI_API_KEY}"
model = "gpt-4o-mini"

# Or a local model:
# [suggester]
# type = "ollama"
# base_url = "http://localhost:11434"
# model = "llama3.2"
"#;

const SAMPLE_FAQ: &str = r#"[entries.irb-purpose]
question = "What does the IRB do?"
answer = "The IRB reviews research involving people to protect the rights and welfare of participants."
status = "Approved wording. Always say participants, never subjects."

[entries.consent-form]
question = "Do participants always have to sign a consent form?"
answer = "Usually, yes. The IRB can waive written documentation of consent for minimal-risk research, but participants must still be informed."
status = "Approved wording."

[entries.withdrawal]
question = "Can a participant leave a study after enrolling?"
answer = "Yes. Participants may withdraw at any time without penalty or loss of benefits."
"#;
