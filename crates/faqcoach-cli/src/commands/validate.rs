//! The `faqcoach validate` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use faqcoach_core::bank::{read_faq_entries, validate_bank};

pub fn execute(faq_path: PathBuf) -> Result<()> {
    let entries = read_faq_entries(&faq_path)?;
    println!("FAQ: {} ({} entries)", faq_path.display(), entries.len());

    let warnings = validate_bank(&entries);
    if warnings.is_empty() {
        println!("All entries valid.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Entry", "Warning"]);
    for w in &warnings {
        table.add_row(vec![
            Cell::new(w.entry_id.as_deref().unwrap_or("-")),
            Cell::new(&w.message),
        ]);
    }

    println!("{table}");
    println!("\n{} warning(s) found.", warnings.len());

    Ok(())
}
