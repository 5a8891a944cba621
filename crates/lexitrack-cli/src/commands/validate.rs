//! The `lexitrack validate` command.

use std::path::PathBuf;

use anyhow::Result;

use lexitrack_core::ordering::OrderingTable;
use lexitrack_core::parser::{load_schemas, validate_schema_file};

pub fn execute(schema_path: PathBuf) -> Result<()> {
    let files = load_schemas(&schema_path)?;
    if files.is_empty() {
        anyhow::bail!("no schema files found in {}", schema_path.display());
    }

    let mut total_warnings = 0;

    for file in &files {
        println!(
            "Schema: {} ({}), {} word class(es) [{}]",
            file.language_code,
            if file.language_name.is_empty() {
                "unnamed"
            } else {
                file.language_name.as_str()
            },
            file.word_classes.len(),
            file.source.display()
        );

        let warnings = validate_schema_file(file, OrderingTable::standard());
        for w in &warnings {
            let prefix = w
                .word_class
                .as_ref()
                .map(|class| format!("  [{class}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All schemas valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
