//! The `lexitrack import` command.

use std::path::PathBuf;

use anyhow::Result;

use lexitrack_core::import::{ImportCoordinator, ImportSummary, SkipReason};
use lexitrack_core::traits::LanguageResolver;
use lexitrack_store::{load_config_from, MemoryStore, RecordFile};

pub fn execute(
    records: PathBuf,
    language: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    if !matches!(format.as_str(), "text" | "json") {
        anyhow::bail!("unknown format '{format}'; expected text or json");
    }

    let config = load_config_from(config_path.as_deref())?;
    let languages = config.language_directory();

    let language_id = match &language {
        Some(code) => Some(
            languages
                .language_by_code(code)
                .ok_or_else(|| anyhow::anyhow!("unknown language '{code}'; add it to `languages` in lexitrack.toml"))?
                .id,
        ),
        None => None,
    };

    let store = MemoryStore::new();
    let coordinator = ImportCoordinator::new(&store, &languages);
    let summary = coordinator.import_from(&RecordFile::new(&records), language_id)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, &store)?;
    }

    Ok(())
}

fn print_summary(summary: &ImportSummary, store: &MemoryStore) -> Result<()> {
    println!(
        "Imported {} of {} record(s): {} created, {} updated, {} skipped",
        summary.imported(),
        summary.total(),
        summary.created,
        summary.updated,
        summary.skipped
    );

    if !summary.skips.is_empty() {
        println!("\nSkipped:");
        for skip in &summary.skips {
            let reason = match &skip.reason {
                SkipReason::UnresolvedLanguage { code: Some(code) } => {
                    format!("unknown language '{code}'")
                }
                SkipReason::UnresolvedLanguage { code: None } => "no language".to_string(),
                SkipReason::Invalid { message } => message.clone(),
            };
            let text = if skip.text.is_empty() { "(empty)" } else { skip.text.as_str() };
            println!("  {text}: {reason}");
        }
    }

    let words = store.all_words()?;
    if !words.is_empty() {
        println!("\nWords:");
        for word in &words {
            println!(
                "  {} ({} form(s), {} translation(s))",
                word.key(),
                word.word_forms.len(),
                word.translations.values().map(Vec::len).sum::<usize>()
            );
        }
    }

    Ok(())
}
