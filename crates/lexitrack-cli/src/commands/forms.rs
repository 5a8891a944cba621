//! The `lexitrack forms` command.

use std::path::PathBuf;

use anyhow::Result;

use lexitrack_core::forms::{FeatureAssignment, FormPath};
use lexitrack_core::ordering::OrderingTable;
use lexitrack_store::load_config_from;

pub fn execute(
    language: Option<String>,
    word_class: String,
    features: Vec<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let language = super::resolve_language(language, &config)?;
    let registry = config.build_registry()?;

    let assignment = FeatureAssignment::parse_pairs(features.iter().map(String::as_str))?;
    let ordering = OrderingTable::standard().for_word_class(&word_class);
    let path = FormPath::encode(ordering, &assignment);

    println!(
        "Ordering: {}",
        ordering.features().collect::<Vec<_>>().join(" > ")
    );
    println!("Path: {path}");

    let violations = registry.violations(&language, &word_class, &assignment);
    if violations.is_empty() {
        println!("Valid: yes");
        return Ok(());
    }

    println!("Valid: no");
    for v in &violations {
        println!("  - {v}");
    }
    anyhow::bail!(
        "feature assignment is not valid for {language} {word_class} ({} problem(s))",
        violations.len()
    )
}
