//! The `lexitrack schema` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use lexitrack_core::ordering::OrderingTable;
use lexitrack_store::load_config_from;

pub fn execute(language: Option<String>, word_class: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let language = super::resolve_language(language, &config)?;
    let registry = config.build_registry()?;

    let classes: Vec<String> = match word_class {
        Some(class) => vec![class],
        None => registry
            .word_classes_for(&language)
            .into_iter()
            .map(String::from)
            .collect(),
    };

    let mut table = Table::new();
    table.set_header(vec!["Word class", "Ordering", "Feature", "Values"]);
    let mut rows = 0;
    let mut orderings = Vec::new();

    for class in &classes {
        let Some(schema) = registry.get(&language, class) else {
            println!("No schema registered for {language} {class}.");
            continue;
        };
        let ordering = OrderingTable::standard().for_word_class(class);
        orderings.push(format!(
            "{class}: {}",
            ordering.features().collect::<Vec<_>>().join(" > ")
        ));

        for (feature, values) in schema.iter() {
            let position = match ordering.position(feature) {
                Some(0) => "primary".to_string(),
                Some(n) => format!("secondary #{n}"),
                None => "composite".to_string(),
            };
            table.add_row(vec![
                Cell::new(class),
                Cell::new(position),
                Cell::new(feature),
                Cell::new(values.join(", ")),
            ]);
            rows += 1;
        }
    }

    if rows == 0 {
        if classes.is_empty() {
            println!("No schemas registered for language '{language}'.");
        }
        return Ok(());
    }

    println!("{table}");
    println!("\nOrdering:");
    for line in &orderings {
        println!("  {line}");
    }
    Ok(())
}
