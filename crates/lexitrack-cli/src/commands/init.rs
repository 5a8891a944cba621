//! The `lexitrack init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create lexitrack.toml
    if std::path::Path::new("lexitrack.toml").exists() {
        println!("lexitrack.toml already exists, skipping.");
    } else {
        std::fs::write("lexitrack.toml", SAMPLE_CONFIG)?;
        println!("Created lexitrack.toml");
    }

    // Create example schema
    std::fs::create_dir_all("schemas")?;
    let example_path = std::path::Path::new("schemas/example.toml");
    if example_path.exists() {
        println!("schemas/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_SCHEMA)?;
        println!("Created schemas/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit schemas/example.toml or add a file per language");
    println!("  2. Run: lexitrack validate --schema schemas");
    println!("  3. Run: lexitrack schema --language it");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# lexitrack configuration

# Schema files or directories, loaded after the built-in Spanish and Latin
# schemas. Later files replace earlier schemas for the same word class.
schema_dirs = ["schemas"]
builtin_schemas = true

languages = ["en", "es", "fr", "de", "it", "pt", "ru", "ja", "zh", "ko", "la"]
default_language = "es"
"#;

const EXAMPLE_SCHEMA: &str = r#"[language]
code = "it"
name = "Italian"

[[word_classes]]
name = "noun"
[word_classes.features]
number = ["singular", "plural"]
gender = ["masculine", "feminine"]

[[word_classes]]
name = "verb"
[word_classes.features]
mood = ["indicative", "subjunctive", "conditional", "imperative"]
tense = ["present", "imperfect", "past_remote", "future"]
person = [1, 2, 3]
number = ["singular", "plural"]
"#;
