//! Schema and raw record file parsing.
//!
//! Loads feature schemas from TOML files and directories, validates them
//! against the ordering table, and reads scraper JSON exports.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::import::{MalformedRecord, RecordEntry};
use crate::ordering::OrderingTable;
use crate::schema::{FeatureSchema, FeatureSchemaRegistry};

const BUILTIN_SCHEMAS: &[(&str, &str)] = &[
    ("es.toml", include_str!("../schemas/es.toml")),
    ("la.toml", include_str!("../schemas/la.toml")),
];

/// Intermediate TOML structure for schema files.
#[derive(Debug, Deserialize)]
struct TomlSchemaFile {
    language: TomlLanguage,
    #[serde(default)]
    word_classes: Vec<TomlWordClass>,
}

#[derive(Debug, Deserialize)]
struct TomlLanguage {
    code: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct TomlWordClass {
    name: String,
    #[serde(default)]
    features: BTreeMap<String, Vec<TomlValue>>,
}

/// Feature values may be written as strings or integers (`person = [1, 2, 3]`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlValue {
    Str(String),
    Int(i64),
}

impl TomlValue {
    fn into_string(self) -> String {
        match self {
            TomlValue::Str(s) => s,
            TomlValue::Int(i) => i.to_string(),
        }
    }
}

/// Schemas for one language, as read from one file.
#[derive(Debug, Clone)]
pub struct SchemaFile {
    pub language_code: String,
    pub language_name: String,
    pub word_classes: Vec<WordClassSchema>,
    /// Where the file was read from.
    pub source: PathBuf,
}

#[derive(Debug, Clone)]
pub struct WordClassSchema {
    pub name: String,
    pub schema: FeatureSchema,
}

impl SchemaFile {
    /// Register every word class into `registry`. Returns how many were
    /// registered.
    pub fn register_into(&self, registry: &mut FeatureSchemaRegistry) -> usize {
        for class in &self.word_classes {
            registry.register(&self.language_code, &class.name, class.schema.clone());
        }
        tracing::info!(
            language = %self.language_code,
            word_classes = self.word_classes.len(),
            source = %self.source.display(),
            "registered schemas"
        );
        self.word_classes.len()
    }
}

/// Parse a single TOML schema file.
pub fn parse_schema_file(path: &Path) -> Result<SchemaFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file: {}", path.display()))?;

    parse_schema_str(&content, path)
}

/// Parse a TOML string into a `SchemaFile`.
pub fn parse_schema_str(content: &str, source_path: &Path) -> Result<SchemaFile> {
    let parsed: TomlSchemaFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let language_code = parsed.language.code.trim().to_string();
    if language_code.is_empty() {
        anyhow::bail!("{}: language code is empty", source_path.display());
    }

    let word_classes = parsed
        .word_classes
        .into_iter()
        .map(|c| {
            if c.name.trim().is_empty() {
                anyhow::bail!("{}: word class name is empty", source_path.display());
            }
            let schema = c
                .features
                .into_iter()
                .map(|(name, values)| {
                    (
                        name,
                        values.into_iter().map(TomlValue::into_string).collect::<Vec<_>>(),
                    )
                })
                .collect();
            Ok(WordClassSchema {
                name: c.name,
                schema,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SchemaFile {
        language_code,
        language_name: parsed.language.name,
        word_classes,
        source: source_path.to_path_buf(),
    })
}

/// Recursively load all `.toml` schema files from a directory, in path
/// order. Unparsable files are skipped with a warning.
pub fn load_schema_directory(dir: &Path) -> Result<Vec<SchemaFile>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        paths.push(entry?.path());
    }
    paths.sort();

    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(load_schema_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_schema_file(&path) {
                Ok(file) => files.push(file),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(files)
}

/// Load a schema file or every schema file under a directory.
pub fn load_schemas(path: &Path) -> Result<Vec<SchemaFile>> {
    if path.is_dir() {
        load_schema_directory(path)
    } else {
        Ok(vec![parse_schema_file(path)?])
    }
}

/// The Spanish and Latin schemas compiled into the crate.
pub fn builtin_schemas() -> Result<Vec<SchemaFile>> {
    BUILTIN_SCHEMAS
        .iter()
        .map(|(name, content)| parse_schema_str(content, Path::new(name)))
        .collect()
}

/// A registry holding only the built-in schemas.
pub fn builtin_registry() -> Result<FeatureSchemaRegistry> {
    let mut registry = FeatureSchemaRegistry::new();
    for file in builtin_schemas()? {
        file.register_into(&mut registry);
    }
    Ok(registry)
}

/// A warning from schema validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The word class (if applicable).
    pub word_class: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a schema file for common issues.
pub fn validate_schema_file(file: &SchemaFile, orderings: &OrderingTable) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen_classes = HashSet::new();

    for class in &file.word_classes {
        let warn = |message: String| ValidationWarning {
            word_class: Some(class.name.clone()),
            message,
        };

        if !seen_classes.insert(class.name.as_str()) {
            warnings.push(warn(format!(
                "duplicate word class '{}'; the last one wins",
                class.name
            )));
        }

        for (feature, values) in class.schema.iter() {
            if values.is_empty() {
                warnings.push(warn(format!("feature '{feature}' has no values")));
            }
            let mut seen_values = HashSet::new();
            for value in values {
                if !seen_values.insert(value) {
                    warnings.push(warn(format!("feature '{feature}' lists '{value}' twice")));
                }
            }
        }

        match orderings.get(&class.name) {
            None => warnings.push(warn(format!(
                "no feature ordering for '{}'; forms are keyed under 'form'",
                class.name
            ))),
            Some(ordering) if !class.schema.declares(&ordering.primary) => {
                warnings.push(warn(format!(
                    "ordering primary feature '{}' is not declared; its level is skipped",
                    ordering.primary
                )))
            }
            Some(_) => {}
        }
    }

    if file.word_classes.is_empty() {
        warnings.push(ValidationWarning {
            word_class: None,
            message: "file declares no word classes".into(),
        });
    }

    warnings
}

/// Read a raw record JSON file.
pub fn parse_raw_records(path: &Path) -> Result<Vec<RecordEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read record file: {}", path.display()))?;

    parse_raw_records_str(&content, path)
}

/// Parse raw records: either a JSON array, or an object keyed by headword
/// where a record without `text` takes its key.
///
/// Each record is decoded on its own; one that does not fit the record
/// shape becomes an `Err` entry and the others are still returned. Only a
/// file that is not JSON, or not an array or object, is an error.
pub fn parse_raw_records_str(content: &str, source_path: &Path) -> Result<Vec<RecordEntry>> {
    let parsed: serde_json::Value = serde_json::from_str(content)
        .with_context(|| format!("failed to parse records: {}", source_path.display()))?;

    let entries = match parsed {
        serde_json::Value::Array(values) => values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let label = value
                    .get("text")
                    .and_then(serde_json::Value::as_str)
                    .filter(|text| !text.is_empty())
                    .map(String::from)
                    .unwrap_or_else(|| format!("record #{}", index + 1));
                decode_record(value, label)
            })
            .collect(),
        serde_json::Value::Object(by_headword) => by_headword
            .into_iter()
            .map(|(headword, value)| {
                decode_record(value, headword.clone()).map(|mut record| {
                    if record.text.is_empty() {
                        record.text = headword;
                    }
                    record
                })
            })
            .collect(),
        _ => anyhow::bail!(
            "failed to parse records: {}: expected an array or an object of records",
            source_path.display()
        ),
    };
    Ok(entries)
}

fn decode_record(value: serde_json::Value, label: String) -> RecordEntry {
    serde_json::from_value(value).map_err(|e| {
        tracing::debug!(record = %label, "malformed record: {e}");
        MalformedRecord {
            text: label,
            message: format!("malformed record: {e}"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FeatureAssignment;
    use crate::import::RawRecord;
    use std::path::PathBuf;

    const LATIN_NOUNS: &str = r#"
[language]
code = "la"
name = "Latin"

[[word_classes]]
name = "noun"
[word_classes.features]
case = ["nominative", "genitive", "dative"]
number = ["singular", "plural"]
"#;

    #[test]
    fn parse_valid_toml() {
        let file = parse_schema_str(LATIN_NOUNS, &PathBuf::from("la.toml")).unwrap();
        assert_eq!(file.language_code, "la");
        assert_eq!(file.language_name, "Latin");
        assert_eq!(file.word_classes.len(), 1);
        assert_eq!(file.word_classes[0].name, "noun");
        assert_eq!(file.word_classes[0].schema.values("number"), &["singular", "plural"]);
    }

    #[test]
    fn integer_values_become_strings() {
        let toml = r#"
[language]
code = "es"

[[word_classes]]
name = "verb"
[word_classes.features]
person = [1, 2, 3]
"#;
        let file = parse_schema_str(toml, &PathBuf::from("es.toml")).unwrap();
        assert_eq!(file.word_classes[0].schema.values("person"), &["1", "2", "3"]);
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_schema_str(bad, &PathBuf::from("bad.toml")).is_err());
        let no_code = "[language]\ncode = \"\"\n";
        assert!(parse_schema_str(no_code, &PathBuf::from("empty.toml")).is_err());
    }

    #[test]
    fn validate_flags_common_mistakes() {
        let toml = r#"
[language]
code = "xx"

[[word_classes]]
name = "noun"
[word_classes.features]
number = ["singular", "singular"]
gender = []

[[word_classes]]
name = "clitic"
[word_classes.features]
person = [1]
"#;
        let file = parse_schema_str(toml, &PathBuf::from("xx.toml")).unwrap();
        let warnings = validate_schema_file(&file, OrderingTable::standard());
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("'singular' twice")));
        assert!(messages.iter().any(|m| m.contains("'gender' has no values")));
        assert!(messages.iter().any(|m| m.contains("'case' is not declared")));
        assert!(messages.iter().any(|m| m.contains("no feature ordering for 'clitic'")));
    }

    #[test]
    fn clean_file_has_no_warnings() {
        let file = parse_schema_str(LATIN_NOUNS, &PathBuf::from("la.toml")).unwrap();
        assert!(validate_schema_file(&file, OrderingTable::standard()).is_empty());
    }

    #[test]
    fn load_directory_recurses_and_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("la.toml"), LATIN_NOUNS).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "[language").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let nested = dir.path().join("more");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(
            nested.join("es.toml"),
            "[language]\ncode = \"es\"\n[[word_classes]]\nname = \"noun\"\n",
        )
        .unwrap();

        let files = load_schema_directory(dir.path()).unwrap();
        let codes: Vec<&str> = files.iter().map(|f| f.language_code.as_str()).collect();
        assert_eq!(codes, vec!["la", "es"]);
        assert!(load_schema_directory(&dir.path().join("la.toml")).is_err());
    }

    #[test]
    fn builtin_registry_knows_spanish_and_latin() {
        let registry = builtin_registry().unwrap();
        assert_eq!(registry.languages(), vec!["es", "la"]);
        assert_eq!(
            registry.word_classes_for("la"),
            vec!["gerund", "noun", "participle", "supine", "verb"]
        );
        let subjunctive: FeatureAssignment = [("mood", "subjunctive")].into_iter().collect();
        assert!(registry.is_valid("es", "verb", &subjunctive));
        let optative: FeatureAssignment = [("mood", "optative")].into_iter().collect();
        assert!(!registry.is_valid("es", "verb", &optative));
        assert_eq!(registry.values_for_feature("la", "verb", "person"), &["1", "2", "3"]);
    }

    #[test]
    fn builtin_latin_only_warns_about_supine() {
        let files = builtin_schemas().unwrap();
        let latin = files.iter().find(|f| f.language_code == "la").unwrap();
        let warnings = validate_schema_file(latin, OrderingTable::standard());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].word_class.as_deref(), Some("supine"));
    }

    #[test]
    fn records_as_array_or_keyed_object() {
        let array = r#"[{"text": "perro", "language_code": "es", "word_class": "noun"}]"#;
        let records = parse_raw_records_str(array, &PathBuf::from("a.json")).unwrap();
        let perro = records[0].as_ref().unwrap();
        assert_eq!(perro.text, "perro");
        assert!(perro.definitions.is_empty());

        let keyed = r#"{
            "rosa": {"language_code": "la", "word_class": "noun",
                     "word_forms": {"genitive": {"singular": "rosae"}}},
            "amo": {"text": "amare", "language_code": "la", "word_class": "verb"}
        }"#;
        let records: Vec<RawRecord> = parse_raw_records_str(keyed, &PathBuf::from("k.json"))
            .unwrap()
            .into_iter()
            .map(|entry| entry.unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "amare");
        assert_eq!(records[1].text, "rosa");
        assert_eq!(records[1].word_forms.len(), 1);

        assert!(parse_raw_records_str("42", &PathBuf::from("n.json")).is_err());
        assert!(parse_raw_records_str("[", &PathBuf::from("n.json")).is_err());
    }

    #[test]
    fn one_bad_record_does_not_sink_the_file() {
        let content = r#"[
            {"text": "rosa", "language_code": "la", "word_class": "noun"},
            {"text": "et", "language_code": "la", "word_class": null},
            {"text": "saepe", "language_code": "la", "word_class": "adverb", "frequency": "often"},
            {"language_code": "la", "word_class": "verb", "frequency": -3},
            {"text": "amare", "language_code": "la", "word_class": "verb"}
        ]"#;
        let entries = parse_raw_records_str(content, &PathBuf::from("p.json")).unwrap();
        assert_eq!(entries.len(), 5);

        // A null class decodes; the importer rejects the empty class later.
        let et = entries[1].as_ref().unwrap();
        assert!(et.word_class.is_empty());

        let saepe = entries[2].as_ref().unwrap_err();
        assert_eq!(saepe.text, "saepe");
        assert!(saepe.message.starts_with("malformed record"));
        assert_eq!(entries[3].as_ref().unwrap_err().text, "record #4");

        assert_eq!(entries[4].as_ref().unwrap().text, "amare");
    }

    #[test]
    fn keyed_malformed_record_is_labelled_by_headword() {
        let keyed = r#"{"rosa": {"word_class": "noun", "tags": "flowers"}}"#;
        let entries = parse_raw_records_str(keyed, &PathBuf::from("k.json")).unwrap();
        assert_eq!(entries[0].as_ref().unwrap_err().text, "rosa");
    }
}
