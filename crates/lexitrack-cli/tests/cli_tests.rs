//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const REPO_SCHEMAS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../schemas");
const RECORDS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/records.json");
const MIXED_RECORDS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/mixed_records.json");

fn lexitrack() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("lexitrack").unwrap()
}

/// Run inside `dir` with no user config or schema override in reach.
fn lexitrack_in(dir: &Path) -> Command {
    let mut cmd = lexitrack();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("LEXITRACK_SCHEMA_DIR");
    cmd
}

#[test]
fn help_output() {
    lexitrack()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vocabulary review scheduling"));
}

#[test]
fn version_output() {
    lexitrack()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lexitrack"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    lexitrack_in(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created lexitrack.toml"))
        .stdout(predicate::str::contains("Created schemas/example.toml"));

    assert!(dir.path().join("lexitrack.toml").exists());
    assert!(dir.path().join("schemas/example.toml").exists());

    // The generated files are usable right away.
    lexitrack_in(dir.path())
        .arg("validate")
        .arg("--schema")
        .arg("schemas")
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema: it (Italian)"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    lexitrack_in(dir.path()).arg("init").assert().success();

    lexitrack_in(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_repo_schemas() {
    lexitrack()
        .arg("validate")
        .arg("--schema")
        .arg(REPO_SCHEMAS)
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema: de (German), 4 word class(es)"))
        .stdout(predicate::str::contains("All schemas valid"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("fr.toml"),
        r#"
[language]
code = "fr"
name = "French"

[[word_classes]]
name = "noun"
[word_classes.features]
number = ["singular", "plural", "plural"]
"#,
    )
    .unwrap();

    lexitrack()
        .arg("validate")
        .arg("--schema")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[noun] WARNING"))
        .stdout(predicate::str::contains("'plural' twice"))
        .stdout(predicate::str::contains("2 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    lexitrack()
        .arg("validate")
        .arg("--schema")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn schema_shows_builtin_latin_nouns() {
    let dir = TempDir::new().unwrap();

    lexitrack_in(dir.path())
        .args(["schema", "--language", "la", "--word-class", "noun"])
        .assert()
        .success()
        .stdout(predicate::str::contains("noun: case > number"))
        .stdout(predicate::str::contains("genitive"))
        .stdout(predicate::str::contains("primary"))
        .stdout(predicate::str::contains("secondary #1"))
        .stdout(predicate::str::contains("composite"));
}

#[test]
fn schema_uses_default_language_from_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("lexitrack.toml"), "default_language = \"la\"\n").unwrap();

    lexitrack_in(dir.path())
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("participle"))
        .stdout(predicate::str::contains("supine"));
}

#[test]
fn schema_without_language_fails() {
    let dir = TempDir::new().unwrap();

    lexitrack_in(dir.path())
        .arg("schema")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no language given"));
}

#[test]
fn schema_unknown_language_is_not_an_error() {
    let dir = TempDir::new().unwrap();

    lexitrack_in(dir.path())
        .args(["schema", "--language", "xx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No schemas registered for language 'xx'"));
}

#[test]
fn schema_dir_from_environment() {
    let dir = TempDir::new().unwrap();

    lexitrack_in(dir.path())
        .env("LEXITRACK_SCHEMA_DIR", REPO_SCHEMAS)
        .args(["schema", "--language", "de", "--word-class", "adjective"])
        .assert()
        .success()
        .stdout(predicate::str::contains("declension"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();

    lexitrack_in(dir.path())
        .args(["schema", "--language", "la", "--config", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn forms_encodes_noun_path() {
    let dir = TempDir::new().unwrap();

    lexitrack_in(dir.path())
        .args(["forms", "--language", "la", "--word-class", "noun"])
        .args(["--feature", "number=plural", "--feature", "case=genitive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ordering: case > number"))
        .stdout(predicate::str::contains("Path: genitive.plural.form"))
        .stdout(predicate::str::contains("Valid: yes"));
}

#[test]
fn forms_keeps_leftover_features_in_a_composite_key() {
    let dir = TempDir::new().unwrap();

    lexitrack_in(dir.path())
        .args(["forms", "--language", "es", "--word-class", "verb"])
        .args([
            "--feature",
            "mood=indicative",
            "--feature",
            "tense=present",
            "--feature",
            "person=1",
            "--feature",
            "number=singular",
            "--feature",
            "type=negative",
            "--feature",
            "aspect=perfect",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Path: indicative.present.1.singular.aspect:perfect.type:negative",
        ));
}

#[test]
fn forms_rejects_illegal_value() {
    let dir = TempDir::new().unwrap();

    lexitrack_in(dir.path())
        .args(["forms", "--language", "es", "--word-class", "verb"])
        .args(["--feature", "mood=optative"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Valid: no"))
        .stdout(predicate::str::contains("'optative' is not a legal value of 'mood'"))
        .stderr(predicate::str::contains("not valid for es verb"));
}

#[test]
fn forms_rejects_malformed_feature() {
    let dir = TempDir::new().unwrap();

    lexitrack_in(dir.path())
        .args(["forms", "--language", "es", "--word-class", "verb", "--feature", "mood"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected name=value"));
}

#[test]
fn review_correct_from_level_three() {
    lexitrack()
        .args(["review", "--level", "3", "--outcome", "correct"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Level: 3 (Familiar) -> 4 (Known)"))
        .stdout(predicate::str::contains("Interval: 14 day(s) (2w)"));
}

#[test]
fn review_incorrect_from_zero_moves_up() {
    lexitrack()
        .args(["review", "--level", "0", "--outcome", "incorrect"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Level: 0 (Unknown) -> 1 (Seen)"));
}

#[test]
fn review_preview_lists_every_outcome() {
    lexitrack()
        .args(["review", "--level", "5", "--preview"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mastered"))
        .stdout(predicate::str::contains("1mo"))
        .stdout(predicate::str::contains("2w"));
}

#[test]
fn review_rejects_unknown_outcome() {
    lexitrack()
        .args(["review", "--level", "2", "--outcome", "easy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid review outcome"));
}

#[test]
fn review_rejects_out_of_range_level() {
    lexitrack()
        .args(["review", "--level", "6", "--outcome", "correct"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn review_needs_outcome_or_preview() {
    lexitrack().args(["review", "--level", "2"]).assert().failure();
}

#[test]
fn import_fixture_counts_skips() {
    let dir = TempDir::new().unwrap();

    lexitrack_in(dir.path())
        .args(["import", "--records", RECORDS])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Imported 3 of 6 record(s): 3 created, 0 updated, 3 skipped",
        ))
        .stdout(predicate::str::contains("Hund: no language"))
        .stdout(predicate::str::contains("chien: unknown language 'xx'"))
        .stdout(predicate::str::contains("malus: difficulty out of range"))
        .stdout(predicate::str::contains("la:rosa (noun) (4 form(s), 1 translation(s))"));
}

#[test]
fn import_with_explicit_language() {
    let dir = TempDir::new().unwrap();

    lexitrack_in(dir.path())
        .args(["import", "--records", RECORDS, "--language", "la"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 created"))
        .stdout(predicate::str::contains("la:Hund (noun)"));
}

#[test]
fn import_json_summary() {
    let dir = TempDir::new().unwrap();

    let output = lexitrack_in(dir.path())
        .args(["import", "--records", RECORDS, "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["created"], 3);
    assert_eq!(summary["skipped"], 3);
    assert_eq!(summary["skips"][0]["reason"]["kind"], "unresolved_language");
}

#[test]
fn import_unknown_language_fails() {
    let dir = TempDir::new().unwrap();

    lexitrack_in(dir.path())
        .args(["import", "--records", RECORDS, "--language", "tlh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown language 'tlh'"));
}

#[test]
fn import_skips_malformed_records_and_keeps_going() {
    let dir = TempDir::new().unwrap();

    lexitrack_in(dir.path())
        .args(["import", "--records", MIXED_RECORDS])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Imported 2 of 4 record(s): 2 created, 0 updated, 2 skipped",
        ))
        .stdout(predicate::str::contains("et: invalid word: word class is empty"))
        .stdout(predicate::str::contains("saepe: malformed record"))
        .stdout(predicate::str::contains("la:amare (verb)"));
}

#[test]
fn import_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();

    lexitrack_in(dir.path())
        .args(["import", "--records", RECORDS, "--format", "yaml"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unknown format 'yaml'"));
}
