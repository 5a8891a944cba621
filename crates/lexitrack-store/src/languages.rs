//! Language directory.

use std::collections::BTreeMap;
use std::sync::RwLock;

use uuid::Uuid;

use lexitrack_core::model::Language;
use lexitrack_core::traits::LanguageResolver;

/// Languages known out of the box: code, English name, native name.
pub const SEED_LANGUAGES: &[(&str, &str, &str)] = &[
    ("en", "English", "English"),
    ("es", "Spanish", "Español"),
    ("fr", "French", "Français"),
    ("de", "German", "Deutsch"),
    ("it", "Italian", "Italiano"),
    ("pt", "Portuguese", "Português"),
    ("ru", "Russian", "Русский"),
    ("ja", "Japanese", "日本語"),
    ("zh", "Chinese", "中文"),
    ("ko", "Korean", "한국어"),
    ("la", "Latin", "Latina"),
];

/// Languages keyed by code.
#[derive(Debug, Default)]
pub struct LanguageDirectory {
    languages: RwLock<BTreeMap<String, Language>>,
}

impl LanguageDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory holding every seeded language.
    pub fn seeded() -> Self {
        let directory = Self::new();
        for (code, name, display_name) in SEED_LANGUAGES {
            directory.insert(Language::new(code, name, display_name));
        }
        directory
    }

    /// A directory holding the given codes. Seeded codes keep their names;
    /// other codes are named by their upper-cased code.
    pub fn with_codes<S: AsRef<str>>(codes: &[S]) -> Self {
        let directory = Self::new();
        for code in codes {
            directory.find_or_insert(code.as_ref(), None, None);
        }
        directory
    }

    /// Add or replace a language.
    pub fn insert(&self, language: Language) {
        if let Ok(mut languages) = self.languages.write() {
            languages.insert(language.code.clone(), language);
        }
    }

    /// The language for `code`, created with defaults if unknown. The name
    /// defaults to the seeded name or the upper-cased code, and the display
    /// name to the name.
    pub fn find_or_insert(&self, code: &str, name: Option<&str>, display_name: Option<&str>) -> Language {
        if let Some(existing) = self.language_by_code(code) {
            return existing;
        }

        let seed = SEED_LANGUAGES.iter().find(|(c, _, _)| *c == code);
        let fallback_name = code.to_uppercase();
        let name = name
            .or(seed.map(|(_, n, _)| *n))
            .unwrap_or(fallback_name.as_str());
        let display_name = display_name.or(seed.map(|(_, _, d)| *d)).unwrap_or(name);

        let language = Language::new(code, name, display_name);
        tracing::debug!(code, name, "adding language");
        self.insert(language.clone());
        language
    }

    /// Mark a language as (un)available. Returns `false` for unknown codes.
    pub fn set_available(&self, code: &str, available: bool) -> bool {
        let Ok(mut languages) = self.languages.write() else {
            return false;
        };
        match languages.get_mut(code) {
            Some(language) => {
                language.is_available = available;
                true
            }
            None => false,
        }
    }

    /// Available languages ordered by name.
    pub fn available(&self) -> Vec<Language> {
        let mut available: Vec<Language> = self
            .languages
            .read()
            .map(|l| l.values().filter(|l| l.is_available).cloned().collect())
            .unwrap_or_default();
        available.sort_by(|a, b| a.name.cmp(&b.name));
        available
    }

    pub fn len(&self) -> usize {
        self.languages.read().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LanguageResolver for LanguageDirectory {
    fn language(&self, id: Uuid) -> Option<Language> {
        self.languages
            .read()
            .ok()?
            .values()
            .find(|l| l.id == id)
            .cloned()
    }

    fn language_by_code(&self, code: &str) -> Option<Language> {
        self.languages.read().ok()?.get(code).cloned()
    }
}
