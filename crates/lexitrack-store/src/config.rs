//! Configuration loading and registry setup.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use lexitrack_core::parser::{builtin_schemas, load_schemas};
use lexitrack_core::schema::FeatureSchemaRegistry;

use crate::languages::{LanguageDirectory, SEED_LANGUAGES};

/// Environment variable that replaces `schema_dirs` with a single path.
pub const SCHEMA_DIR_ENV: &str = "LEXITRACK_SCHEMA_DIR";

/// Top-level lexitrack configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexitrackConfig {
    /// Directories (or single files) holding schema TOML files.
    #[serde(default = "default_schema_dirs")]
    pub schema_dirs: Vec<PathBuf>,
    /// Register the built-in Spanish and Latin schemas first.
    #[serde(default = "default_true")]
    pub builtin_schemas: bool,
    /// Language codes the directory knows about.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Language used when a command is not given one.
    #[serde(default)]
    pub default_language: Option<String>,
}

fn default_schema_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("schemas")]
}
fn default_true() -> bool {
    true
}
fn default_languages() -> Vec<String> {
    SEED_LANGUAGES.iter().map(|(code, _, _)| code.to_string()).collect()
}

impl Default for LexitrackConfig {
    fn default() -> Self {
        Self {
            schema_dirs: default_schema_dirs(),
            builtin_schemas: true,
            languages: default_languages(),
            default_language: None,
        }
    }
}

impl LexitrackConfig {
    /// Build a schema registry: built-ins first, then every configured
    /// directory in order, so later files replace earlier schemas.
    /// Directories that do not exist are skipped.
    pub fn build_registry(&self) -> Result<FeatureSchemaRegistry> {
        let mut registry = FeatureSchemaRegistry::new();
        if self.builtin_schemas {
            for file in builtin_schemas()? {
                file.register_into(&mut registry);
            }
        }
        for dir in &self.schema_dirs {
            if !dir.exists() {
                tracing::debug!("schema path {} does not exist, skipping", dir.display());
                continue;
            }
            for file in load_schemas(dir)? {
                file.register_into(&mut registry);
            }
        }
        Ok(registry)
    }

    /// A language directory holding the configured languages.
    pub fn language_directory(&self) -> LanguageDirectory {
        LanguageDirectory::with_codes(&self.languages)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `lexitrack.toml` in the current directory
/// 2. `~/.config/lexitrack/config.toml`
///
/// Environment variable override: `LEXITRACK_SCHEMA_DIR`.
pub fn load_config() -> Result<LexitrackConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<LexitrackConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("lexitrack.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<LexitrackConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => LexitrackConfig::default(),
    };

    // Relative schema paths in a config file are relative to that file.
    let base = config_path
        .as_deref()
        .and_then(Path::parent)
        .filter(|b| !b.as_os_str().is_empty());
    config.schema_dirs = config
        .schema_dirs
        .iter()
        .map(|p| {
            let p = resolve_path(p);
            match base {
                Some(base) if p.is_relative() => base.join(p),
                _ => p,
            }
        })
        .collect();

    if let Ok(dir) = std::env::var(SCHEMA_DIR_ENV) {
        if !dir.is_empty() {
            config.schema_dirs = vec![PathBuf::from(resolve_env_vars(&dir))];
        }
    }

    tracing::debug!(
        source = ?config_path,
        schema_dirs = ?config.schema_dirs,
        "loaded configuration"
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("lexitrack"))
}
