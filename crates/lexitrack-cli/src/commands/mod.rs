pub mod forms;
pub mod import;
pub mod init;
pub mod review;
pub mod schema;
pub mod validate;

use anyhow::Result;

use lexitrack_store::LexitrackConfig;

/// The language a command works on: the flag, else the config default.
pub(crate) fn resolve_language(flag: Option<String>, config: &LexitrackConfig) -> Result<String> {
    flag.or_else(|| config.default_language.clone()).ok_or_else(|| {
        anyhow::anyhow!("no language given; pass --language or set default_language in lexitrack.toml")
    })
}
