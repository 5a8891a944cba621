//! lexitrack-store: Reference collaborators for lexitrack-core.
//!
//! Provides an in-memory record store, the language directory, a JSON
//! record file source, and configuration loading, so the core can be run
//! end to end without a database.

pub mod config;
pub mod error;
pub mod languages;
pub mod memory;
pub mod source;

pub use config::{load_config, load_config_from, LexitrackConfig};
pub use error::StoreError;
pub use languages::LanguageDirectory;
pub use memory::MemoryStore;
pub use source::{RecordFile, StaticSource};
