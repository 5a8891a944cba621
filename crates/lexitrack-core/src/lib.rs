//! lexitrack-core: Review scheduling, feature schemas, and form trees.
//!
//! This crate defines the data model, the spaced-repetition scheduler, the
//! feature schema registry, the morphological form tree, and the import
//! coordinator. Storage and language lookup sit behind the traits in
//! [`traits`].

pub mod error;
pub mod forms;
pub mod history;
pub mod import;
pub mod model;
pub mod ordering;
pub mod parser;
pub mod scheduler;
pub mod schema;
pub mod statistics;
pub mod tracking;
pub mod traits;

pub use error::{CoreError, Result};
