//! Scraped-record file source.

use std::path::{Path, PathBuf};

use lexitrack_core::import::{RawRecord, RecordEntry};
use lexitrack_core::parser::parse_raw_records;
use lexitrack_core::traits::ScrapingSource;

/// A JSON export of scraped records on disk.
#[derive(Debug, Clone)]
pub struct RecordFile {
    path: PathBuf,
    name: String,
}

impl RecordFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScrapingSource for RecordFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn records(&self) -> anyhow::Result<Vec<RecordEntry>> {
        parse_raw_records(&self.path)
    }
}

/// Records held in memory, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pub records: Vec<RawRecord>,
}

impl ScrapingSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn records(&self) -> anyhow::Result<Vec<RecordEntry>> {
        Ok(self.records.iter().cloned().map(Ok).collect())
    }
}
