//! Record sources feeding the resource store.
//!
//! A source hands back the complete, unordered record set on every fetch.
//! Connection handling and query shape stay inside the source.

use std::path::Path;

use async_trait::async_trait;

use crate::config::{resolve_source_path, SourceConfig};
use crate::errors::Result;
use crate::types::Resource;

/// Reads records from a JSON array file.
mod json_file;

/// Reads records from a SQLite table.
mod sqlite;

pub use json_file::JsonFileSource;
pub use sqlite::SqliteSource;

/// Supplies the full record set to `ResourceStore::refresh`.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Short human-readable description used in logs and errors.
    fn describe(&self) -> String;

    /// Fetches every record. Partial results are never returned.
    async fn fetch(&self) -> Result<Vec<Resource>>;
}

/// A source backed by records already in memory.
///
/// Useful for hosts that obtain records through their own transport.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<Resource>,
}

impl StaticSource {
    pub fn new(records: Vec<Resource>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl ResourceSource for StaticSource {
    fn describe(&self) -> String {
        format!("static ({} records)", self.records.len())
    }

    async fn fetch(&self) -> Result<Vec<Resource>> {
        Ok(self.records.clone())
    }
}

/// Builds the source described by `config`, resolving relative paths
/// against `project_root`.
pub fn from_config(config: &SourceConfig, project_root: &Path) -> Box<dyn ResourceSource> {
    match config {
        SourceConfig::JsonFile { path } => Box::new(JsonFileSource::new(resolve_source_path(
            project_root,
            path,
        ))),
        SourceConfig::Sqlite { path, table } => Box::new(SqliteSource::new(
            resolve_source_path(project_root, path),
            table,
        )),
    }
}
