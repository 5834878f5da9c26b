use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::ResourceSource;
use crate::errors::{ResLensError, Result};
use crate::types::Resource;

/// Reads a JSON file containing an array of `{id, pid, name, code}` objects.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResourceSource for JsonFileSource {
    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }

    async fn fetch(&self) -> Result<Vec<Resource>> {
        let contents =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| ResLensError::Source {
                    message: format!("failed to read '{}': {}", self.path.display(), e),
                    source_name: self.describe(),
                })?;

        let records: Vec<Resource> =
            serde_json::from_str(&contents).map_err(|e| ResLensError::Source {
                message: format!("failed to parse '{}': {}", self.path.display(), e),
                source_name: self.describe(),
            })?;

        debug!(path = %self.path.display(), records = records.len(), "read resource file");
        Ok(records)
    }
}
