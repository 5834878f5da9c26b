use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use super::ResourceSource;
use crate::errors::{ResLensError, Result};
use crate::types::{Resource, ResourceId};

/// Reads `id, pid, name, code` from a table in a SQLite database.
///
/// The database is opened read-only for each fetch; the blocking query runs on
/// tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
    table: String,
}

impl SqliteSource {
    pub fn new(path: impl Into<PathBuf>, table: &str) -> Self {
        Self {
            path: path.into(),
            table: table.to_string(),
        }
    }
}

#[async_trait]
impl ResourceSource for SqliteSource {
    fn describe(&self) -> String {
        format!("sqlite:{}#{}", self.path.display(), self.table)
    }

    async fn fetch(&self) -> Result<Vec<Resource>> {
        let path = self.path.clone();
        let table = self.table.clone();
        let records = tokio::task::spawn_blocking(move || read_resources(&path, &table))
            .await
            .map_err(|e| ResLensError::Source {
                message: format!("sqlite fetch task failed: {}", e),
                source_name: self.describe(),
            })??;

        debug!(source = %self.describe(), records = records.len(), "read resource table");
        Ok(records)
    }
}

/// Returns `true` if `table` is a plain SQL identifier.
fn is_valid_table_name(table: &str) -> bool {
    let mut chars = table.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Maps an id-like column value. `NULL` maps to `None`.
fn value_to_id(value: ValueRef<'_>) -> Option<ResourceId> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(n) => Some(ResourceId::Int(n)),
        ValueRef::Real(f) if f.fract() == 0.0 => Some(ResourceId::Int(f as i64)),
        ValueRef::Real(f) => Some(ResourceId::Str(f.to_string())),
        ValueRef::Text(t) | ValueRef::Blob(t) => {
            Some(ResourceId::Str(String::from_utf8_lossy(t).into_owned()))
        }
    }
}

/// Maps a text-like column value. `NULL` maps to the empty string.
fn value_to_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(n) => n.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}

fn read_resources(path: &Path, table: &str) -> Result<Vec<Resource>> {
    if !is_valid_table_name(table) {
        return Err(ResLensError::Config {
            message: format!("invalid table name '{}'", table),
        });
    }

    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
        |e| ResLensError::Database {
            message: format!("failed to open '{}': {e}", path.display()),
            operation: "open".to_string(),
        },
    )?;

    let sql = format!("SELECT id, pid, name, code FROM {table}");
    let mut stmt = conn.prepare(&sql).map_err(|e| ResLensError::Database {
        message: format!("failed to prepare query: {e}"),
        operation: "read_resources".to_string(),
    })?;

    let rows = stmt.query_map([], |row| {
        let id = value_to_id(row.get_ref(0)?);
        let pid = value_to_id(row.get_ref(1)?);
        let name = value_to_text(row.get_ref(2)?);
        let code = value_to_text(row.get_ref(3)?);
        Ok((id, pid, name, code))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (id, pid, name, code) = row?;
        // A row without an id cannot be referenced or parented; skip it.
        let Some(id) = id else {
            debug!(name = %name, "skipping resource row with NULL id");
            continue;
        };
        records.push(Resource { id, pid, name, code });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_validation() {
        assert!(is_valid_table_name("resources"));
        assert!(is_valid_table_name("_res_2"));
        assert!(!is_valid_table_name("2res"));
        assert!(!is_valid_table_name("res; DROP TABLE x"));
        assert!(!is_valid_table_name(""));
    }

    #[test]
    fn test_value_to_id() {
        assert_eq!(value_to_id(ValueRef::Null), None);
        assert_eq!(value_to_id(ValueRef::Integer(7)), Some(ResourceId::Int(7)));
        assert_eq!(
            value_to_id(ValueRef::Text(b"abc")),
            Some(ResourceId::Str("abc".to_string()))
        );
        assert_eq!(value_to_id(ValueRef::Real(3.0)), Some(ResourceId::Int(3)));
    }
}
