use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ResLensError, Result};

/// Name of the configuration file stored inside the `.reslens` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory used to store reslens metadata.
pub const RESLENS_DIR: &str = ".reslens";

/// Delimiter placed between path segments when none is configured.
pub const DEFAULT_PATH_DELIMITER: &str = "-";

/// Identifier that opens a reference token when none is configured.
pub const DEFAULT_TOKEN_IDENT: &str = "getRes";

/// Where resource records are fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// A JSON file holding an array of `{id, pid, name, code}` records.
    JsonFile { path: String },
    /// A SQLite table with `id`, `pid`, `name` and `code` columns.
    Sqlite {
        path: String,
        #[serde(default = "default_table")]
        table: String,
    },
}

fn default_table() -> String {
    "resources".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::JsonFile {
            path: "resources.json".to_string(),
        }
    }
}

/// Configuration for a reslens project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResLensConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Record source used by `refresh`.
    pub source: SourceConfig,
    /// Joins path segments for display, e.g. `"A-B"`.
    pub path_delimiter: String,
    /// Identifier that opens a reference token, e.g. `getRes`.
    pub token_ident: String,
    /// Language tag attached to the code block of hover payloads.
    pub code_language: String,
}

impl Default for ResLensConfig {
    fn default() -> Self {
        Self {
            version: 1,
            source: SourceConfig::default(),
            path_delimiter: DEFAULT_PATH_DELIMITER.to_string(),
            token_ident: DEFAULT_TOKEN_IDENT.to_string(),
            code_language: "javascript".to_string(),
        }
    }
}

impl ResLensConfig {
    /// Rejects configurations the scanner cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.token_ident.is_empty() {
            return Err(ResLensError::Config {
                message: "token_ident must not be empty".to_string(),
            });
        }
        if self
            .token_ident
            .chars()
            .any(|c| c == '(' || c == ')' || c.is_whitespace())
        {
            return Err(ResLensError::Config {
                message: format!(
                    "token_ident '{}' must not contain parentheses or whitespace",
                    self.token_ident
                ),
            });
        }
        Ok(())
    }
}

/// Returns the path to the `.reslens` directory within the given project root.
pub fn get_reslens_dir(project_root: &Path) -> PathBuf {
    project_root.join(RESLENS_DIR)
}

/// Returns the path to the configuration file within the `.reslens` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_reslens_dir(project_root).join(CONFIG_FILENAME)
}

/// Resolves a source path from the config against the project root.
/// Absolute paths are returned unchanged.
pub fn resolve_source_path(project_root: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        project_root.join(candidate)
    }
}

/// Loads the configuration from disk.
///
/// If the configuration file does not exist, returns the default configuration.
/// Missing fields in an existing file take their default values.
pub fn load_config(project_root: &Path) -> Result<ResLensConfig> {
    let config_path = get_config_path(project_root);

    if !config_path.exists() {
        return Ok(ResLensConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| ResLensError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: ResLensConfig =
        serde_json::from_str(&contents).map_err(|e| ResLensError::Config {
            message: format!(
                "failed to parse config file '{}': {}",
                config_path.display(),
                e
            ),
        })?;

    config.validate()?;
    Ok(config)
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it into place.
pub fn save_config(project_root: &Path, config: &ResLensConfig) -> Result<()> {
    config.validate()?;

    let reslens_dir = get_reslens_dir(project_root);
    fs::create_dir_all(&reslens_dir).map_err(|e| ResLensError::Config {
        message: format!(
            "failed to create reslens directory '{}': {}",
            reslens_dir.display(),
            e
        ),
    })?;

    let config_path = get_config_path(project_root);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| ResLensError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| ResLensError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| ResLensError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}
