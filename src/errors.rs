use thiserror::Error;

/// Errors that can occur while loading, indexing or serving resources.
#[derive(Error, Debug)]
pub enum ResLensError {
    #[error("source error: {message} (source: {source_name})")]
    Source {
        message: String,
        source_name: String,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("database error: {message} (operation: {operation})")]
    Database { message: String, operation: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `ResLensError`.
pub type Result<T> = std::result::Result<T, ResLensError>;
