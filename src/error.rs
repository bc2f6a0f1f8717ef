//! Error types shared by the stores and the storage layer.

use thiserror::Error;

/// A user input that cannot be accepted. The operation is aborted and the
/// form that produced it stays open.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Task title is required")]
    EmptyTitle,
    #[error("Project name is required")]
    EmptyProjectName,
    #[error("A project named \"{0}\" already exists")]
    DuplicateProjectName(String),
    #[error("Due date \"{0}\" is not a valid YYYY-MM-DD date")]
    InvalidDueDate(String),
}

/// Failure inside a key/value backend. Never surfaced to the user; the
/// storage adapter logs it and carries on.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize value for `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse stored value for `{key}`: {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no data directory given and the platform has no default; pass --data-dir")]
    NoDataDir,
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory `{path}`: {source}")]
    CreateDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start logger: {0}")]
    Logger(#[from] flexi_logger::FlexiLoggerError),
}
