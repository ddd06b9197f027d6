use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Malformed data in '{path}': {reason}")]
    MalformedData { path: String, reason: String },

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Invalid operator '{0}'")]
    InvalidOperator(String),

    #[error("Payload is empty")]
    EmptyPayload,

    #[error("Payload must be a field to value mapping, got {0}")]
    NotAMapping(String),

    #[error("Refusing to {0} without a filter")]
    MissingFilter(String),

    #[error("Field '{0}' cannot be modified")]
    ImmutableField(String),

    #[error("No matching record found")]
    NotFound,

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Failed to replace '{path}': {reason}")]
    RenameFailed { path: String, reason: String },
}

impl DbError {
    pub(crate) fn malformed(path: impl AsRef<std::path::Path>, reason: impl Into<String>) -> Self {
        Self::MalformedData {
            path: path.as_ref().display().to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(context: &str, path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        Self::IoError(format!("{} '{}': {}", context, path.as_ref().display(), err))
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
