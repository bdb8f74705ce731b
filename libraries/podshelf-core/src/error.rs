/// Core error types for Podshelf
use thiserror::Error;

/// Result type alias using `PodError`
pub type Result<T> = std::result::Result<T, PodError>;

/// Core error type for Podshelf
#[derive(Error, Debug)]
pub enum PodError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up
        entity: String,
        /// Identifier that was looked up
        id: String,
    },

    /// Entity exists but belongs to someone else
    #[error("Permission denied")]
    PermissionDenied,

    /// Permission denied with context
    #[error("Permission denied: {0}")]
    PermissionDeniedWithContext(String),

    /// Duplicate entry
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl PodError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDeniedWithContext(msg.into())
    }

    /// Create a duplicate entry error
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Stable machine-readable kind, used in API error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::PermissionDenied | Self::PermissionDeniedWithContext(_) => "forbidden",
            Self::Duplicate(_) => "conflict",
            Self::InvalidInput(_) => "validation_error",
            Self::Storage(_) | Self::Database(_) | Self::Serialization(_) => "internal",
        }
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for PodError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
