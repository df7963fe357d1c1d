//! Error types for h5p-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from h5p-core
    #[error(transparent)]
    Core(#[from] h5p_core::Error),

    /// JSON output could not be rendered
    #[error("Failed to render JSON output: {0}")]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    ///
    /// Missing content exits with 2 so scripts can tell it apart from a
    /// failed install.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Core(e) if e.kind() == h5p_core::ErrorKind::NotFound => 2,
            _ => 1,
        }
    }
}
