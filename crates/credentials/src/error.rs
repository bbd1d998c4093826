//! Error types for credential storage

/// Errors from credential store loading and persistence.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("credential parse error: {0}")]
    Parse(String),
}

/// Result alias for credential store operations.
pub type Result<T> = std::result::Result<T, Error>;
