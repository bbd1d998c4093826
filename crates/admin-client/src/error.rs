//! Error taxonomy for client operations
//!
//! `Clone` is required: when a refresh fails, every request queued behind it
//! settles with the same error, so the coordinator fans one value out to
//! many waiters.

/// Errors from API calls and session recovery.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The request never reached the server or no response came back
    /// (connect failure, DNS, timeout, body read). Carries no HTTP status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status that recovery does not
    /// apply to: anything other than 401, or a 401 on a replayed request.
    #[error("request failed with status {status}: {message}")]
    Business { status: u16, message: String },

    /// The refresh endpoint rejected the refresh token or was unreachable.
    /// Fatal for the session: the credential store has been cleared.
    #[error("session refresh failed: {0}")]
    RefreshFailed(String),

    /// A 401 arrived but no refresh token exists to recover with. The
    /// credential store has been cleared.
    #[error("session expired: no refresh token available")]
    SessionExpired,
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;
