//! Wire envelope and the uniform result shape
//!
//! The admin backend wraps every response body in `{success, data, message}`.
//! On the caller side, every outcome — success, business error, transport
//! error — is flattened into one [`ApiResult`] shape so callers never see a
//! raw transport exception or need to special-case token expiry.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Standard response envelope from the admin backend.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// New token pair returned by the refresh endpoint (camelCase on the wire).
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshData {
    pub access_token: String,
    pub refresh_token: String,
}

/// The one shape every caller receives, regardless of outcome.
///
/// Invariants:
/// - success ⇒ `data` is present and `status` is a 2xx code
/// - failure ⇒ `error` is present; `status` is present only when the server
///   actually responded (absent for transport and refresh failures)
#[derive(Debug)]
pub struct ApiResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub status: Option<u16>,
}

impl<T> ApiResult<T> {
    /// Successful outcome with the decoded response body.
    pub fn ok(status: u16, data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            status: Some(status),
        }
    }

    /// Terminal failure, normalized from the error taxonomy.
    pub fn from_error(err: ApiError) -> Self {
        let status = match &err {
            ApiError::Business { status, .. } => Some(*status),
            ApiError::Transport(_) | ApiError::RefreshFailed(_) | ApiError::SessionExpired => None,
        };
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            status,
        }
    }

    /// The data, consuming self. Panics if the call failed; intended for
    /// call sites that have already checked `success` (and for tests).
    pub fn into_data(self) -> T {
        match self.data {
            Some(data) => data,
            None => panic!(
                "into_data on failed ApiResult: {}",
                self.error.as_deref().unwrap_or("<no error>")
            ),
        }
    }
}
