//! Refresh endpoint call
//!
//! One POST to the backend's refresh path with the current refresh token,
//! returning the replacement pair. Any non-2xx status, non-success envelope,
//! malformed body, timeout, or transport failure is a refresh failure — the
//! coordinator treats them all identically (fatal for the session).

use std::time::Duration;

use credentials::TokenPair;
use tracing::debug;

use crate::envelope::{Envelope, RefreshData};
use crate::error::{ApiError, Result};

/// Exchange a refresh token for a new token pair.
pub(crate) async fn refresh_session(
    client: &reqwest::Client,
    base_url: &str,
    refresh_path: &str,
    refresh_token: &str,
    timeout: Duration,
) -> Result<TokenPair> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), refresh_path);
    debug!(path = refresh_path, "calling refresh endpoint");

    let response = client
        .post(&url)
        .json(&serde_json::json!({ "refreshToken": refresh_token }))
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                ApiError::RefreshFailed(format!("refresh request timed out: {e}"))
            } else {
                ApiError::RefreshFailed(format!("refresh request failed: {e}"))
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));
        return Err(ApiError::RefreshFailed(format!(
            "refresh endpoint returned {status}: {body}"
        )));
    }

    let envelope = response
        .json::<Envelope<RefreshData>>()
        .await
        .map_err(|e| ApiError::RefreshFailed(format!("invalid refresh response: {e}")))?;

    if !envelope.success {
        let message = envelope
            .message
            .unwrap_or_else(|| String::from("refresh rejected"));
        return Err(ApiError::RefreshFailed(message));
    }

    let data = envelope
        .data
        .ok_or_else(|| ApiError::RefreshFailed("refresh response missing token data".into()))?;

    Ok(TokenPair::new(data.access_token, data.refresh_token))
}
