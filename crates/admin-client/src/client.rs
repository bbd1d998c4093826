//! The authenticated API client
//!
//! Request pipeline: read the access token from the credential store and
//! attach it as a Bearer header — a pure, synchronous read-and-attach with
//! no retries and no expiry inspection.
//!
//! Response pipeline: 2xx passes through to the uniform result; a
//! first-time 401 hands off to the refresh coordinator and replays the
//! original request once with the fresh token; everything else propagates
//! as a business or transport error. The attempt counter is explicit — a
//! replayed request that fails 401 again is never re-queued, so refresh
//! loops are impossible.

use std::sync::Arc;
use std::time::Duration;

use credentials::CredentialStore;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::coordinator::RefreshCoordinator;
use crate::envelope::{ApiResult, Envelope};
use crate::error::{ApiError, Result};

/// Per-call overrides. `Default` means "use the client config".
#[derive(Debug, Default, Clone)]
pub struct RequestOptions {
    /// Override the client-wide timeout for this call.
    pub timeout: Option<Duration>,
    /// Extra headers for this call.
    pub headers: Vec<(String, String)>,
}

/// Authenticated client for the admin backend.
///
/// Every verb returns the uniform [`ApiResult`] shape; raw transport
/// errors and token expiry never reach the caller.
pub struct AdminClient {
    http: reqwest::Client,
    config: ClientConfig,
    store: Arc<dyn CredentialStore>,
    coordinator: RefreshCoordinator,
}

impl AdminClient {
    /// Build a client against a validated config and a credential store.
    pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> common::Result<Self> {
        config.validate()?;
        let http = reqwest::Client::new();
        let coordinator = RefreshCoordinator::new(http.clone(), store.clone(), &config);
        Ok(Self {
            http,
            config,
            store,
            coordinator,
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: Option<RequestOptions>,
    ) -> ApiResult<T> {
        self.execute(Method::GET, path, None, options).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&Value>,
        options: Option<RequestOptions>,
    ) -> ApiResult<T> {
        self.execute(Method::POST, path, body, options).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&Value>,
        options: Option<RequestOptions>,
    ) -> ApiResult<T> {
        self.execute(Method::PUT, path, body, options).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&Value>,
        options: Option<RequestOptions>,
    ) -> ApiResult<T> {
        self.execute(Method::PATCH, path, body, options).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: Option<RequestOptions>,
    ) -> ApiResult<T> {
        self.execute(Method::DELETE, path, None, options).await
    }

    /// Run a request through both pipelines and normalize the outcome.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: Option<RequestOptions>,
    ) -> ApiResult<T> {
        let request_id = format!("req_{}", Uuid::new_v4().simple());
        match self
            .dispatch(method, path, body, options.as_ref(), &request_id)
            .await
        {
            Ok((status, data)) => ApiResult::ok(status, data),
            Err(err) => {
                debug!(request_id, error = %err, "request settled with error");
                ApiResult::from_error(err)
            }
        }
    }

    /// Response pipeline with the single-replay recovery path.
    #[instrument(skip_all, fields(request_id = %request_id, method = %method, path = path))]
    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: Option<&RequestOptions>,
        request_id: &str,
    ) -> Result<(u16, T)> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let mut attempt = 0u8;

        loop {
            let response = self.send_once(&method, &url, body, options).await?;
            let status = response.status();

            if status.is_success() {
                let data = response
                    .json::<T>()
                    .await
                    .map_err(|e| ApiError::Transport(format!("decoding response body: {e}")))?;
                return Ok((status.as_u16(), data));
            }

            if status == StatusCode::UNAUTHORIZED && attempt == 0 {
                debug!("access token rejected, entering recovery");
                // Blocks until the (single) refresh settles; propagates the
                // refresh error to this caller if it fails
                self.coordinator.recover().await?;
                attempt += 1;
                continue;
            }

            // Non-401, or a 401 on the replay: business error as-is
            let message = read_error_message(response).await;
            return Err(ApiError::Business {
                status: status.as_u16(),
                message,
            });
        }
    }

    /// Request pipeline: build and send one attempt. The token read is
    /// synchronous; whatever pair the store holds right now is what goes
    /// on the wire.
    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        body: Option<&Value>,
        options: Option<&RequestOptions>,
    ) -> Result<reqwest::Response> {
        let mut request = self.http.request(method.clone(), url);

        if self.store.is_logged_in()
            && let Some(token) = self.store.access_token()
        {
            request = request.bearer_auth(token);
        }

        let timeout = options
            .and_then(|o| o.timeout)
            .unwrap_or_else(|| self.config.timeout());
        request = request.timeout(timeout);

        if let Some(options) = options {
            for (name, value) in &options.headers {
                request = request.header(name.as_str(), value.as_str());
            }
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Transport(format!("request timed out: {e}"))
            } else {
                ApiError::Transport(format!("request failed: {e}"))
            }
        })
    }
}

/// Pull a human-readable message out of an error response. Prefers the
/// backend envelope's `message`, falls back to the raw body, then to the
/// status reason.
async fn read_error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if let Ok(envelope) = serde_json::from_str::<Envelope<Value>>(&body)
        && let Some(message) = envelope.message
    {
        return message;
    }
    if !body.trim().is_empty() {
        return body;
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
