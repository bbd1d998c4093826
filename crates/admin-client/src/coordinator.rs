//! Single-flight session refresh
//!
//! Many concurrent requests can observe an expired access token at nearly
//! the same instant. Exactly one of them may perform the refresh call; the
//! rest queue up and settle with that one call's outcome. The state machine
//! has two states, Idle and Refreshing, held as a flag plus a FIFO waiter
//! queue behind one mutex.
//!
//! The check-and-set happens in a single critical section with no await
//! while the lock is held, so only one caller can ever observe Idle per
//! refresh window — the multi-threaded equivalent of the atomicity an
//! event-loop interceptor gets for free between suspension points.
//!
//! Invariants:
//! - at most one refresh call is in flight at any time, for any number of
//!   concurrent 401s
//! - the waiter queue is empty outside a refresh window
//! - on refresh failure the store is cleared exactly once, by the
//!   refreshing task, never by a waiter
//! - waiters settle in the order they enqueued

use std::sync::{Arc, Mutex};
use std::time::Duration;

use credentials::CredentialStore;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::token::refresh_session;

/// One queued caller waiting for the in-flight refresh. Resolved with the
/// new access token or the refresh error.
type Waiter = oneshot::Sender<Result<String>>;

#[derive(Default)]
struct CoordState {
    refreshing: bool,
    waiters: Vec<Waiter>,
}

/// Coordinates session refresh across concurrent requests.
///
/// Constructed once per client and shared by reference; holds no token
/// state of its own — the credential store stays the single source of
/// truth for the pair.
pub struct RefreshCoordinator {
    http: reqwest::Client,
    store: Arc<dyn CredentialStore>,
    base_url: String,
    refresh_path: String,
    timeout: Duration,
    state: Mutex<CoordState>,
}

impl RefreshCoordinator {
    pub fn new(
        http: reqwest::Client,
        store: Arc<dyn CredentialStore>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            http,
            store,
            base_url: config.base_url.clone(),
            refresh_path: config.refresh_path.clone(),
            timeout: config.timeout(),
            state: Mutex::new(CoordState::default()),
        }
    }

    /// Recover from an expired access token. Called on a first-time 401.
    ///
    /// Returns the fresh access token to replay with, or the terminal error
    /// every caller of this refresh window receives. The caller that
    /// observes Idle performs the refresh; everyone else enqueues and
    /// awaits its outcome.
    pub async fn recover(&self) -> Result<String> {
        let rx = {
            let mut state = self.state.lock().unwrap();
            if state.refreshing {
                let (tx, rx) = oneshot::channel();
                state.waiters.push(tx);
                debug!(queued = state.waiters.len(), "refresh in flight, queueing");
                Some(rx)
            } else {
                state.refreshing = true;
                None
            }
        };

        if let Some(rx) = rx {
            // Settled by the refreshing task's drain. A dropped sender means
            // the refreshing future was cancelled mid-flight, which the
            // client never does (no request supports cancellation).
            return match rx.await {
                Ok(outcome) => outcome,
                Err(_) => Err(ApiError::RefreshFailed("refresh task dropped".into())),
            };
        }

        let outcome = self.run_refresh().await;

        // Back to Idle, then settle every queued waiter FIFO with the same
        // outcome. The trigger replays from its own call path afterwards.
        let waiters = {
            let mut state = self.state.lock().unwrap();
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };
        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }

        outcome
    }

    /// Perform the actual refresh: read the refresh token, call the
    /// endpoint, replace or clear the pair.
    async fn run_refresh(&self) -> Result<String> {
        let Some(refresh_token) = self.store.refresh_token() else {
            warn!("401 received with no refresh token, clearing session");
            self.store.clear();
            return Err(ApiError::SessionExpired);
        };

        metrics::counter!("admin_client_refresh_attempts_total").increment(1);

        match refresh_session(
            &self.http,
            &self.base_url,
            &self.refresh_path,
            &refresh_token,
            self.timeout,
        )
        .await
        {
            Ok(pair) => {
                let access = pair.access.expose().clone();
                self.store
                    .set_tokens(access.clone(), pair.refresh.expose().clone());
                info!("session refresh succeeded");
                Ok(access)
            }
            Err(e) => {
                metrics::counter!("admin_client_refresh_failures_total").increment(1);
                warn!(error = %e, "session refresh failed, clearing session");
                self.store.clear();
                Err(e)
            }
        }
    }
}
