//! Credential store contract and the in-memory implementation

use std::sync::Mutex;

use common::Secret;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The current session's bearer credentials.
///
/// Both tokens are opaque strings minted by the backend at login. The
/// access token authorizes API calls; the refresh token is used solely to
/// obtain a replacement pair when the access token expires. `Secret` keeps
/// either token out of Debug output and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: Secret<String>,
    pub refresh: Secret<String>,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: Secret::new(access.into()),
            refresh: Secret::new(refresh.into()),
        }
    }
}

/// Where the admin session's token pair lives.
///
/// All methods are synchronous: the request pipeline reads the access token
/// inline while building each outbound request and must not suspend for it.
/// Replacement of the pair is atomic — a reader sees either the old pair or
/// the new pair, never a mix.
pub trait CredentialStore: Send + Sync {
    /// Whether a session is currently established.
    fn is_logged_in(&self) -> bool;

    /// Current access token, if logged in.
    fn access_token(&self) -> Option<String>;

    /// Current refresh token, if logged in.
    fn refresh_token(&self) -> Option<String>;

    /// Atomically replace the pair (successful login or refresh).
    fn set_tokens(&self, access: String, refresh: String);

    /// Invalidate the session, dropping both tokens.
    fn clear(&self);
}

/// In-process credential store backed by a mutex-guarded pair.
#[derive(Default)]
pub struct MemoryCredentialStore {
    state: Mutex<Option<TokenPair>>,
}

impl MemoryCredentialStore {
    /// Create an empty (logged-out) store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding a pair (post-login state).
    pub fn with_tokens(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(Some(TokenPair::new(access, refresh))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn is_logged_in(&self) -> bool {
        self.state.lock().unwrap().is_some()
    }

    fn access_token(&self) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.as_ref().map(|p| p.access.expose().clone())
    }

    fn refresh_token(&self) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.as_ref().map(|p| p.refresh.expose().clone())
    }

    fn set_tokens(&self, access: String, refresh: String) {
        let mut state = self.state.lock().unwrap();
        *state = Some(TokenPair::new(access, refresh));
        debug!("token pair replaced");
    }

    fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        *state = None;
        debug!("session cleared");
    }
}
