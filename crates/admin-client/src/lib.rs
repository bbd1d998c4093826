//! Authenticated API client for the admin backend
//!
//! Wraps every outbound call with bearer credentials and recovers from
//! access-token expiry transparently: when concurrent requests all hit a
//! 401, exactly one refresh call is made, the queued requests replay with
//! the new token, and every caller receives a normal result as if nothing
//! happened.
//!
//! Request flow:
//! 1. Caller invokes a verb on [`AdminClient`]
//! 2. Request pipeline attaches `Authorization: Bearer <access>` from the
//!    [`credentials::CredentialStore`]
//! 3. Response pipeline classifies the outcome; a first-time 401 goes
//!    through [`RefreshCoordinator`] (single-flight) and replays once
//! 4. The outcome is normalized into [`ApiResult`] — the only shape a
//!    caller ever sees

pub mod client;
pub mod config;
pub mod coordinator;
pub mod envelope;
pub mod error;
mod token;

pub use client::{AdminClient, RequestOptions};
pub use config::ClientConfig;
pub use coordinator::RefreshCoordinator;
pub use envelope::{ApiResult, Envelope, RefreshData};
pub use error::{ApiError, Result};
