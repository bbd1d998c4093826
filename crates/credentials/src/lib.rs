//! Credential storage for the admin API client
//!
//! The client itself never persists tokens; it talks to a [`CredentialStore`]
//! — the single place the current access/refresh pair lives. Two
//! implementations ship here:
//!
//! - [`MemoryCredentialStore`]: in-process store, the default collaborator
//!   and the one tests use.
//! - [`FileCredentialStore`]: JSON file persistence with atomic
//!   temp-file + rename writes, for processes that keep the admin session
//!   across restarts.
//!
//! Exactly one writer (the client's refresh coordinator) replaces or clears
//! the pair; everything else only reads.

pub mod error;
pub mod file;
pub mod store;

pub use error::{Error, Result};
pub use file::FileCredentialStore;
pub use store::{CredentialStore, MemoryCredentialStore, TokenPair};
