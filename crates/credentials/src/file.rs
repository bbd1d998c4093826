//! File-backed credential store
//!
//! Persists the token pair as a small JSON file so the admin session
//! survives process restarts. All writes use atomic temp-file + rename to
//! prevent corruption on crash, and the file is created with 0600
//! permissions since it contains bearer tokens.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::store::{CredentialStore, TokenPair};

/// Credential store persisted to a JSON file.
///
/// The in-memory pair is authoritative; the file is a mirror written on
/// every mutation. A persistence failure is logged but does not fail the
/// mutation — the session keeps working from memory and the next mutation
/// retries the write.
pub struct FileCredentialStore {
    path: PathBuf,
    state: Mutex<Option<TokenPair>>,
}

impl FileCredentialStore {
    /// Load the session from the given file path.
    ///
    /// A missing file means logged out; it is created as `null` so future
    /// loads don't need the cold-start path. An unreadable or malformed
    /// file is an error — better to fail loudly than silently drop a
    /// session.
    pub fn load(path: PathBuf) -> Result<Self> {
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::Io(format!("reading session file: {e}")))?;
            let pair: Option<TokenPair> = serde_json::from_str(&contents)
                .map_err(|e| Error::Parse(format!("parsing session file: {e}")))?;
            info!(path = %path.display(), logged_in = pair.is_some(), "loaded session");
            pair
        } else {
            info!(path = %path.display(), "session file not found, starting logged out");
            write_atomic(&path, &None)?;
            None
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    fn persist(&self, state: &Option<TokenPair>) {
        if let Err(e) = write_atomic(&self.path, state) {
            warn!(path = %self.path.display(), error = %e, "failed to persist session");
        }
    }
}

impl CredentialStore for FileCredentialStore {
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
        self.persist(&state);
    }

    fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        *state = None;
        debug!("session cleared");
        self.persist(&state);
    }
}

/// Write the session to a file atomically.
///
/// Writes to a temporary file in the same directory, then renames it over
/// the target. Sets 0600 permissions before the rename so the tokens are
/// never world-readable, even transiently.
fn write_atomic(path: &Path, state: &Option<TokenPair>) -> Result<()> {
    let json = serde_json::to_string_pretty(state)
        .map_err(|e| Error::Parse(format!("serializing session: {e}")))?;

    let dir = path
        .parent()
        .ok_or_else(|| Error::Io("session path has no parent directory".into()))?;

    let tmp_path = dir.join(format!(".session.tmp.{}", std::process::id()));

    std::fs::write(&tmp_path, json.as_bytes())
        .map_err(|e| Error::Io(format!("writing temp session file: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&tmp_path, perms)
            .map_err(|e| Error::Io(format!("setting session file permissions: {e}")))?;
    }

    std::fs::rename(&tmp_path, path)
        .map_err(|e| Error::Io(format!("renaming temp session file: {e}")))?;

    debug!(path = %path.display(), "persisted session");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cold_start_creates_null_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        assert!(!path.exists());
        let store = FileCredentialStore::load(path.clone()).unwrap();
        assert!(!store.is_logged_in());
        assert!(path.exists());

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim(), "null");
    }

    #[test]
    fn roundtrip_set_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileCredentialStore::load(path.clone()).unwrap();
        store.set_tokens("at_1".into(), "rt_1".into());

        let store2 = FileCredentialStore::load(path).unwrap();
        assert!(store2.is_logged_in());
        assert_eq!(store2.access_token().unwrap(), "at_1");
        assert_eq!(store2.refresh_token().unwrap(), "rt_1");
    }

    #[test]
    fn clear_persists_logged_out_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileCredentialStore::load(path.clone()).unwrap();
        store.set_tokens("at_1".into(), "rt_1".into());
        store.clear();

        let store2 = FileCredentialStore::load(path).unwrap();
        assert!(!store2.is_logged_in());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json {{{{").unwrap();

        let result = FileCredentialStore::load(path);
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[cfg(unix)]
    #[test]
    fn file_permissions_are_0600() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileCredentialStore::load(path.clone()).unwrap();
        store.set_tokens("at_1".into(), "rt_1".into());

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "session file must be 0600, got {mode:o}");
    }
}
