//! Client configuration and loading
//!
//! Config comes from a TOML file (deployments) or [`ClientConfig::new`]
//! (programmatic use and tests). Defaults cover everything except the
//! backend base URL.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Configuration for the admin API client.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `https://api.example-admin.com/api/v1`.
    pub base_url: String,
    /// Upper bound for every network call, refresh included.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Path of the refresh endpoint, relative to `base_url`.
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
}

fn default_timeout() -> u64 {
    30
}

fn default_refresh_path() -> String {
    "/auth/refresh-token".into()
}

impl ClientConfig {
    /// Config with defaults for everything but the base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout(),
            refresh_path: default_refresh_path(),
        }
    }

    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field constraints shared by both construction paths.
    pub fn validate(&self) -> common::Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        if !self.refresh_path.starts_with('/') {
            return Err(common::Error::Config(format!(
                "refresh_path must start with /, got: {}",
                self.refresh_path
            )));
        }
        Ok(())
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let config = ClientConfig::new("https://api.shop.test/api/v1");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.refresh_path, "/auth/refresh-token");
    }

    #[test]
    fn load_valid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(
            &path,
            r#"
base_url = "https://api.shop.test/api/v1"
timeout_secs = 10
refresh_path = "/auth/refresh-token"
"#,
        )
        .unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.base_url, "https://api.shop.test/api/v1");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn load_missing_file_errors() {
        let result = ClientConfig::load(Path::new("/nonexistent/client.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_applies_defaults_for_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(&path, "base_url = \"http://localhost:4000\"\n").unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.refresh_path, "/auth/refresh-token");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let config = ClientConfig::new("ftp://api.shop.test");
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut config = ClientConfig::new("http://localhost:4000");
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_relative_refresh_path() {
        let mut config = ClientConfig::new("http://localhost:4000");
        config.refresh_path = "auth/refresh-token".into();
        assert!(config.validate().is_err());
    }
}
