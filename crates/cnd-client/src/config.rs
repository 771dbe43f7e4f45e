//! Certificate service client configuration.
//!
//! Configures the base URL of the certificate service and the transport
//! timeout. Defaults point at a locally running `cnd-stub`. Override via
//! environment variables or explicit construction.

use url::Url;

/// Default base URL: a local `cnd-stub` on its default port.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8090";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to the certificate service.
#[derive(Debug, Clone)]
pub struct CndApiConfig {
    /// Base URL of the certificate service. Always ends with `/`.
    pub base_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl CndApiConfig {
    /// Build a configuration from a base URL string.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("base_url", base_url)?,
            timeout_secs,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CND_API_URL` (default: `http://127.0.0.1:8090`)
    /// - `CND_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("CND_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            base_url: parse_base_url("CND_API_URL", &raw)?,
            timeout_secs: std::env::var("CND_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Create a configuration pointing to a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be parsed.
    pub fn local_mock(port: u16) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("localhost", &format!("http://127.0.0.1:{port}"))?,
            timeout_secs: 5,
        })
    }
}

/// Parse a base URL, making sure its path ends with `/` so endpoint paths
/// can be appended directly.
pub(crate) fn parse_base_url(source: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl(source.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(
            source.to_string(),
            "URL cannot be used as a base".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mock_builds_valid_config() {
        let cfg = CndApiConfig::local_mock(9000).unwrap();
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let cfg = CndApiConfig::new("https://cnd.example.com/monitor", 10).unwrap();
        assert_eq!(cfg.base_url.as_str(), "https://cnd.example.com/monitor/");
    }

    #[test]
    fn rejects_invalid_url() {
        assert!(CndApiConfig::new("not a url", 10).is_err());
        assert!(CndApiConfig::new("mailto:ops@example.com", 10).is_err());
    }
}
