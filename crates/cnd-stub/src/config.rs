//! Stub server settings.

/// Default listen port, matching the client's default base URL.
pub const DEFAULT_PORT: u16 = 8090;

/// Settings read at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubConfig {
    pub port: u16,
    /// Load the demo records on startup.
    pub seed: bool,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            seed: true,
        }
    }
}

impl StubConfig {
    /// Load settings from the environment.
    ///
    /// Variables:
    /// - `CND_STUB_PORT` (default: 8090)
    /// - `CND_STUB_SEED` (default: on; `0`, `false`, `no` or `off` disable it)
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("CND_STUB_PORT").ok().as_deref(),
            std::env::var("CND_STUB_SEED").ok().as_deref(),
        )
    }

    fn from_values(port: Option<&str>, seed: Option<&str>) -> Self {
        Self {
            port: port
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            seed: seed.map_or(true, |s| {
                !matches!(
                    s.trim().to_ascii_lowercase().as_str(),
                    "0" | "false" | "no" | "off"
                )
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        assert_eq!(StubConfig::from_values(None, None), StubConfig::default());
    }

    #[test]
    fn parses_port_and_seed_switch() {
        let config = StubConfig::from_values(Some("9100"), Some("off"));
        assert_eq!(config.port, 9100);
        assert!(!config.seed);
        assert!(StubConfig::from_values(None, Some("yes")).seed);
    }

    #[test]
    fn bad_port_falls_back() {
        assert_eq!(StubConfig::from_values(Some("http"), None).port, DEFAULT_PORT);
    }
}
