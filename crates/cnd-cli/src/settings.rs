//! # Connection Settings
//!
//! The certificate service connection is resolved from three layers, later
//! layers winning:
//!
//! 1. the YAML file given with `--config` (keys `api_url`, `timeout_secs`),
//! 2. the environment (`CND_API_URL`, `CND_TIMEOUT_SECS`),
//! 3. the `--api-url` / `--timeout-secs` flags.
//!
//! Anything left unset falls back to the client defaults.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use cnd_client::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use cnd_client::CndApiConfig;

/// Contents of the `--config` file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileSettings {
    /// Read and parse a YAML settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

/// Connection flags shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct ConnectionArgs {
    /// Base URL of the certificate service.
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Transport timeout in seconds.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

/// Resolve the client configuration from the process environment.
pub fn resolve(config_file: Option<&Path>, args: &ConnectionArgs) -> Result<CndApiConfig> {
    let file = match config_file {
        Some(path) => FileSettings::load(path)?,
        None => FileSettings::default(),
    };
    resolve_with(&file, |key| std::env::var(key).ok(), args)
}

/// Resolve the client configuration with an explicit environment lookup.
pub fn resolve_with(
    file: &FileSettings,
    env: impl Fn(&str) -> Option<String>,
    args: &ConnectionArgs,
) -> Result<CndApiConfig> {
    let env_timeout = match env("CND_TIMEOUT_SECS") {
        Some(raw) => Some(
            raw.trim()
                .parse::<u64>()
                .with_context(|| format!("CND_TIMEOUT_SECS is not a number: {raw:?}"))?,
        ),
        None => None,
    };

    let url = args
        .api_url
        .clone()
        .or_else(|| env("CND_API_URL"))
        .or_else(|| file.api_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let timeout_secs = args
        .timeout_secs
        .or(env_timeout)
        .or(file.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    tracing::debug!(%url, timeout_secs, "connection settings resolved");
    CndApiConfig::new(&url, timeout_secs).context("invalid certificate service URL")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config =
            resolve_with(&FileSettings::default(), env_of(&[]), &ConnectionArgs::default())
                .unwrap();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8090/");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn flags_beat_env_beat_file() {
        let file = FileSettings {
            api_url: Some("http://file.example".into()),
            timeout_secs: Some(5),
        };
        let env = env_of(&[("CND_API_URL", "http://env.example"), ("CND_TIMEOUT_SECS", "7")]);

        let from_env = resolve_with(&file, &env, &ConnectionArgs::default()).unwrap();
        assert_eq!(from_env.base_url.as_str(), "http://env.example/");
        assert_eq!(from_env.timeout_secs, 7);

        let args = ConnectionArgs {
            api_url: Some("http://flag.example/cnd".into()),
            timeout_secs: Some(9),
        };
        let from_flags = resolve_with(&file, &env, &args).unwrap();
        assert_eq!(from_flags.base_url.as_str(), "http://flag.example/cnd/");
        assert_eq!(from_flags.timeout_secs, 9);

        let from_file = resolve_with(&file, env_of(&[]), &ConnectionArgs::default()).unwrap();
        assert_eq!(from_file.base_url.as_str(), "http://file.example/");
        assert_eq!(from_file.timeout_secs, 5);
    }

    #[test]
    fn bad_env_timeout_is_an_error() {
        let env = env_of(&[("CND_TIMEOUT_SECS", "soon")]);
        assert!(resolve_with(&FileSettings::default(), env, &ConnectionArgs::default()).is_err());
    }

    #[test]
    fn load_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_url: http://cnd.internal:9000\ntimeout_secs: 12").unwrap();
        let settings = FileSettings::load(file.path()).unwrap();
        assert_eq!(settings.api_url.as_deref(), Some("http://cnd.internal:9000"));
        assert_eq!(settings.timeout_secs, Some(12));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_uri: http://typo").unwrap();
        assert!(FileSettings::load(file.path()).is_err());
    }

    #[test]
    fn missing_file_names_path() {
        let err = FileSettings::load(Path::new("/nonexistent/cnd.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cnd.yaml"));
    }
}
