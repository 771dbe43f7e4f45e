//! Panel configuration.
//!
//! Every collaborator call the panel makes is bounded by
//! [`PanelConfig::call_timeout`]. An elapsed timeout is reported exactly like
//! a rejected call.

use std::future::Future;
use std::time::Duration;

use cnd_core::CndError;

/// Default bound on a single collaborator call, in seconds.
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 30;

/// Runtime settings of the panel.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Upper bound on every collaborator call.
    pub call_timeout: Duration,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS),
        }
    }
}

impl PanelConfig {
    /// Load configuration from the environment.
    ///
    /// Variables:
    /// - `CND_CALL_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Self {
        let secs = std::env::var("CND_CALL_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CALL_TIMEOUT_SECS);
        Self {
            call_timeout: Duration::from_secs(secs),
        }
    }

    /// Configuration with an explicit call timeout.
    pub fn with_call_timeout(call_timeout: Duration) -> Self {
        Self { call_timeout }
    }

    /// Run a collaborator call under the configured timeout.
    pub async fn bounded<T, F>(&self, operation: &str, call: F) -> Result<T, CndError>
    where
        F: Future<Output = Result<T, CndError>>,
    {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CndError::Timeout {
                operation: operation.to_string(),
                after_ms: u64::try_from(self.call_timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_thirty_seconds() {
        assert_eq!(PanelConfig::default().call_timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn bounded_passes_through_results() {
        let config = PanelConfig::with_call_timeout(Duration::from_secs(1));
        let ok: Result<u8, CndError> = config.bounded("noop", async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);
    }

    #[tokio::test]
    async fn bounded_turns_elapsed_call_into_timeout() {
        let config = PanelConfig::with_call_timeout(Duration::from_millis(20));
        let result: Result<(), CndError> = config
            .bounded("load records", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        match result.unwrap_err() {
            CndError::Timeout { operation, after_ms } => {
                assert_eq!(operation, "load records");
                assert_eq!(after_ms, 20);
            }
            other => panic!("expected Timeout, got {other:?}"),
        }
    }
}
