//! Certificate service client error types.

use cnd_core::CndError;

/// Errors from certificate service calls.
#[derive(Debug, thiserror::Error)]
pub enum CndApiError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The certificate service returned a non-2xx status.
    #[error("certificate service {endpoint} returned {status}: {message}")]
    ApiError {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl CndApiError {
    /// Fold this transport error into the workspace error type.
    ///
    /// 404 and 409 keep their meaning ([`CndError::NotFound`],
    /// [`CndError::Conflict`]), transport timeouts become
    /// [`CndError::Timeout`], everything else is a [`CndError::Backend`]
    /// carrying the service's message.
    pub fn into_cnd_error(self, operation: &str, timeout_ms: u64) -> CndError {
        match self {
            Self::Http { source, .. } if source.is_timeout() => CndError::Timeout {
                operation: operation.to_string(),
                after_ms: timeout_ms,
            },
            Self::ApiError {
                status: 404,
                message,
                ..
            } => CndError::NotFound(message),
            Self::ApiError {
                status: 409,
                message,
                ..
            } => CndError::Conflict(message),
            Self::ApiError { message, .. } => CndError::backend(operation, message),
            other => CndError::backend(operation, other.to_string()),
        }
    }
}

/// Body shape of certificate service error responses.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}

/// Turn an unsuccessful response into [`CndApiError::ApiError`], preferring
/// the `message` field of a JSON error body over the raw text.
pub(crate) async fn api_error(endpoint: String, resp: reqwest::Response) -> CndApiError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or(body);
    CndApiError::ApiError {
        endpoint,
        status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_domain_errors() {
        let not_found = CndApiError::ApiError {
            endpoint: "PUT /api/certidoes/9".into(),
            status: 404,
            message: "record 9 not found".into(),
        };
        assert!(matches!(
            not_found.into_cnd_error("save record", 1000),
            CndError::NotFound(m) if m == "record 9 not found"
        ));

        let conflict = CndApiError::ApiError {
            endpoint: "POST /api/certidoes".into(),
            status: 409,
            message: "duplicate".into(),
        };
        assert!(matches!(
            conflict.into_cnd_error("save record", 1000),
            CndError::Conflict(_)
        ));

        let server = CndApiError::ApiError {
            endpoint: "GET /api/certidoes".into(),
            status: 503,
            message: "maintenance".into(),
        };
        match server.into_cnd_error("load records", 1000) {
            CndError::Backend { operation, message } => {
                assert_eq!(operation, "load records");
                assert_eq!(message, "maintenance");
            }
            other => panic!("expected Backend, got {other:?}"),
        }
    }
}
