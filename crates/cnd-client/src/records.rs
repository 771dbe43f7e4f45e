//! Typed client for the certificate records resource.
//!
//! ## API Paths
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/certidoes` | List all records |
//! | POST   | `/api/certidoes` | Create record |
//! | PUT    | `/api/certidoes/{id}` | Update record |
//! | DELETE | `/api/certidoes/{id}` | Delete one record |
//! | POST   | `/api/certidoes/excluir` | Delete several records (all-or-nothing) |
//! | GET    | `/api/certidoes/{id}/arquivo` | Download the certificate document |

use cnd_core::{CertificateRecord, RecordDraft, RecordId};
use serde::Serialize;

use crate::config::ConfigError;
use crate::error::{api_error, CndApiError};

/// Resource path for certificate records.
pub(crate) const API_PREFIX: &str = "api/certidoes";

/// Request body for bulk deletion.
#[derive(Debug, Serialize)]
pub struct BulkDeleteRequest<'a> {
    pub ids: &'a [RecordId],
}

/// Client for the certificate records resource.
#[derive(Debug, Clone)]
pub struct RecordClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl RecordClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// `{base_url}/api/certidoes/{id}[/{tail}]`, with the id pushed as a
    /// single percent-encoded path segment.
    fn record_url(&self, id: &RecordId, tail: Option<&str>) -> Result<url::Url, CndApiError> {
        let invalid = |reason: String| ConfigError::InvalidUrl(self.base_url.to_string(), reason);
        let mut url = self
            .base_url
            .join(API_PREFIX)
            .map_err(|e| invalid(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| invalid("URL cannot be used as a base".to_string()))?;
            segments.push(id.as_str());
            if let Some(tail) = tail {
                segments.push(tail);
            }
        }
        Ok(url)
    }

    /// List every record.
    ///
    /// Calls `GET {base_url}/api/certidoes`.
    pub async fn list(&self) -> Result<Vec<CertificateRecord>, CndApiError> {
        let endpoint = "GET /api/certidoes";
        let url = format!("{}{}", self.base_url, API_PREFIX);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CndApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(api_error(endpoint.into(), resp).await);
        }

        resp.json().await.map_err(|e| CndApiError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })
    }

    /// Create a record.
    ///
    /// Calls `POST {base_url}/api/certidoes`.
    pub async fn create(&self, draft: &RecordDraft) -> Result<CertificateRecord, CndApiError> {
        let endpoint = "POST /api/certidoes";
        let url = format!("{}{}", self.base_url, API_PREFIX);

        let resp = self
            .http
            .post(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| CndApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(api_error(endpoint.into(), resp).await);
        }

        resp.json().await.map_err(|e| CndApiError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })
    }

    /// Replace a record.
    ///
    /// Calls `PUT {base_url}/api/certidoes/{id}`.
    pub async fn update(
        &self,
        id: &RecordId,
        draft: &RecordDraft,
    ) -> Result<CertificateRecord, CndApiError> {
        let endpoint = format!("PUT /api/certidoes/{id}");
        let url = self.record_url(id, None)?;

        let resp = self
            .http
            .put(url)
            .json(draft)
            .send()
            .await
            .map_err(|e| CndApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(api_error(endpoint, resp).await);
        }

        resp.json().await.map_err(|e| CndApiError::Deserialization {
            endpoint,
            source: e,
        })
    }

    /// Create or update depending on whether the draft carries an id.
    pub async fn save(&self, draft: &RecordDraft) -> Result<CertificateRecord, CndApiError> {
        match &draft.id {
            Some(id) => self.update(id, draft).await,
            None => self.create(draft).await,
        }
    }

    /// Delete one record.
    ///
    /// Calls `DELETE {base_url}/api/certidoes/{id}`.
    pub async fn delete(&self, id: &RecordId) -> Result<(), CndApiError> {
        let endpoint = format!("DELETE /api/certidoes/{id}");
        let url = self.record_url(id, None)?;

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| CndApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(api_error(endpoint, resp).await);
        }

        Ok(())
    }

    /// Delete several records in one call.
    ///
    /// Calls `POST {base_url}/api/certidoes/excluir` with `{"ids": [...]}`.
    pub async fn delete_many(&self, ids: &[RecordId]) -> Result<(), CndApiError> {
        let endpoint = "POST /api/certidoes/excluir";
        let url = format!("{}{}/excluir", self.base_url, API_PREFIX);

        let resp = self
            .http
            .post(&url)
            .json(&BulkDeleteRequest { ids })
            .send()
            .await
            .map_err(|e| CndApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(api_error(endpoint.into(), resp).await);
        }

        Ok(())
    }

    /// Download the certificate document of a record.
    ///
    /// Calls `GET {base_url}/api/certidoes/{id}/arquivo`.
    pub async fn document(&self, id: &RecordId) -> Result<Vec<u8>, CndApiError> {
        let endpoint = format!("GET /api/certidoes/{id}/arquivo");
        let url = self.record_url(id, Some("arquivo"))?;

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CndApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(api_error(endpoint, resp).await);
        }

        resp.bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| CndApiError::Deserialization {
                endpoint,
                source: e,
            })
    }
}
