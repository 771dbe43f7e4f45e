//! # cnd-client -- Collaborators of the CND monitor
//!
//! Defines the [`CertificateBackend`] contract the panel consumes and two
//! implementations of it:
//! - [`CndClient`]: typed HTTP access to the certificate service REST API
//!   (records, documents, audit history).
//! - [`InMemoryBackend`]: an in-process backend with failure and latency
//!   injection, for development and tests.
//!
//! ## API Path Convention
//!
//! All endpoints live under `{base_url}/api/certidoes`. Error responses
//! carry a JSON body `{"message": "..."}`.
//!
//! ## Retries
//!
//! No call is retried automatically. A failed save or delete may have had
//! side effects the client cannot see, so repeating it is left to the user.

pub mod backend;
pub mod config;
pub mod error;
pub mod history;
pub mod memory;
pub mod records;

pub use backend::CertificateBackend;
pub use config::CndApiConfig;
pub use error::CndApiError;
pub use memory::{BackendOperation, InMemoryBackend};

use std::time::Duration;

use async_trait::async_trait;
use cnd_core::{
    CertificateRecord, CndError, HistoryEntry, Jurisdiction, RecordDraft, RecordId, TaxpayerId,
};

/// Top-level certificate service client. Holds sub-clients per resource.
#[derive(Debug, Clone)]
pub struct CndClient {
    records: records::RecordClient,
    history: history::HistoryClient,
    timeout_ms: u64,
}

impl CndClient {
    /// Create a new client from configuration.
    pub fn new(config: CndApiConfig) -> Result<Self, CndApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CndApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            records: records::RecordClient::new(http.clone(), config.base_url.clone()),
            history: history::HistoryClient::new(http, config.base_url),
            timeout_ms: config.timeout_secs.saturating_mul(1000),
        })
    }

    /// Access the records client.
    pub fn records(&self) -> &records::RecordClient {
        &self.records
    }

    /// Access the audit history client.
    pub fn history_client(&self) -> &history::HistoryClient {
        &self.history
    }
}

#[async_trait]
impl CertificateBackend for CndClient {
    async fn list_records(&self) -> Result<Vec<CertificateRecord>, CndError> {
        self.records
            .list()
            .await
            .map_err(|e| e.into_cnd_error("load records", self.timeout_ms))
    }

    async fn save_record(&self, draft: &RecordDraft) -> Result<CertificateRecord, CndError> {
        self.records
            .save(draft)
            .await
            .map_err(|e| e.into_cnd_error("save record", self.timeout_ms))
    }

    async fn delete_records(&self, ids: &[RecordId]) -> Result<(), CndError> {
        let result = match ids {
            [] => return Ok(()),
            [id] => self.records.delete(id).await,
            _ => self.records.delete_many(ids).await,
        };
        result.map_err(|e| e.into_cnd_error("delete records", self.timeout_ms))
    }

    async fn fetch_document(&self, id: &RecordId) -> Result<Vec<u8>, CndError> {
        self.records
            .document(id)
            .await
            .map_err(|e| e.into_cnd_error("download document", self.timeout_ms))
    }

    async fn history(
        &self,
        taxpayer_id: &TaxpayerId,
        jurisdiction: Jurisdiction,
    ) -> Result<Vec<HistoryEntry>, CndError> {
        self.history
            .for_taxpayer(taxpayer_id, jurisdiction)
            .await
            .map_err(|e| e.into_cnd_error("load history", self.timeout_ms))
    }

    fn backend_name(&self) -> &str {
        "CndClient"
    }
}
