//! Typed client for the certificate audit history.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/certidoes/historico?cnpj={taxpayer}&tipo={FED,EST,MUN}` | History of a taxpayer + jurisdiction |

use cnd_core::{HistoryEntry, Jurisdiction, TaxpayerId};

use crate::error::{api_error, CndApiError};
use crate::records::API_PREFIX;

/// Client for the audit history endpoint.
#[derive(Debug, Clone)]
pub struct HistoryClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl HistoryClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Fetch the ordered history of a taxpayer for one jurisdiction.
    ///
    /// The taxpayer id is sent as digits only so the service does not have
    /// to care how it was masked.
    pub async fn for_taxpayer(
        &self,
        taxpayer_id: &TaxpayerId,
        jurisdiction: Jurisdiction,
    ) -> Result<Vec<HistoryEntry>, CndApiError> {
        let endpoint = "GET /api/certidoes/historico";
        let url = format!("{}{}/historico", self.base_url, API_PREFIX);
        let digits = taxpayer_id.digits();

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("cnpj", digits.as_str()),
                ("tipo", jurisdiction.code()),
            ])
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
}
