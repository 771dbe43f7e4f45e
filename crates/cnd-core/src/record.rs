//! # Certificate Records
//!
//! [`CertificateRecord`] is one tracked clearance certificate as stored by
//! the certificate service. [`RecordDraft`] is the editable form of a record:
//! the same fields with an optional id, used as the request body when a
//! record is created (`id` absent) or updated (`id` present).
//!
//! Field names on the wire follow the certificate service's JSON schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::display::{self, ExpiryStatus, StatusIcon};
use crate::error::ValidationError;
use crate::identity::{RecordId, TaxpayerId};
use crate::jurisdiction::Jurisdiction;
use crate::status::{ClearanceStatus, ProcessingStatus};
use crate::temporal::RecordDate;

/// A tracked clearance certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// Unique identifier within the collection.
    pub id: RecordId,
    /// National tax identifier of the taxpayer.
    #[serde(rename = "cnpj")]
    pub taxpayer_id: TaxpayerId,
    /// Taxpayer's registered name.
    #[serde(rename = "nomeContribuinte")]
    pub taxpayer_name: String,
    /// Issuing governmental level.
    #[serde(rename = "tipo")]
    pub jurisdiction: Jurisdiction,
    /// Issuing body (e.g. the federal revenue office, a state treasury).
    #[serde(rename = "orgaoEmissor")]
    pub issuing_authority: String,
    /// Debt status attested by the certificate.
    #[serde(rename = "situacaoCertidao")]
    pub clearance_status: ClearanceStatus,
    /// Date the certificate was issued.
    #[serde(rename = "dataEmissao")]
    pub issue_date: RecordDate,
    /// Date the certificate stops being valid.
    #[serde(rename = "dataValidade")]
    pub expiry_date: RecordDate,
    /// State of the attempt to obtain the certificate.
    #[serde(rename = "statusProcessamento")]
    pub processing_status: ProcessingStatus,
    /// When the attempt was last processed.
    #[serde(rename = "dataProcessamento")]
    pub processed_at: RecordDate,
    /// Verification code printed on the certificate.
    #[serde(rename = "codigoControle")]
    pub control_code: String,
    /// Whether the certificate document can be downloaded.
    #[serde(rename = "arquivoDisponivel")]
    pub file_available: bool,
    /// Failure detail, present only for failure processing statuses.
    #[serde(
        rename = "detalhesErro",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub error_detail: Option<String>,
}

impl CertificateRecord {
    /// Classify the expiry date relative to `now`.
    pub fn expiry_status(&self, now: DateTime<Utc>) -> ExpiryStatus {
        display::expiry_status(&self.expiry_date, now)
    }

    /// Whether the certificate expired strictly before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_status(now) == ExpiryStatus::Expired
    }

    /// Whether the certificate expires within the next 30 days.
    pub fn is_expiring_soon(&self, now: DateTime<Utc>) -> bool {
        self.expiry_status(now) == ExpiryStatus::ExpiringSoon
    }

    /// Icon for the processing status, with the error detail as tooltip
    /// for failure statuses.
    pub fn status_icon(&self) -> StatusIcon {
        display::status_icon(self.processing_status, self.error_detail.as_deref())
    }

    /// Control code truncated for table display.
    pub fn control_code_preview(&self) -> String {
        display::control_code_preview(&self.control_code)
    }

    /// The error detail, but only when the processing status is a failure.
    pub fn failure_detail(&self) -> Option<&str> {
        if self.processing_status.is_failure() {
            self.error_detail.as_deref()
        } else {
            None
        }
    }

    /// Editable copy of this record.
    pub fn to_draft(&self) -> RecordDraft {
        RecordDraft {
            id: Some(self.id.clone()),
            taxpayer_id: self.taxpayer_id.clone(),
            taxpayer_name: self.taxpayer_name.clone(),
            jurisdiction: self.jurisdiction,
            issuing_authority: self.issuing_authority.clone(),
            clearance_status: self.clearance_status,
            issue_date: self.issue_date.clone(),
            expiry_date: self.expiry_date.clone(),
            processing_status: self.processing_status,
            processed_at: self.processed_at.clone(),
            control_code: self.control_code.clone(),
            file_available: self.file_available,
            error_detail: self.error_detail.clone(),
        }
    }
}

/// A record as submitted for creation (`id` absent) or update.
///
/// Serializes with the same field names as [`CertificateRecord`], so the
/// certificate service receives the full record in either case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDraft {
    /// Identifier of the record being edited; `None` in creation mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// National tax identifier of the taxpayer.
    #[serde(rename = "cnpj")]
    pub taxpayer_id: TaxpayerId,
    /// Taxpayer's registered name.
    #[serde(rename = "nomeContribuinte")]
    pub taxpayer_name: String,
    /// Issuing governmental level.
    #[serde(rename = "tipo")]
    pub jurisdiction: Jurisdiction,
    /// Issuing body.
    #[serde(rename = "orgaoEmissor")]
    pub issuing_authority: String,
    /// Debt status attested by the certificate.
    #[serde(rename = "situacaoCertidao")]
    pub clearance_status: ClearanceStatus,
    /// Date the certificate was issued.
    #[serde(rename = "dataEmissao")]
    pub issue_date: RecordDate,
    /// Date the certificate stops being valid.
    #[serde(rename = "dataValidade")]
    pub expiry_date: RecordDate,
    /// State of the attempt to obtain the certificate.
    #[serde(rename = "statusProcessamento")]
    pub processing_status: ProcessingStatus,
    /// When the attempt was last processed.
    #[serde(rename = "dataProcessamento")]
    pub processed_at: RecordDate,
    /// Verification code printed on the certificate.
    #[serde(rename = "codigoControle")]
    pub control_code: String,
    /// Whether the certificate document can be downloaded.
    #[serde(rename = "arquivoDisponivel")]
    pub file_available: bool,
    /// Failure detail, present only for failure processing statuses.
    #[serde(
        rename = "detalhesErro",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub error_detail: Option<String>,
}

impl RecordDraft {
    /// A blank draft for a new record.
    ///
    /// New records start as `Pending` with no document; the certificate
    /// service owns processing state from there on.
    pub fn blank(today: RecordDate) -> Self {
        Self {
            id: None,
            taxpayer_id: TaxpayerId::from_raw(""),
            taxpayer_name: String::new(),
            jurisdiction: Jurisdiction::Federal,
            issuing_authority: String::new(),
            clearance_status: ClearanceStatus::Clear,
            issue_date: today.clone(),
            expiry_date: today.clone(),
            processing_status: ProcessingStatus::Pending,
            processed_at: today,
            control_code: String::new(),
            file_available: false,
            error_detail: None,
        }
    }

    /// Whether this draft creates a new record.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Validate the draft before it is submitted.
    ///
    /// Checks that the taxpayer id holds 14 digits, that the taxpayer name is
    /// non-empty, that both dates parse, and that the expiry date is not
    /// before the issue date.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.taxpayer_id.is_well_formed() {
            return Err(ValidationError::InvalidTaxpayerId(
                self.taxpayer_id.as_str().to_string(),
            ));
        }
        if self.taxpayer_name.trim().is_empty() {
            return Err(ValidationError::MissingField("taxpayer name"));
        }
        let issue = self
            .issue_date
            .to_naive()
            .ok_or_else(|| ValidationError::InvalidDate {
                field: "issue date",
                value: self.issue_date.as_str().to_string(),
            })?;
        let expiry = self
            .expiry_date
            .to_naive()
            .ok_or_else(|| ValidationError::InvalidDate {
                field: "expiry date",
                value: self.expiry_date.as_str().to_string(),
            })?;
        if expiry < issue {
            return Err(ValidationError::ExpiryBeforeIssue {
                issue: self.issue_date.as_str().to_string(),
                expiry: self.expiry_date.as_str().to_string(),
            });
        }
        Ok(())
    }

    /// Turn the draft into a record with the given id. Used by backends that
    /// assign identifiers on creation.
    pub fn into_record(self, id: RecordId) -> CertificateRecord {
        CertificateRecord {
            id,
            taxpayer_id: self.taxpayer_id,
            taxpayer_name: self.taxpayer_name,
            jurisdiction: self.jurisdiction,
            issuing_authority: self.issuing_authority,
            clearance_status: self.clearance_status,
            issue_date: self.issue_date,
            expiry_date: self.expiry_date,
            processing_status: self.processing_status,
            processed_at: self.processed_at,
            control_code: self.control_code,
            file_available: self.file_available,
            error_detail: self.error_detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "id": "1",
            "cnpj": "12.345.678/0001-90",
            "nomeContribuinte": "Empresa ABC Ltda",
            "tipo": "FED",
            "orgaoEmissor": "Receita Federal",
            "situacaoCertidao": "Negativa",
            "dataEmissao": "2024-01-15",
            "dataValidade": "2024-07-15",
            "statusProcessamento": "Concluído",
            "dataProcessamento": "2024-01-16",
            "codigoControle": "ABC123456789DEF",
            "arquivoDisponivel": true
        })
    }

    #[test]
    fn deserializes_service_schema() {
        let rec: CertificateRecord = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(rec.id.as_str(), "1");
        assert_eq!(rec.jurisdiction, Jurisdiction::Federal);
        assert_eq!(rec.clearance_status, ClearanceStatus::Clear);
        assert_eq!(rec.processing_status, ProcessingStatus::Done);
        assert!(rec.file_available);
        assert!(rec.error_detail.is_none());
        assert_eq!(rec.control_code_preview(), "ABC12345...");
    }

    #[test]
    fn malformed_dates_do_not_reject_the_record() {
        let mut json = sample_json();
        json["dataValidade"] = serde_json::json!("soon");
        let rec: CertificateRecord = serde_json::from_value(json).unwrap();
        assert_eq!(rec.expiry_status(Utc::now()), ExpiryStatus::Unknown);
    }

    #[test]
    fn failure_detail_only_for_failures() {
        let mut rec: CertificateRecord = serde_json::from_value(sample_json()).unwrap();
        rec.error_detail = Some("timeout at issuer".into());
        assert_eq!(rec.failure_detail(), None);
        rec.processing_status = ProcessingStatus::IssuerUnavailable;
        assert_eq!(rec.failure_detail(), Some("timeout at issuer"));
    }

    #[test]
    fn draft_round_trips_to_record() {
        let rec: CertificateRecord = serde_json::from_value(sample_json()).unwrap();
        let draft = rec.to_draft();
        assert!(!draft.is_new());
        assert!(draft.validate().is_ok());
        assert_eq!(draft.into_record(rec.id.clone()), rec);
    }

    #[test]
    fn new_draft_omits_id_on_the_wire() {
        let draft = RecordDraft::blank(RecordDate::from_raw("2024-03-01"));
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["statusProcessamento"], "Pendente");
    }

    #[test]
    fn validate_rejects_expiry_before_issue() {
        let rec: CertificateRecord = serde_json::from_value(sample_json()).unwrap();
        let mut draft = rec.to_draft();
        draft.expiry_date = RecordDate::from_raw("2023-12-31");
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::ExpiryBeforeIssue { .. })
        ));
    }

    #[test]
    fn validate_accepts_same_day_expiry() {
        let rec: CertificateRecord = serde_json::from_value(sample_json()).unwrap();
        let mut draft = rec.to_draft();
        draft.expiry_date = draft.issue_date.clone();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_name_and_bad_taxpayer() {
        let rec: CertificateRecord = serde_json::from_value(sample_json()).unwrap();
        let mut draft = rec.to_draft();
        draft.taxpayer_name = "   ".into();
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingField("taxpayer name"))
        );

        let mut draft = rec.to_draft();
        draft.taxpayer_id = TaxpayerId::from_raw("12.345");
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::InvalidTaxpayerId(_))
        ));
    }
}
