//! # Record Editor
//!
//! Holds an independent draft of one record. Edits stay in the draft until
//! [`RecordEditor::save`] succeeds; [`RecordEditor::close`] throws them away.
//!
//! In edit mode the taxpayer id is fixed. In creation mode it is required and
//! must hold 14 digits when the draft is saved.

use cnd_client::CertificateBackend;
use cnd_core::identity::mask_input;
use cnd_core::{
    CertificateRecord, ClearanceStatus, CndError, Jurisdiction, RecordDate, RecordDraft, RecordId,
    TaxpayerId, ValidationError,
};

use crate::config::PanelConfig;

/// Whether the editor creates a record or changes an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(RecordId),
}

/// Modal editor for a single record.
#[derive(Debug, Clone)]
pub struct RecordEditor {
    mode: EditorMode,
    draft: RecordDraft,
    open: bool,
}

impl RecordEditor {
    /// Open the editor on an existing record.
    pub fn edit(record: &CertificateRecord) -> Self {
        Self {
            mode: EditorMode::Edit(record.id.clone()),
            draft: record.to_draft(),
            open: true,
        }
    }

    /// Open the editor on a blank record dated `today`.
    pub fn create(today: RecordDate) -> Self {
        Self {
            mode: EditorMode::Create,
            draft: RecordDraft::blank(today),
            open: true,
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// The current draft.
    pub fn draft(&self) -> &RecordDraft {
        &self.draft
    }

    /// False once the draft was saved or discarded.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Set the taxpayer id of a new record, applying the input mask.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ImmutableField`] in edit mode.
    pub fn set_taxpayer_id(&mut self, raw: &str) -> Result<(), ValidationError> {
        if let EditorMode::Edit(_) = self.mode {
            return Err(ValidationError::ImmutableField("taxpayer id"));
        }
        self.draft.taxpayer_id = TaxpayerId::from_raw(mask_input(raw));
        Ok(())
    }

    pub fn set_taxpayer_name(&mut self, name: impl Into<String>) {
        self.draft.taxpayer_name = name.into();
    }

    pub fn set_jurisdiction(&mut self, jurisdiction: Jurisdiction) {
        self.draft.jurisdiction = jurisdiction;
    }

    pub fn set_issuing_authority(&mut self, authority: impl Into<String>) {
        self.draft.issuing_authority = authority.into();
    }

    pub fn set_clearance_status(&mut self, status: ClearanceStatus) {
        self.draft.clearance_status = status;
    }

    /// Set the issue date as typed. Checked on save.
    pub fn set_issue_date(&mut self, date: impl Into<String>) {
        self.draft.issue_date = RecordDate::from_raw(date);
    }

    /// Set the expiry date as typed. Checked on save.
    pub fn set_expiry_date(&mut self, date: impl Into<String>) {
        self.draft.expiry_date = RecordDate::from_raw(date);
    }

    pub fn set_control_code(&mut self, code: impl Into<String>) {
        self.draft.control_code = code.into();
    }

    /// Validate the draft and send it to the persistence collaborator.
    ///
    /// On success the editor closes and the stored record is returned. On
    /// failure the editor stays open with its draft intact so the user can
    /// retry.
    ///
    /// # Errors
    ///
    /// [`CndError::Validation`] before any remote call, or the
    /// collaborator's failure (including [`CndError::Timeout`]).
    pub async fn save(
        &mut self,
        backend: &dyn CertificateBackend,
        config: &PanelConfig,
    ) -> Result<CertificateRecord, CndError> {
        self.draft.validate()?;
        self.draft.id = match &self.mode {
            EditorMode::Create => None,
            EditorMode::Edit(id) => Some(id.clone()),
        };
        let saved = config
            .bounded("save record", backend.save_record(&self.draft))
            .await?;
        self.open = false;
        Ok(saved)
    }

    /// Discard the draft and close.
    pub fn close(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnd_client::{BackendOperation, InMemoryBackend};
    use cnd_core::ProcessingStatus;

    fn stored() -> CertificateRecord {
        CertificateRecord {
            id: RecordId::new("1").unwrap(),
            taxpayer_id: TaxpayerId::from_raw("12.345.678/0001-90"),
            taxpayer_name: "Empresa ABC Ltda".into(),
            jurisdiction: Jurisdiction::Federal,
            issuing_authority: "Receita Federal".into(),
            clearance_status: ClearanceStatus::Clear,
            issue_date: RecordDate::from_raw("2026-10-01"),
            expiry_date: RecordDate::from_raw("2027-03-30"),
            processing_status: ProcessingStatus::Done,
            processed_at: RecordDate::from_raw("2026-10-01"),
            control_code: "ABC123456789".into(),
            file_available: true,
            error_detail: None,
        }
    }

    #[test]
    fn taxpayer_id_is_immutable_when_editing() {
        let mut editor = RecordEditor::edit(&stored());
        assert_eq!(
            editor.set_taxpayer_id("98765432000110"),
            Err(ValidationError::ImmutableField("taxpayer id"))
        );
        assert_eq!(editor.draft().taxpayer_id.as_str(), "12.345.678/0001-90");
    }

    #[test]
    fn edits_do_not_touch_the_source_record() {
        let record = stored();
        let mut editor = RecordEditor::edit(&record);
        editor.set_taxpayer_name("Renamed");
        assert_eq!(record.taxpayer_name, "Empresa ABC Ltda");
        assert_eq!(editor.draft().taxpayer_name, "Renamed");
    }

    #[tokio::test]
    async fn expiry_before_issue_is_rejected_without_remote_call() {
        let backend = InMemoryBackend::with_records(vec![stored()]);
        let mut editor = RecordEditor::edit(&stored());
        editor.set_expiry_date("2026-01-01");
        let err = editor
            .save(&backend, &PanelConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CndError::Validation(ValidationError::ExpiryBeforeIssue { .. })
        ));
        assert!(editor.is_open());
        assert_eq!(backend.calls(BackendOperation::Save), 0);
    }

    #[tokio::test]
    async fn create_requires_full_taxpayer_id() {
        let backend = InMemoryBackend::new();
        let mut editor = RecordEditor::create(RecordDate::from_raw("2026-10-01"));
        editor.set_taxpayer_name("Nova Empresa");
        editor.set_taxpayer_id("1234").unwrap();
        let err = editor
            .save(&backend, &PanelConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CndError::Validation(ValidationError::InvalidTaxpayerId(_))
        ));
    }

    #[tokio::test]
    async fn successful_create_closes_editor() {
        let backend = InMemoryBackend::new();
        let mut editor = RecordEditor::create(RecordDate::from_raw("2026-10-01"));
        editor.set_taxpayer_id("11222333000144").unwrap();
        editor.set_taxpayer_name("Nova Empresa");
        editor.set_expiry_date("2027-01-01");
        let saved = editor
            .save(&backend, &PanelConfig::default())
            .await
            .unwrap();
        assert_eq!(saved.taxpayer_id.as_str(), "11.222.333/0001-44");
        assert!(!editor.is_open());
        assert_eq!(backend.records().len(), 1);
    }

    #[tokio::test]
    async fn failed_save_keeps_editor_open_with_draft() {
        let backend = InMemoryBackend::with_records(vec![stored()]);
        backend.fail(BackendOperation::Save, "persistence offline");
        let mut editor = RecordEditor::edit(&stored());
        editor.set_issuing_authority("SEFAZ-SP");
        assert!(editor.save(&backend, &PanelConfig::default()).await.is_err());
        assert!(editor.is_open());
        assert_eq!(editor.draft().issuing_authority, "SEFAZ-SP");
    }
}
