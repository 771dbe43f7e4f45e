//! In-memory storage of the certificate service stub.
//!
//! Records live in one ordered `Vec` behind a `RwLock` so listing keeps
//! insertion order. Documents and audit history are keyed lookups and live
//! in `DashMap`s. Every create, update and delete appends an audit entry.

use std::sync::Arc;

use chrono::Utc;
use cnd_core::{
    CertificateRecord, ClearanceStatus, CndError, HistoryEntry, Jurisdiction, RecordDate,
    RecordDraft, RecordId, TaxpayerId, ValidationError,
};
use dashmap::DashMap;
use parking_lot::RwLock;

/// Actor recorded on audit entries written by the stub itself.
pub const STUB_ACTOR: &str = "cnd-stub";

type HistoryKey = (String, Jurisdiction);

struct Inner {
    records: RwLock<Vec<CertificateRecord>>,
    documents: DashMap<RecordId, Vec<u8>>,
    history: DashMap<HistoryKey, Vec<HistoryEntry>>,
}

/// Shared application state.
///
/// Cheaply cloneable via `Arc`; all clones share the same data.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn history_key(taxpayer_id: &TaxpayerId, jurisdiction: Jurisdiction) -> HistoryKey {
    (taxpayer_id.digits(), jurisdiction)
}

impl AppState {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                records: RwLock::new(Vec::new()),
                documents: DashMap::new(),
                history: DashMap::new(),
            }),
        }
    }

    /// Every record, in insertion order.
    pub fn list(&self) -> Vec<CertificateRecord> {
        self.inner.records.read().clone()
    }

    /// Store a record verbatim, bypassing validation. Used for seeding.
    pub fn insert(&self, record: CertificateRecord) {
        self.inner.records.write().push(record);
    }

    pub fn put_document(&self, id: RecordId, bytes: Vec<u8>) {
        self.inner.documents.insert(id, bytes);
    }

    pub fn put_history(
        &self,
        taxpayer_id: &TaxpayerId,
        jurisdiction: Jurisdiction,
        entries: Vec<HistoryEntry>,
    ) {
        self.inner
            .history
            .insert(history_key(taxpayer_id, jurisdiction), entries);
    }

    /// Create a record from a draft and assign it a fresh id.
    ///
    /// # Errors
    ///
    /// [`CndError::Validation`] for an invalid draft, [`CndError::Conflict`]
    /// when the taxpayer already has a certificate for the jurisdiction.
    pub fn create(&self, draft: RecordDraft) -> Result<CertificateRecord, CndError> {
        draft.validate()?;
        let mut records = self.inner.records.write();
        ensure_unique(&records, None, &draft)?;
        let record = draft.into_record(RecordId::generate());
        records.push(record.clone());
        drop(records);

        self.audit(&record, "Record created", None);
        Ok(record)
    }

    /// Replace the record `id` with the draft's fields.
    ///
    /// # Errors
    ///
    /// [`CndError::NotFound`] for an unknown id,
    /// [`ValidationError::ImmutableField`] when the draft carries another
    /// taxpayer id, otherwise as [`Self::create`].
    pub fn update(&self, id: &RecordId, draft: RecordDraft) -> Result<CertificateRecord, CndError> {
        draft.validate()?;
        let mut records = self.inner.records.write();
        let index = records
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| CndError::NotFound(format!("record {id} not found")))?;
        if records[index].taxpayer_id.digits() != draft.taxpayer_id.digits() {
            return Err(ValidationError::ImmutableField("taxpayer id").into());
        }
        ensure_unique(&records, Some(id), &draft)?;
        let previous = records[index].clearance_status;
        records[index] = draft.into_record(id.clone());
        let record = records[index].clone();
        drop(records);

        self.audit(&record, "Record updated", Some(previous));
        Ok(record)
    }

    /// Delete every record in `ids`, or none of them.
    ///
    /// # Errors
    ///
    /// [`CndError::NotFound`] naming the first unknown id.
    pub fn delete(&self, ids: &[RecordId]) -> Result<Vec<CertificateRecord>, CndError> {
        let mut records = self.inner.records.write();
        if let Some(missing) = ids.iter().find(|id| !records.iter().any(|r| &r.id == *id)) {
            return Err(CndError::NotFound(format!("record {missing} not found")));
        }
        let (removed, kept): (Vec<_>, Vec<_>) =
            records.drain(..).partition(|r| ids.contains(&r.id));
        *records = kept;
        drop(records);

        for record in &removed {
            self.inner.documents.remove(&record.id);
            self.audit(record, "Record deleted", Some(record.clearance_status));
        }
        Ok(removed)
    }

    /// The document of record `id`.
    ///
    /// # Errors
    ///
    /// [`CndError::NotFound`] when the record is unknown or has no document.
    pub fn document(&self, id: &RecordId) -> Result<Vec<u8>, CndError> {
        let exists = self.inner.records.read().iter().any(|r| &r.id == id);
        if !exists {
            return Err(CndError::NotFound(format!("record {id} not found")));
        }
        self.inner
            .documents
            .get(id)
            .map(|doc| doc.value().clone())
            .ok_or_else(|| CndError::NotFound(format!("no document for record {id}")))
    }

    /// Audit history of a taxpayer and jurisdiction, oldest first.
    pub fn history(&self, taxpayer_id: &TaxpayerId, jurisdiction: Jurisdiction) -> Vec<HistoryEntry> {
        self.inner
            .history
            .get(&history_key(taxpayer_id, jurisdiction))
            .map(|entries| entries.value().clone())
            .unwrap_or_default()
    }

    fn audit(&self, record: &CertificateRecord, action: &str, previous: Option<ClearanceStatus>) {
        let mut entries = self
            .inner
            .history
            .entry(history_key(&record.taxpayer_id, record.jurisdiction))
            .or_default();
        let entry = HistoryEntry {
            id: (entries.len() + 1).to_string(),
            occurred_at: RecordDate::from_raw(Utc::now().to_rfc3339()),
            action: action.to_string(),
            previous_status: previous,
            new_status: Some(record.clearance_status),
            actor: STUB_ACTOR.to_string(),
            note: None,
        };
        entries.push(entry);
    }
}

fn ensure_unique(
    records: &[CertificateRecord],
    except: Option<&RecordId>,
    draft: &RecordDraft,
) -> Result<(), CndError> {
    let digits = draft.taxpayer_id.digits();
    let clash = records.iter().any(|r| {
        Some(&r.id) != except
            && r.jurisdiction == draft.jurisdiction
            && r.taxpayer_id.digits() == digits
    });
    if clash {
        return Err(CndError::Conflict(format!(
            "taxpayer {} already has a {} certificate",
            draft.taxpayer_id, draft.jurisdiction
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnd_core::ProcessingStatus;

    fn draft(taxpayer: &str) -> RecordDraft {
        RecordDraft {
            taxpayer_id: TaxpayerId::from_raw(taxpayer),
            taxpayer_name: "Empresa ABC Ltda".into(),
            issuing_authority: "Receita Federal".into(),
            processing_status: ProcessingStatus::Done,
            expiry_date: RecordDate::from_raw("2027-01-15"),
            ..RecordDraft::blank(RecordDate::from_raw("2026-10-01"))
        }
    }

    #[test]
    fn create_then_update_writes_audit_trail() {
        let state = AppState::new();
        let created = state.create(draft("12.345.678/0001-90")).unwrap();
        let mut change = draft("12.345.678/0001-90");
        change.clearance_status = ClearanceStatus::NotClear;
        state.update(&created.id, change).unwrap();

        let history = state.history(&created.taxpayer_id, Jurisdiction::Federal);
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].previous_status, Some(ClearanceStatus::Clear));
        assert_eq!(history[1].new_status, Some(ClearanceStatus::NotClear));
    }

    #[test]
    fn update_keeps_taxpayer_id_fixed() {
        let state = AppState::new();
        let created = state.create(draft("12.345.678/0001-90")).unwrap();

        let err = state
            .update(&created.id, draft("98.765.432/0001-10"))
            .unwrap_err();
        assert!(matches!(
            err,
            CndError::Validation(ValidationError::ImmutableField("taxpayer id"))
        ));
        assert_eq!(state.list()[0].taxpayer_id.as_str(), "12.345.678/0001-90");
        assert_eq!(
            state.history(&created.taxpayer_id, Jurisdiction::Federal).len(),
            1
        );

        // Same digits, different punctuation.
        let mut unmasked = draft("12345678000190");
        unmasked.taxpayer_name = "Renamed".into();
        let updated = state.update(&created.id, unmasked).unwrap();
        assert_eq!(updated.taxpayer_name, "Renamed");
    }

    #[test]
    fn invalid_draft_is_rejected() {
        let state = AppState::new();
        let err = state.create(draft("123")).unwrap_err();
        assert!(matches!(err, CndError::Validation(_)));
        assert!(state.list().is_empty());
    }

    #[test]
    fn delete_is_all_or_nothing() {
        let state = AppState::new();
        let a = state.create(draft("11111111000111")).unwrap();
        let b = state.create(draft("22222222000122")).unwrap();
        let err = state
            .delete(&[a.id.clone(), RecordId::new("ghost").unwrap()])
            .unwrap_err();
        assert!(matches!(err, CndError::NotFound(_)));
        assert_eq!(state.list().len(), 2);

        let removed = state.delete(&[b.id.clone(), a.id.clone()]).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(state.list().is_empty());
    }

    #[test]
    fn document_requires_record_and_file() {
        let state = AppState::new();
        let rec = state.create(draft("11111111000111")).unwrap();
        assert!(state.document(&rec.id).is_err());
        state.put_document(rec.id.clone(), b"%PDF".to_vec());
        assert_eq!(state.document(&rec.id).unwrap(), b"%PDF");
        state.delete(&[rec.id.clone()]).unwrap();
        assert!(state.document(&rec.id).is_err());
    }
}
