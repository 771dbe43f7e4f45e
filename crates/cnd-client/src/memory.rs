//! # In-Memory Backend
//!
//! A [`CertificateBackend`] that keeps everything in process, for panel
//! development and tests that should not need a running service.
//!
//! Every operation can be made to fail ([`InMemoryBackend::fail`]) or to
//! stall ([`InMemoryBackend::delay`]), and every call is counted, so tests
//! can assert both the outcome of an operation and whether a collaborator
//! was reached at all.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use cnd_core::{
    CertificateRecord, CndError, HistoryEntry, Jurisdiction, RecordDraft, RecordId, TaxpayerId,
};
use parking_lot::Mutex;

use crate::backend::CertificateBackend;

/// Collaborator operations, for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendOperation {
    /// [`CertificateBackend::list_records`].
    List,
    /// [`CertificateBackend::save_record`].
    Save,
    /// [`CertificateBackend::delete_records`].
    Delete,
    /// [`CertificateBackend::fetch_document`].
    FetchDocument,
    /// [`CertificateBackend::history`].
    History,
}

impl BackendOperation {
    fn label(self) -> &'static str {
        match self {
            Self::List => "load records",
            Self::Save => "save record",
            Self::Delete => "delete records",
            Self::FetchDocument => "download document",
            Self::History => "load history",
        }
    }
}

#[derive(Debug, Default)]
struct State {
    records: Vec<CertificateRecord>,
    history: HashMap<(String, Jurisdiction), Vec<HistoryEntry>>,
    documents: HashMap<RecordId, Vec<u8>>,
    failures: HashMap<BackendOperation, String>,
    delays: HashMap<BackendOperation, Duration>,
    calls: HashMap<BackendOperation, usize>,
}

/// In-process certificate backend.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: Mutex<State>,
}

impl InMemoryBackend {
    /// An empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend holding the given records, in order.
    pub fn with_records(records: Vec<CertificateRecord>) -> Self {
        let backend = Self::new();
        backend.state.lock().records = records;
        backend
    }

    /// Append a record as if it had been stored by someone else.
    pub fn insert_record(&self, record: CertificateRecord) {
        self.state.lock().records.push(record);
    }

    /// Set the audit history returned for a taxpayer and jurisdiction.
    pub fn set_history(
        &self,
        taxpayer_id: &TaxpayerId,
        jurisdiction: Jurisdiction,
        entries: Vec<HistoryEntry>,
    ) {
        self.state
            .lock()
            .history
            .insert((taxpayer_id.digits(), jurisdiction), entries);
    }

    /// Set the document returned for a record.
    pub fn set_document(&self, id: RecordId, bytes: Vec<u8>) {
        self.state.lock().documents.insert(id, bytes);
    }

    /// Make every subsequent call of `operation` fail with `message`.
    pub fn fail(&self, operation: BackendOperation, message: impl Into<String>) {
        self.state
            .lock()
            .failures
            .insert(operation, message.into());
    }

    /// Undo [`Self::fail`] for `operation`.
    pub fn recover(&self, operation: BackendOperation) {
        self.state.lock().failures.remove(&operation);
    }

    /// Make every subsequent call of `operation` wait `delay` before answering.
    pub fn delay(&self, operation: BackendOperation, delay: Duration) {
        self.state.lock().delays.insert(operation, delay);
    }

    /// Number of calls of `operation` received so far.
    pub fn calls(&self, operation: BackendOperation) -> usize {
        self.state
            .lock()
            .calls
            .get(&operation)
            .copied()
            .unwrap_or(0)
    }

    /// Snapshot of the stored records.
    pub fn records(&self) -> Vec<CertificateRecord> {
        self.state.lock().records.clone()
    }

    /// Count the call, wait out any injected delay, then report any
    /// injected failure. The lock is never held across the sleep.
    async fn enter(&self, operation: BackendOperation) -> Result<(), CndError> {
        let delay = {
            let mut state = self.state.lock();
            *state.calls.entry(operation).or_insert(0) += 1;
            state.delays.get(&operation).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.state.lock().failures.get(&operation) {
            Some(message) => Err(CndError::backend(operation.label(), message.clone())),
            None => Ok(()),
        }
    }
}

fn same_registration(
    record: &CertificateRecord,
    taxpayer_id: &TaxpayerId,
    jurisdiction: Jurisdiction,
) -> bool {
    record.jurisdiction == jurisdiction && record.taxpayer_id.digits() == taxpayer_id.digits()
}

#[async_trait]
impl CertificateBackend for InMemoryBackend {
    async fn list_records(&self) -> Result<Vec<CertificateRecord>, CndError> {
        self.enter(BackendOperation::List).await?;
        Ok(self.records())
    }

    async fn save_record(&self, draft: &RecordDraft) -> Result<CertificateRecord, CndError> {
        self.enter(BackendOperation::Save).await?;
        let mut state = self.state.lock();

        let duplicate = state.records.iter().any(|r| {
            Some(&r.id) != draft.id.as_ref()
                && same_registration(r, &draft.taxpayer_id, draft.jurisdiction)
        });
        if duplicate {
            return Err(CndError::Conflict(format!(
                "a {} certificate for taxpayer {} already exists",
                draft.jurisdiction, draft.taxpayer_id
            )));
        }

        match &draft.id {
            Some(id) => {
                let slot = state
                    .records
                    .iter_mut()
                    .find(|r| &r.id == id)
                    .ok_or_else(|| CndError::NotFound(id.to_string()))?;
                *slot = draft.clone().into_record(id.clone());
                Ok(slot.clone())
            }
            None => {
                let record = draft.clone().into_record(RecordId::generate());
                state.records.push(record.clone());
                tracing::debug!(id = %record.id, "in-memory record created");
                Ok(record)
            }
        }
    }

    async fn delete_records(&self, ids: &[RecordId]) -> Result<(), CndError> {
        self.enter(BackendOperation::Delete).await?;
        let mut state = self.state.lock();

        if let Some(missing) = ids
            .iter()
            .find(|id| !state.records.iter().any(|r| &r.id == *id))
        {
            return Err(CndError::NotFound(missing.to_string()));
        }
        state.records.retain(|r| !ids.contains(&r.id));
        for id in ids {
            state.documents.remove(id);
        }
        Ok(())
    }

    async fn fetch_document(&self, id: &RecordId) -> Result<Vec<u8>, CndError> {
        self.enter(BackendOperation::FetchDocument).await?;
        self.state
            .lock()
            .documents
            .get(id)
            .cloned()
            .ok_or_else(|| CndError::NotFound(format!("no document for record {id}")))
    }

    async fn history(
        &self,
        taxpayer_id: &TaxpayerId,
        jurisdiction: Jurisdiction,
    ) -> Result<Vec<HistoryEntry>, CndError> {
        self.enter(BackendOperation::History).await?;
        Ok(self
            .state
            .lock()
            .history
            .get(&(taxpayer_id.digits(), jurisdiction))
            .cloned()
            .unwrap_or_default())
    }

    fn backend_name(&self) -> &str {
        "InMemoryBackend"
    }
}
