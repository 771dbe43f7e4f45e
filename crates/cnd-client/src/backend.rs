//! # Collaborator Contracts
//!
//! The panel consumes five external collaborators: the record source, record
//! persistence, record deletion, file retrieval, and the history source.
//! They are grouped in one [`CertificateBackend`] trait because every
//! deployment so far serves them from a single certificate service; a host
//! that splits them can implement the trait as a facade.
//!
//! All methods are asynchronous and fallible. Implementations must be
//! `Send + Sync` so they can be shared behind an `Arc`, and the trait is
//! object-safe to support runtime backend selection (HTTP vs. in-memory).

use async_trait::async_trait;
use cnd_core::{
    CertificateRecord, CndError, HistoryEntry, Jurisdiction, RecordDraft, RecordId, TaxpayerId,
};

/// Operations the panel performs against the outside world.
#[async_trait]
pub trait CertificateBackend: Send + Sync {
    /// Return the full current collection of certificate records.
    async fn list_records(&self) -> Result<Vec<CertificateRecord>, CndError>;

    /// Create (`draft.id` absent) or update a record and return the
    /// authoritative stored version.
    async fn save_record(&self, draft: &RecordDraft) -> Result<CertificateRecord, CndError>;

    /// Remove the given records. All-or-nothing: on error, none of them was
    /// removed.
    async fn delete_records(&self, ids: &[RecordId]) -> Result<(), CndError>;

    /// Retrieve the certificate document for a record.
    async fn fetch_document(&self, id: &RecordId) -> Result<Vec<u8>, CndError>;

    /// Return the ordered audit history of a `(taxpayer, jurisdiction)` pair.
    async fn history(
        &self,
        taxpayer_id: &TaxpayerId,
        jurisdiction: Jurisdiction,
    ) -> Result<Vec<HistoryEntry>, CndError>;

    /// Human-readable name of this backend implementation
    /// (e.g. "CndClient", "InMemoryBackend").
    fn backend_name(&self) -> &str;
}
