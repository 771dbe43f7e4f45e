//! Demo data loaded into the stub at startup.

use cnd_core::{
    CertificateRecord, ClearanceStatus, HistoryEntry, Jurisdiction, ProcessingStatus, RecordDate,
    RecordId, TaxpayerId,
};

use crate::store::AppState;

/// Placeholder bytes served as the certificate document. Not a real PDF.
pub const PLACEHOLDER_DOCUMENT: &[u8] = b"%PDF-1.4\n% cnd-stub placeholder certificate\n%%EOF\n";

/// The two demo records: a federal certificate with a document and a state
/// certificate still pending.
pub fn demo_records() -> Vec<CertificateRecord> {
    vec![
        CertificateRecord {
            id: RecordId::from_raw("1"),
            taxpayer_id: TaxpayerId::from_raw("12.345.678/0001-90"),
            taxpayer_name: "Empresa ABC Ltda".into(),
            jurisdiction: Jurisdiction::Federal,
            issuing_authority: "Receita Federal".into(),
            clearance_status: ClearanceStatus::Clear,
            issue_date: RecordDate::from_raw("2024-01-15"),
            expiry_date: RecordDate::from_raw("2024-07-15"),
            processing_status: ProcessingStatus::Done,
            processed_at: RecordDate::from_raw("2024-01-16"),
            control_code: "ABC123456789DEF".into(),
            file_available: true,
            error_detail: None,
        },
        CertificateRecord {
            id: RecordId::from_raw("2"),
            taxpayer_id: TaxpayerId::from_raw("98.765.432/0001-10"),
            taxpayer_name: "Comércio XYZ S.A.".into(),
            jurisdiction: Jurisdiction::State,
            issuing_authority: "SEFAZ-SP".into(),
            clearance_status: ClearanceStatus::ClearWithPendingEffects,
            issue_date: RecordDate::from_raw("2024-02-10"),
            expiry_date: RecordDate::from_raw("2024-08-10"),
            processing_status: ProcessingStatus::Pending,
            processed_at: RecordDate::from_raw("2024-02-11"),
            control_code: "XYZ987654321GHI".into(),
            file_available: false,
            error_detail: None,
        },
    ]
}

/// Audit trail of the federal demo record.
pub fn demo_history() -> Vec<HistoryEntry> {
    vec![
        HistoryEntry {
            id: "1".into(),
            occurred_at: RecordDate::from_raw("2024-01-15"),
            action: "Query started".into(),
            previous_status: None,
            new_status: None,
            actor: "João Silva".into(),
            note: Some("Query started by the user".into()),
        },
        HistoryEntry {
            id: "2".into(),
            occurred_at: RecordDate::from_raw("2024-01-16"),
            action: "Processing completed".into(),
            previous_status: None,
            new_status: Some(ClearanceStatus::Clear),
            actor: "Automatic processing".into(),
            note: Some("Automatic processing finished successfully".into()),
        },
    ]
}

/// Load the demo records, their documents and history into `state`.
pub fn seed(state: &AppState) {
    for record in demo_records() {
        if record.file_available {
            state.put_document(record.id.clone(), PLACEHOLDER_DOCUMENT.to_vec());
        }
        if record.jurisdiction == Jurisdiction::Federal {
            state.put_history(&record.taxpayer_id, record.jurisdiction, demo_history());
        }
        state.insert(record);
    }
    tracing::info!(records = state.list().len(), "demo data seeded");
}
