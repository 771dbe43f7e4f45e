//! `cnd history <ID>`: the audit trail of a record's taxpayer and
//! jurisdiction.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use cnd_core::RecordId;
use cnd_panel::{HistoryState, RecordListView};

use crate::render;

/// Arguments of `cnd history`.
#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Id of a record; its taxpayer and jurisdiction select the history.
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Execute `cnd history`. Exits 1 when the history could not be loaded.
pub async fn run_history(
    view: &mut RecordListView,
    args: &HistoryArgs,
    out: &mut dyn Write,
) -> Result<u8> {
    let id = RecordId::new(args.id.as_str()).context("invalid record id")?;
    let viewer = view.open_history(&id).await?;
    render::write_history(out, &viewer)?;
    Ok(match viewer.state() {
        HistoryState::Failed(_) => 1,
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cnd_client::{BackendOperation, InMemoryBackend};
    use cnd_core::{
        CertificateRecord, ClearanceStatus, Jurisdiction, ProcessingStatus, RecordDate,
        TaxpayerId,
    };
    use cnd_panel::PanelConfig;

    fn backend() -> Arc<InMemoryBackend> {
        Arc::new(InMemoryBackend::with_records(vec![CertificateRecord {
            id: RecordId::from_raw("1"),
            taxpayer_id: TaxpayerId::from_raw("12.345.678/0001-90"),
            taxpayer_name: "Empresa ABC Ltda".into(),
            jurisdiction: Jurisdiction::State,
            issuing_authority: "SEFAZ-SP".into(),
            clearance_status: ClearanceStatus::Clear,
            issue_date: RecordDate::from_raw("2026-01-15"),
            expiry_date: RecordDate::from_raw("2026-07-15"),
            processing_status: ProcessingStatus::Done,
            processed_at: RecordDate::from_raw("2026-01-16"),
            control_code: "ABC123456789DEF".into(),
            file_available: false,
            error_detail: None,
        }]))
    }

    async fn loaded(backend: Arc<InMemoryBackend>) -> RecordListView {
        let mut view = RecordListView::new(backend, PanelConfig::default());
        view.load_records().await.unwrap();
        view
    }

    #[tokio::test]
    async fn empty_history_is_not_an_error() {
        let mut view = loaded(backend()).await;
        let mut out = Vec::new();
        let code = run_history(&mut view, &HistoryArgs { id: "1".into() }, &mut out)
            .await
            .unwrap();
        assert_eq!(code, 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("History - 12.345.678/0001-90 | EST"));
        assert!(text.contains("No history found"));
    }

    #[tokio::test]
    async fn failed_history_exits_one() {
        let backend = backend();
        backend.fail(BackendOperation::History, "audit log offline");
        let mut view = loaded(backend).await;
        let mut out = Vec::new();
        let code = run_history(&mut view, &HistoryArgs { id: "1".into() }, &mut out)
            .await
            .unwrap();
        assert_eq!(code, 1);
        assert!(String::from_utf8(out).unwrap().contains("audit log offline"));
    }
}
