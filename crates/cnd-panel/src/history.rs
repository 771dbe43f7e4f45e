//! Read-only audit history of a `(taxpayer, jurisdiction)` pair.

use cnd_client::CertificateBackend;
use cnd_core::{HistoryEntry, Jurisdiction, TaxpayerId};

use crate::config::PanelConfig;

/// What the viewer currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryState {
    Loading,
    /// The audit log has no entry for this pair.
    NoHistory,
    Entries(Vec<HistoryEntry>),
    Failed(String),
}

/// Modal history viewer.
#[derive(Debug, Clone)]
pub struct HistoryViewer {
    taxpayer_id: TaxpayerId,
    jurisdiction: Jurisdiction,
    state: HistoryState,
}

impl HistoryViewer {
    pub fn new(taxpayer_id: TaxpayerId, jurisdiction: Jurisdiction) -> Self {
        Self {
            taxpayer_id,
            jurisdiction,
            state: HistoryState::Loading,
        }
    }

    /// `History - <taxpayer> | <jurisdiction code>`.
    pub fn title(&self) -> String {
        format!(
            "History - {} | {}",
            self.taxpayer_id.formatted(),
            self.jurisdiction.code()
        )
    }

    pub fn taxpayer_id(&self) -> &TaxpayerId {
        &self.taxpayer_id
    }

    pub fn jurisdiction(&self) -> Jurisdiction {
        self.jurisdiction
    }

    pub fn state(&self) -> &HistoryState {
        &self.state
    }

    /// Loaded entries; empty unless the state is [`HistoryState::Entries`].
    pub fn entries(&self) -> &[HistoryEntry] {
        match &self.state {
            HistoryState::Entries(entries) => entries,
            _ => &[],
        }
    }

    /// Fetch the history from the collaborator and settle the state.
    pub async fn load(&mut self, backend: &dyn CertificateBackend, config: &PanelConfig) {
        self.state = HistoryState::Loading;
        let result = config
            .bounded(
                "load history",
                backend.history(&self.taxpayer_id, self.jurisdiction),
            )
            .await;
        self.state = match result {
            Ok(entries) if entries.is_empty() => HistoryState::NoHistory,
            Ok(entries) => HistoryState::Entries(entries),
            Err(e) => {
                tracing::error!(taxpayer = %self.taxpayer_id, error = %e, "history load failed");
                HistoryState::Failed(e.to_string())
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnd_client::{BackendOperation, InMemoryBackend};
    use cnd_core::{ClearanceStatus, RecordDate};

    fn entry() -> HistoryEntry {
        HistoryEntry {
            id: "1".into(),
            occurred_at: RecordDate::from_raw("2026-10-01T10:30:00Z"),
            action: "Processing completed".into(),
            previous_status: Some(ClearanceStatus::NotClear),
            new_status: Some(ClearanceStatus::Clear),
            actor: "system".into(),
            note: Some("Certificate issued".into()),
        }
    }

    #[test]
    fn title_uses_masked_taxpayer_and_code() {
        let viewer = HistoryViewer::new(TaxpayerId::from_raw("12345678000190"), Jurisdiction::State);
        assert_eq!(viewer.title(), "History - 12.345.678/0001-90 | EST");
        assert_eq!(viewer.state(), &HistoryState::Loading);
    }

    #[tokio::test]
    async fn empty_history_is_explicit_state() {
        let backend = InMemoryBackend::new();
        let mut viewer =
            HistoryViewer::new(TaxpayerId::from_raw("12345678000190"), Jurisdiction::Federal);
        viewer.load(&backend, &PanelConfig::default()).await;
        assert_eq!(viewer.state(), &HistoryState::NoHistory);
        assert!(viewer.entries().is_empty());
    }

    #[tokio::test]
    async fn entries_are_shown_in_order() {
        let backend = InMemoryBackend::new();
        let taxpayer = TaxpayerId::from_raw("12.345.678/0001-90");
        let mut second = entry();
        second.id = "2".into();
        backend.set_history(&taxpayer, Jurisdiction::Federal, vec![entry(), second]);

        let mut viewer = HistoryViewer::new(taxpayer, Jurisdiction::Federal);
        viewer.load(&backend, &PanelConfig::default()).await;
        let ids: Vec<&str> = viewer.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(
            viewer.entries()[0].transition().as_deref(),
            Some("not-clear → clear")
        );
    }

    #[tokio::test]
    async fn collaborator_failure_is_failed_state() {
        let backend = InMemoryBackend::new();
        backend.fail(BackendOperation::History, "audit log offline");
        let mut viewer =
            HistoryViewer::new(TaxpayerId::from_raw("12345678000190"), Jurisdiction::Federal);
        viewer.load(&backend, &PanelConfig::default()).await;
        assert_eq!(
            viewer.state(),
            &HistoryState::Failed("load history failed: audit log offline".into())
        );
    }
}
