//! # Record List View
//!
//! [`RecordListView`] owns the canonical record list and everything derived
//! from it: the filtered list, the current page, the selection and the
//! notification queue.
//!
//! ## Derived state
//!
//! The filtered list is never stored as a second copy of the records. The
//! view keeps the set of ids that passed the last filter (or `None` when no
//! filter is active) and walks the canonical list through it, so the two
//! lists cannot diverge and canonical order is always preserved. Page slices
//! are computed on demand.
//!
//! ## Remote-then-local mutation
//!
//! Deletions call the deletion collaborator first and only prune local state
//! once the call is acknowledged. A failed or timed-out call leaves every
//! list untouched and queues an error notification. Saves follow the same
//! rule through [`RecordListView::save_editor`].
//!
//! ## In-flight guard
//!
//! Async operations take `&mut self`, so a single owner can never overlap
//! two of them. Hosts that dispatch the remote call elsewhere use the
//! two-phase forms ([`RecordListView::begin_delete`] /
//! [`RecordListView::complete_delete`], [`RecordListView::begin_load`] /
//! [`RecordListView::complete_load`]); ids whose deletion is pending are
//! rejected until it resolves.

use std::collections::HashSet;
use std::sync::Arc;

use cnd_client::CertificateBackend;
use cnd_core::{CertificateRecord, CndError, RecordDate, RecordId};

use crate::config::PanelConfig;
use crate::editor::RecordEditor;
use crate::filter::{FilterCriteria, FilterForm};
use crate::history::HistoryViewer;
use crate::notification::{Notification, Notifications};
use crate::pagination::{self, PageSummary};
use crate::selection::Selection;

/// Progress of the collection fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    Loading,
    Ready,
    /// The last fetch failed; both lists are empty.
    Failed(String),
}

/// View-model of the certificate record table.
pub struct RecordListView {
    backend: Arc<dyn CertificateBackend>,
    config: PanelConfig,
    records: Vec<CertificateRecord>,
    visible: Option<HashSet<RecordId>>,
    criteria: FilterCriteria,
    page: usize,
    selection: Selection,
    state: LoadState,
    deleting: HashSet<RecordId>,
    notifications: Notifications,
}

impl std::fmt::Debug for RecordListView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordListView")
            .field("backend", &self.backend.backend_name())
            .field("records", &self.records.len())
            .field("filtered", &self.filtered_len())
            .field("page", &self.page)
            .field("selected", &self.selection.len())
            .field("state", &self.state)
            .finish()
    }
}

impl RecordListView {
    /// An empty view bound to `backend`. Call [`Self::load_records`] to fill it.
    pub fn new(backend: Arc<dyn CertificateBackend>, config: PanelConfig) -> Self {
        Self {
            backend,
            config,
            records: Vec::new(),
            visible: None,
            criteria: FilterCriteria::none(),
            page: 1,
            selection: Selection::default(),
            state: LoadState::Idle,
            deleting: HashSet::new(),
            notifications: Notifications::default(),
        }
    }

    // -- Loading --

    /// Fetch the full collection from the record source.
    pub async fn load_records(&mut self) -> Result<(), CndError> {
        self.begin_load();
        let result = self
            .config
            .bounded("load records", self.backend.list_records())
            .await;
        self.complete_load(result)
    }

    /// Enter the loading state.
    pub fn begin_load(&mut self) {
        self.state = LoadState::Loading;
    }

    /// Settle a fetch started with [`Self::begin_load`].
    ///
    /// Success replaces the canonical list, clears filters and selection and
    /// returns to page 1. Ids are unique in the canonical list: a repeated
    /// id keeps its first occurrence and later copies are dropped. Failure
    /// empties both lists rather than keeping stale data.
    pub fn complete_load(
        &mut self,
        result: Result<Vec<CertificateRecord>, CndError>,
    ) -> Result<(), CndError> {
        self.visible = None;
        self.criteria = FilterCriteria::none();
        self.page = 1;
        self.selection.clear();
        match result {
            Ok(mut records) => {
                let mut seen = HashSet::with_capacity(records.len());
                records.retain(|r| {
                    let first = seen.insert(r.id.clone());
                    if !first {
                        tracing::warn!(id = %r.id, "duplicate record id dropped from load");
                    }
                    first
                });
                tracing::info!(count = records.len(), "records loaded");
                self.records = records;
                self.state = LoadState::Ready;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "record load failed");
                self.records.clear();
                self.state = LoadState::Failed(e.to_string());
                self.notifications
                    .error(format!("Could not load records: {e}"));
                Err(e)
            }
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    // -- Lists --

    /// The canonical list, in source order.
    pub fn records(&self) -> &[CertificateRecord] {
        &self.records
    }

    /// The filtered list, in canonical order.
    pub fn filtered(&self) -> Vec<&CertificateRecord> {
        self.records
            .iter()
            .filter(|r| self.is_visible(&r.id))
            .collect()
    }

    pub fn filtered_len(&self) -> usize {
        match &self.visible {
            None => self.records.len(),
            Some(ids) => self.records.iter().filter(|r| ids.contains(&r.id)).count(),
        }
    }

    fn is_visible(&self, id: &RecordId) -> bool {
        self.visible.as_ref().map_or(true, |ids| ids.contains(id))
    }

    /// Look up a record of the canonical list.
    pub fn record(&self, id: &RecordId) -> Option<&CertificateRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    // -- Filtering --

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Recompute the filtered list from the canonical list and return to
    /// page 1. Selected ids that are no longer visible are deselected.
    pub fn apply_filters(&mut self, criteria: FilterCriteria) {
        self.visible = if criteria.is_empty() {
            None
        } else {
            Some(
                self.records
                    .iter()
                    .filter(|r| criteria.matches(r))
                    .map(|r| r.id.clone())
                    .collect(),
            )
        };
        self.criteria = criteria;
        self.page = 1;
        if let Some(ids) = &self.visible {
            self.selection.retain(|id| ids.contains(id));
        }
        tracing::debug!(
            total = self.records.len(),
            visible = self.filtered_len(),
            "filters applied"
        );
        self.notifications.success("Filters applied");
    }

    /// Parse the raw form and apply it. An unparseable form leaves the view
    /// unchanged.
    pub fn apply_filter_form(&mut self, form: &FilterForm) -> Result<(), CndError> {
        match FilterCriteria::from_form(form) {
            Ok(criteria) => {
                self.apply_filters(criteria);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "filter form rejected");
                self.notifications
                    .error(format!("Could not apply filters: {e}"));
                Err(e.into())
            }
        }
    }

    /// Drop every criterion; the filtered list becomes the canonical list.
    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::none();
        self.visible = None;
        self.page = 1;
        self.notifications.success("Filters cleared");
    }

    // -- Pagination --

    /// Current page, 1-based.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        pagination::total_pages(self.filtered_len())
    }

    /// Move to page `n`, clamped to `[1, total_pages]`.
    pub fn go_to_page(&mut self, n: usize) {
        self.page = pagination::clamp_page(n, self.filtered_len());
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.page.saturating_sub(1));
    }

    /// Whether the pager should be shown at all.
    pub fn shows_pagination(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn page_summary(&self) -> PageSummary {
        PageSummary::new(self.page, self.filtered_len())
    }

    /// Records of the current page.
    pub fn current_page_slice(&self) -> Vec<&CertificateRecord> {
        let filtered = self.filtered();
        let range = pagination::page_range(self.page, filtered.len());
        filtered[range].to_vec()
    }

    fn current_page_ids(&self) -> Vec<RecordId> {
        self.current_page_slice()
            .into_iter()
            .map(|r| r.id.clone())
            .collect()
    }

    // -- Selection --

    pub fn toggle_selection(&mut self, id: &RecordId) {
        self.selection.toggle(id);
    }

    /// Header checkbox: deselect the page if it is fully selected, select all
    /// of it otherwise. Other pages are untouched.
    pub fn toggle_select_all_on_page(&mut self) {
        let page = self.current_page_ids();
        self.selection.toggle_page(&page);
    }

    /// Header checkbox state. False on an empty page.
    pub fn all_on_page_selected(&self) -> bool {
        let page = self.current_page_ids();
        self.selection.contains_all(&page)
    }

    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selection.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// Selected ids in ascending order.
    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selection.ids()
    }

    // -- Deletion --

    /// Delete one record.
    pub async fn delete_one(&mut self, id: &RecordId) -> Result<(), CndError> {
        self.delete_many(std::slice::from_ref(id)).await
    }

    /// Delete several records in one remote call. Nothing local changes
    /// unless the call is acknowledged.
    pub async fn delete_many(&mut self, ids: &[RecordId]) -> Result<(), CndError> {
        let ids = self.begin_delete(ids)?;
        if ids.is_empty() {
            return Ok(());
        }
        let result = self
            .config
            .bounded("delete records", self.backend.delete_records(&ids))
            .await;
        self.complete_delete(&ids, result)
    }

    /// Delete the current selection.
    pub async fn delete_selected(&mut self) -> Result<(), CndError> {
        let ids = self.selection.ids();
        self.delete_many(&ids).await
    }

    /// Whether a deletion of `id` is pending.
    pub fn is_deleting(&self, id: &RecordId) -> bool {
        self.deleting.contains(id)
    }

    /// Mark `ids` as being deleted and return them, deduplicated.
    ///
    /// # Errors
    ///
    /// [`CndError::InFlight`] if any id is already being deleted,
    /// [`CndError::NotFound`] if any id is not in the canonical list. No id
    /// is marked in either case.
    pub fn begin_delete(&mut self, ids: &[RecordId]) -> Result<Vec<RecordId>, CndError> {
        let mut unique: Vec<RecordId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(id) {
                unique.push(id.clone());
            }
        }
        if let Some(busy) = unique.iter().find(|id| self.deleting.contains(*id)) {
            tracing::warn!(id = %busy, "deletion already in flight");
            let err = CndError::InFlight(format!("deletion of record {busy}"));
            self.notifications.error(err.to_string());
            return Err(err);
        }
        if let Some(missing) = unique.iter().find(|id| self.record(id).is_none()) {
            tracing::warn!(id = %missing, "deletion of unknown record");
            let err = CndError::NotFound(missing.to_string());
            self.notifications.error(format!("Could not delete: {err}"));
            return Err(err);
        }
        self.deleting.extend(unique.iter().cloned());
        Ok(unique)
    }

    /// Settle a deletion started with [`Self::begin_delete`].
    ///
    /// On acknowledgment the ids leave the canonical list, the filtered list
    /// and the selection, and the page is re-clamped. On failure nothing
    /// changes but the in-flight marks.
    pub fn complete_delete(
        &mut self,
        ids: &[RecordId],
        result: Result<(), CndError>,
    ) -> Result<(), CndError> {
        for id in ids {
            self.deleting.remove(id);
        }
        match result {
            Ok(()) => {
                self.records.retain(|r| !ids.contains(&r.id));
                if let Some(visible) = &mut self.visible {
                    for id in ids {
                        visible.remove(id);
                    }
                }
                self.selection.remove_all(ids);
                self.page = pagination::clamp_page(self.page, self.filtered_len());
                tracing::info!(count = ids.len(), "records deleted");
                if ids.len() == 1 {
                    self.notifications.success("Record deleted");
                } else {
                    self.notifications
                        .success(format!("{} records deleted", ids.len()));
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!(count = ids.len(), error = %e, "record deletion failed");
                self.notifications
                    .error(format!("Could not delete records: {e}"));
                Err(e)
            }
        }
    }

    // -- Editing --

    /// Open the editor on an existing record.
    pub fn edit(&mut self, id: &RecordId) -> Result<RecordEditor, CndError> {
        match self.record(id) {
            Some(record) => Ok(RecordEditor::edit(record)),
            None => {
                let err = CndError::NotFound(id.to_string());
                self.notifications.error(format!("Could not edit: {err}"));
                Err(err)
            }
        }
    }

    /// Open the editor on a blank record.
    pub fn new_record(&self) -> RecordEditor {
        RecordEditor::create(RecordDate::from(chrono::Utc::now().date_naive()))
    }

    /// Save the editor's draft and merge the stored record into the lists.
    ///
    /// An existing id is replaced in place in both lists. A new id is
    /// appended to the canonical list, and to the filtered list when it
    /// satisfies the active criteria. On failure the lists are untouched and
    /// the editor stays open.
    pub async fn save_editor(
        &mut self,
        editor: &mut RecordEditor,
    ) -> Result<CertificateRecord, CndError> {
        let creating = editor.draft().is_new();
        match editor.save(self.backend.as_ref(), &self.config).await {
            Ok(saved) => {
                self.merge(saved.clone());
                tracing::info!(id = %saved.id, creating, "record saved");
                self.notifications.success(if creating {
                    "Record created"
                } else {
                    "Changes saved"
                });
                Ok(saved)
            }
            Err(e) => {
                if matches!(e, CndError::Validation(_)) {
                    tracing::warn!(error = %e, "record draft rejected");
                } else {
                    tracing::error!(error = %e, "record save failed");
                }
                self.notifications
                    .error(format!("Could not save changes: {e}"));
                Err(e)
            }
        }
    }

    fn merge(&mut self, saved: CertificateRecord) {
        if let Some(slot) = self.records.iter_mut().find(|r| r.id == saved.id) {
            *slot = saved;
            return;
        }
        if let Some(visible) = &mut self.visible {
            if self.criteria.matches(&saved) {
                visible.insert(saved.id.clone());
            }
        }
        self.records.push(saved);
    }

    // -- Documents & history --

    /// Retrieve the document of a record that has one.
    pub async fn download(&mut self, id: &RecordId) -> Result<Vec<u8>, CndError> {
        let available = match self.record(id) {
            Some(record) => record.file_available,
            None => {
                let err = CndError::NotFound(id.to_string());
                self.notifications.error(format!("Could not download: {err}"));
                return Err(err);
            }
        };
        if !available {
            let err = CndError::NotFound(format!("no document for record {id}"));
            self.notifications.error(format!("Could not download: {err}"));
            return Err(err);
        }
        match self
            .config
            .bounded("download document", self.backend.fetch_document(id))
            .await
        {
            Ok(bytes) => {
                tracing::info!(%id, bytes = bytes.len(), "document downloaded");
                self.notifications.success("Download started");
                Ok(bytes)
            }
            Err(e) => {
                tracing::error!(%id, error = %e, "document download failed");
                self.notifications
                    .error(format!("Could not download the document: {e}"));
                Err(e)
            }
        }
    }

    /// Open and load the history viewer for a record's taxpayer and
    /// jurisdiction.
    pub async fn open_history(&mut self, id: &RecordId) -> Result<HistoryViewer, CndError> {
        let mut viewer = match self.record(id) {
            Some(record) => HistoryViewer::new(record.taxpayer_id.clone(), record.jurisdiction),
            None => {
                let err = CndError::NotFound(id.to_string());
                self.notifications.error(format!("Could not open history: {err}"));
                return Err(err);
            }
        };
        viewer.load(self.backend.as_ref(), &self.config).await;
        Ok(viewer)
    }

    // -- Export & notifications --

    /// The filtered list as pretty-printed JSON, in the service's wire format.
    pub fn export_filtered(&self) -> Result<String, CndError> {
        Ok(serde_json::to_string_pretty(&self.filtered())?)
    }

    /// Take every pending notification, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }
}
