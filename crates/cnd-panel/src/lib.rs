//! # cnd-panel -- View-model of the CND monitor
//!
//! The administrative panel without its rendering layer:
//!
//! - [`RecordListView`]: canonical list, filtering, selection, pagination,
//!   transactional deletion, download and export.
//! - [`RecordEditor`]: isolated draft of one record, saved through the
//!   persistence collaborator.
//! - [`HistoryViewer`]: read-only audit history of a taxpayer and
//!   jurisdiction.
//!
//! Collaborators are reached through [`cnd_client::CertificateBackend`], so
//! the same view runs against the HTTP client, the in-memory backend or a
//! test double. Every collaborator failure is turned into a
//! [`Notification`] for the host; none is retried.

pub mod config;
pub mod editor;
pub mod filter;
pub mod history;
pub mod notification;
pub mod pagination;
pub mod selection;
pub mod view;

pub use config::PanelConfig;
pub use editor::{EditorMode, RecordEditor};
pub use filter::{FilterCriteria, FilterForm};
pub use history::{HistoryState, HistoryViewer};
pub use notification::{Notification, NotificationLevel};
pub use pagination::{PageSummary, PAGE_SIZE};
pub use view::{LoadState, RecordListView};
