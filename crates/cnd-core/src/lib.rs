#![deny(missing_docs)]

//! # cnd-core: Foundational Types for the CND Monitor
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies, only `serde`, `serde_json`,
//! `thiserror`, `chrono`, and `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** A [`RecordId`] is not a
//!    [`TaxpayerId`], and neither is a bare `String`.
//!
//! 2. **Lenient at the boundary, strict at creation.** Records loaded from
//!    the certificate service are accepted as-is so one malformed value never
//!    takes the whole list down. Strict validation ([`TaxpayerId::parse`],
//!    [`RecordDraft::validate`]) runs when a record is created or edited.
//!
//! 3. **Wire names live in serde attributes.** The Rust side uses English
//!    names; the certificate service's JSON field and enum names are mapped
//!    with `#[serde(rename)]` so the two never drift apart silently.
//!
//! 4. **[`CndError`] hierarchy.** Structured errors with `thiserror`; no
//!    `Box<dyn Error>`.

pub mod display;
pub mod error;
pub mod history;
pub mod identity;
pub mod jurisdiction;
pub mod record;
pub mod status;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use display::{BadgeTone, ExpiryStatus, IconKind, StatusIcon};
pub use error::{CndError, ValidationError};
pub use history::HistoryEntry;
pub use identity::{RecordId, TaxpayerId};
pub use jurisdiction::Jurisdiction;
pub use record::{CertificateRecord, RecordDraft};
pub use status::{ClearanceStatus, ProcessingStatus};
pub use temporal::RecordDate;
