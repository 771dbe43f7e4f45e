//! # History Entries
//!
//! One audit event in the life of a certificate, as supplied by the
//! external audit log. Entries are read-only here.

use serde::{Deserialize, Serialize};

use crate::status::ClearanceStatus;
use crate::temporal::RecordDate;

/// A single audit event for a `(taxpayer, jurisdiction)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Identifier of the event within the audit log.
    pub id: String,
    /// When the event happened.
    #[serde(rename = "data")]
    pub occurred_at: RecordDate,
    /// Action label (e.g. "Processing completed").
    #[serde(rename = "acao")]
    pub action: String,
    /// Clearance status before the event, if the event changed it.
    #[serde(
        rename = "situacaoAnterior",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub previous_status: Option<ClearanceStatus>,
    /// Clearance status after the event, if the event changed it.
    #[serde(
        rename = "situacaoNova",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub new_status: Option<ClearanceStatus>,
    /// Who performed the action (a user or an automated process).
    #[serde(rename = "usuario")]
    pub actor: String,
    /// Free-text note.
    #[serde(
        rename = "observacoes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<String>,
}

impl HistoryEntry {
    /// Describe the status change carried by this entry, if any.
    ///
    /// `clear → not-clear` when both sides are known, `→ clear` or
    /// `not-clear →` when only one side is.
    pub fn transition(&self) -> Option<String> {
        match (self.previous_status, self.new_status) {
            (None, None) => None,
            (Some(prev), Some(new)) => Some(format!("{prev} → {new}")),
            (Some(prev), None) => Some(format!("{prev} →")),
            (None, Some(new)) => Some(format!("→ {new}")),
        }
    }
}
