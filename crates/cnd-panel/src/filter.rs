//! # Record Filtering
//!
//! [`FilterCriteria`] is the typed, conjunctive filter applied to the
//! canonical record list. A record is kept only if it satisfies every
//! criterion that is set; unset criteria impose no constraint.
//!
//! [`FilterForm`] is the raw form state as the user types it. Selects use
//! `"all"` (or an empty string) for "no constraint", and the taxpayer id
//! field applies the progressive input mask on every change.
//!
//! ## Sentinel
//!
//! An empty jurisdiction set means "accept every jurisdiction", not
//! "accept none".

use std::collections::BTreeSet;

use cnd_core::identity::{digits_only, mask_input};
use cnd_core::{CertificateRecord, ClearanceStatus, Jurisdiction, ProcessingStatus, ValidationError};

/// Value a select uses for "no constraint".
pub const ANY: &str = "all";

/// Typed filter over certificate records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Taxpayer id fragment. Only its digits are matched.
    pub taxpayer_id: String,
    /// Case-insensitive taxpayer name fragment.
    pub taxpayer_name: String,
    /// Exact clearance status.
    pub clearance_status: Option<ClearanceStatus>,
    /// Exact processing status.
    pub processing_status: Option<ProcessingStatus>,
    /// Accepted jurisdictions; empty accepts all.
    pub jurisdictions: BTreeSet<Jurisdiction>,
}

impl FilterCriteria {
    /// Criteria that accept every record.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether no criterion constrains the result.
    pub fn is_empty(&self) -> bool {
        digits_only(&self.taxpayer_id).is_empty()
            && self.taxpayer_name.is_empty()
            && self.clearance_status.is_none()
            && self.processing_status.is_none()
            && self.jurisdictions.is_empty()
    }

    /// Whether `record` satisfies every set criterion.
    pub fn matches(&self, record: &CertificateRecord) -> bool {
        self.matches_taxpayer_id(record)
            && self.matches_taxpayer_name(record)
            && self
                .clearance_status
                .map_or(true, |s| record.clearance_status == s)
            && self
                .processing_status
                .map_or(true, |s| record.processing_status == s)
            && (self.jurisdictions.is_empty() || self.jurisdictions.contains(&record.jurisdiction))
    }

    fn matches_taxpayer_id(&self, record: &CertificateRecord) -> bool {
        let wanted = digits_only(&self.taxpayer_id);
        wanted.is_empty() || record.taxpayer_id.digits().contains(&wanted)
    }

    fn matches_taxpayer_name(&self, record: &CertificateRecord) -> bool {
        let wanted = self.taxpayer_name.to_lowercase();
        wanted.is_empty() || record.taxpayer_name.to_lowercase().contains(&wanted)
    }

    /// Parse raw form state into criteria.
    ///
    /// # Errors
    ///
    /// Returns the first select or checkbox value that names no known
    /// status or jurisdiction.
    pub fn from_form(form: &FilterForm) -> Result<Self, ValidationError> {
        let jurisdictions = form
            .jurisdictions
            .iter()
            .map(|j| j.parse())
            .collect::<Result<BTreeSet<Jurisdiction>, _>>()?;
        Ok(Self {
            taxpayer_id: form.taxpayer_id.clone(),
            taxpayer_name: form.taxpayer_name.clone(),
            clearance_status: parse_select(&form.clearance_status)?,
            processing_status: parse_select(&form.processing_status)?,
            jurisdictions,
        })
    }
}

fn parse_select<T>(raw: &str) -> Result<Option<T>, ValidationError>
where
    T: std::str::FromStr<Err = ValidationError>,
{
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case(ANY) {
        return Ok(None);
    }
    raw.parse().map(Some)
}

/// Raw filter form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterForm {
    /// Taxpayer id input, already masked.
    pub taxpayer_id: String,
    /// Taxpayer name input.
    pub taxpayer_name: String,
    /// Clearance status select (`"all"` for any).
    pub clearance_status: String,
    /// Processing status select (`"all"` for any).
    pub processing_status: String,
    /// Checked jurisdiction boxes (codes or names).
    pub jurisdictions: Vec<String>,
}

impl Default for FilterForm {
    fn default() -> Self {
        Self {
            taxpayer_id: String::new(),
            taxpayer_name: String::new(),
            clearance_status: ANY.to_string(),
            processing_status: ANY.to_string(),
            jurisdictions: Vec::new(),
        }
    }
}

impl FilterForm {
    /// Replace the taxpayer id input, applying the input mask.
    pub fn set_taxpayer_id(&mut self, raw: &str) {
        self.taxpayer_id = mask_input(raw);
    }

    /// Check or uncheck a jurisdiction box.
    pub fn toggle_jurisdiction(&mut self, jurisdiction: Jurisdiction) {
        let code = jurisdiction.code();
        let before = self.jurisdictions.len();
        self.jurisdictions
            .retain(|j| j.parse::<Jurisdiction>().map_or(true, |parsed| parsed != jurisdiction));
        if self.jurisdictions.len() == before {
            self.jurisdictions.push(code.to_string());
        }
    }
}
