//! # Temporal Types
//!
//! [`RecordDate`] holds a calendar date exactly as the certificate service
//! sent it. Parsing happens on demand, so an unparseable value affects only
//! the record that carries it: display helpers treat it as "unknown" instead
//! of failing the whole collection.
//!
//! Dates are interpreted as UTC midnight, which is how the service emits
//! them (`YYYY-MM-DD`). RFC 3339 datetimes are also accepted; history
//! entries use them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar date (or datetime) as supplied by the certificate service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordDate(String);

impl RecordDate {
    /// Wrap a raw value without validation.
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Build from a calendar date, serialized as `YYYY-MM-DD`.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date.format(DATE_FORMAT).to_string())
    }

    /// Parse strictly, for values entered in the editor.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDate`] if the value is neither a
    /// `YYYY-MM-DD` date nor an RFC 3339 datetime.
    pub fn parse(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        let date = Self::from_raw(value.trim());
        if date.to_naive().is_none() {
            return Err(ValidationError::InvalidDate {
                field,
                value: value.to_string(),
            });
        }
        Ok(date)
    }

    /// Access the raw value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The calendar date, or `None` if the raw value does not parse.
    pub fn to_naive(&self) -> Option<NaiveDate> {
        let raw = self.0.trim();
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc).date_naive())
            })
    }

    /// The instant this value denotes: UTC midnight for plain dates, the
    /// exact instant for datetimes.
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        let raw = self.0.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// `dd/mm/yyyy` when parseable, the raw value otherwise.
    pub fn display_date(&self) -> String {
        match self.to_naive() {
            Some(d) => d.format("%d/%m/%Y").to_string(),
            None => self.0.clone(),
        }
    }

    /// `dd/mm/yyyy HH:MM` when parseable, the raw value otherwise.
    pub fn display_datetime(&self) -> String {
        match self.to_instant() {
            Some(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
            None => self.0.clone(),
        }
    }
}

impl std::fmt::Display for RecordDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NaiveDate> for RecordDate {
    fn from(date: NaiveDate) -> Self {
        Self::from_naive(date)
    }
}
