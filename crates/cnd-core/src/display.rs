//! # Display Classification
//!
//! Pure functions that classify a record for presentation: badge tone per
//! clearance status and jurisdiction, status icon per processing status,
//! expiry state relative to "now", and the truncated control code.
//!
//! These return semantic values, not styling. A renderer maps
//! [`BadgeTone::Green`] to whatever green means in its toolkit.
//!
//! None of these functions can fail. A date that does not parse yields
//! [`ExpiryStatus::Unknown`], which renderers treat as neither expired nor
//! expiring.

use chrono::{DateTime, Utc};

use crate::jurisdiction::Jurisdiction;
use crate::status::{ClearanceStatus, ProcessingStatus};
use crate::temporal::RecordDate;

/// Days ahead of expiry at which a certificate counts as expiring soon.
pub const EXPIRING_SOON_DAYS: i64 = 30;

/// Characters of the control code shown before truncation.
pub const CONTROL_CODE_PREVIEW_CHARS: usize = 8;

/// Tooltip shown for failed processing when the record carries no detail.
pub const DEFAULT_FAILURE_TOOLTIP: &str = "processing error";

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Semantic colour of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeTone {
    /// Positive outcome.
    Green,
    /// Caution.
    Yellow,
    /// Negative outcome.
    Red,
    /// Federal level.
    Blue,
    /// State level.
    Purple,
    /// Municipal level.
    Orange,
    /// Neutral.
    Gray,
}

/// Kind of icon shown for a processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    /// Completed successfully.
    CheckCircle,
    /// Waiting on the issuer.
    AlertCircle,
    /// Failed.
    XCircle,
}

/// Icon for a processing status, with an optional tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIcon {
    /// Which icon to draw.
    pub kind: IconKind,
    /// Icon colour.
    pub tone: BadgeTone,
    /// Tooltip text; set only for failure statuses.
    pub tooltip: Option<String>,
}

/// Expiry state of a certificate relative to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpiryStatus {
    /// Expiry is strictly before the reference instant.
    Expired,
    /// Expiry falls within the next 30 days.
    ExpiringSoon,
    /// Expiry is more than 30 days away.
    Valid,
    /// The expiry date could not be parsed.
    Unknown,
}

/// Badge tone for a clearance status.
pub fn clearance_badge(status: ClearanceStatus) -> BadgeTone {
    match status {
        ClearanceStatus::Clear => BadgeTone::Green,
        ClearanceStatus::ClearWithPendingEffects => BadgeTone::Yellow,
        ClearanceStatus::NotClear => BadgeTone::Red,
    }
}

/// Badge tone for a jurisdiction.
pub fn jurisdiction_badge(jurisdiction: Jurisdiction) -> BadgeTone {
    match jurisdiction {
        Jurisdiction::Federal => BadgeTone::Blue,
        Jurisdiction::State => BadgeTone::Purple,
        Jurisdiction::Municipal => BadgeTone::Orange,
    }
}

/// Icon for a processing status. Failure statuses carry `error_detail` as
/// tooltip, or [`DEFAULT_FAILURE_TOOLTIP`] when there is none.
pub fn status_icon(status: ProcessingStatus, error_detail: Option<&str>) -> StatusIcon {
    match status {
        ProcessingStatus::Done => StatusIcon {
            kind: IconKind::CheckCircle,
            tone: BadgeTone::Green,
            tooltip: None,
        },
        ProcessingStatus::Pending => StatusIcon {
            kind: IconKind::AlertCircle,
            tone: BadgeTone::Yellow,
            tooltip: None,
        },
        ProcessingStatus::Error | ProcessingStatus::IssuerUnavailable => StatusIcon {
            kind: IconKind::XCircle,
            tone: BadgeTone::Red,
            tooltip: Some(
                error_detail
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or(DEFAULT_FAILURE_TOOLTIP)
                    .to_string(),
            ),
        },
    }
}

/// Classify `expiry` relative to `now`.
///
/// Days remaining are rounded up, so an expiry 29.2 days away counts as 30
/// and is still "expiring soon", while an expiry at or before `now` is never
/// "expiring soon".
pub fn expiry_status(expiry: &RecordDate, now: DateTime<Utc>) -> ExpiryStatus {
    let Some(at) = expiry.to_instant() else {
        return ExpiryStatus::Unknown;
    };
    if at < now {
        return ExpiryStatus::Expired;
    }
    let millis = (at - now).num_milliseconds();
    let days = (millis + MILLIS_PER_DAY - 1).div_euclid(MILLIS_PER_DAY);
    if days > 0 && days <= EXPIRING_SOON_DAYS {
        ExpiryStatus::ExpiringSoon
    } else {
        ExpiryStatus::Valid
    }
}

/// First [`CONTROL_CODE_PREVIEW_CHARS`] characters followed by `...`.
/// Codes that already fit are returned unchanged.
pub fn control_code_preview(code: &str) -> String {
    if code.chars().count() <= CONTROL_CODE_PREVIEW_CHARS {
        return code.to_string();
    }
    let head: String = code.chars().take(CONTROL_CODE_PREVIEW_CHARS).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn expired_strictly_before_now() {
        let now = noon(2024, 7, 15);
        assert_eq!(
            expiry_status(&RecordDate::from_raw("2024-07-14"), now),
            ExpiryStatus::Expired
        );
        // Same-day expiry at UTC midnight is already past at noon.
        assert_eq!(
            expiry_status(&RecordDate::from_raw("2024-07-15"), now),
            ExpiryStatus::Expired
        );
    }

    #[test]
    fn expiring_soon_window() {
        let now = noon(2024, 7, 1);
        // 0.5 days ahead rounds up to 1.
        assert_eq!(
            expiry_status(&RecordDate::from_raw("2024-07-02"), now),
            ExpiryStatus::ExpiringSoon
        );
        // 29.5 days ahead rounds up to 30.
        assert_eq!(
            expiry_status(&RecordDate::from_raw("2024-07-31"), now),
            ExpiryStatus::ExpiringSoon
        );
        // 30.5 days ahead rounds up to 31.
        assert_eq!(
            expiry_status(&RecordDate::from_raw("2024-08-01"), now),
            ExpiryStatus::Valid
        );
    }

    #[test]
    fn exact_expiry_instant_is_not_expiring() {
        let now = Utc.with_ymd_and_hms(2024, 7, 2, 0, 0, 0).unwrap();
        assert_eq!(
            expiry_status(&RecordDate::from_raw("2024-07-02"), now),
            ExpiryStatus::Valid
        );
    }

    #[test]
    fn unparseable_expiry_is_unknown() {
        assert_eq!(
            expiry_status(&RecordDate::from_raw(""), noon(2024, 1, 1)),
            ExpiryStatus::Unknown
        );
    }

    #[test]
    fn badges() {
        assert_eq!(clearance_badge(ClearanceStatus::Clear), BadgeTone::Green);
        assert_eq!(
            clearance_badge(ClearanceStatus::ClearWithPendingEffects),
            BadgeTone::Yellow
        );
        assert_eq!(clearance_badge(ClearanceStatus::NotClear), BadgeTone::Red);
        assert_eq!(jurisdiction_badge(Jurisdiction::Federal), BadgeTone::Blue);
        assert_eq!(jurisdiction_badge(Jurisdiction::State), BadgeTone::Purple);
        assert_eq!(jurisdiction_badge(Jurisdiction::Municipal), BadgeTone::Orange);
    }

    #[test]
    fn failure_icons_carry_detail() {
        let icon = status_icon(ProcessingStatus::Error, Some("invalid certificate"));
        assert_eq!(icon.kind, IconKind::XCircle);
        assert_eq!(icon.tooltip.as_deref(), Some("invalid certificate"));

        let icon = status_icon(ProcessingStatus::IssuerUnavailable, None);
        assert_eq!(icon.tooltip.as_deref(), Some(DEFAULT_FAILURE_TOOLTIP));

        let icon = status_icon(ProcessingStatus::Done, Some("ignored"));
        assert_eq!(icon.kind, IconKind::CheckCircle);
        assert!(icon.tooltip.is_none());

        assert_eq!(
            status_icon(ProcessingStatus::Pending, None).kind,
            IconKind::AlertCircle
        );
    }

    #[test]
    fn control_code_truncation() {
        assert_eq!(control_code_preview("ABC123456789DEF"), "ABC12345...");
        assert_eq!(control_code_preview("SHORT"), "SHORT");
        assert_eq!(control_code_preview("12345678"), "12345678");
        assert_eq!(control_code_preview("ÁÉÍÓÚÇÃÕX"), "ÁÉÍÓÚÇÃÕ...");
    }
}
