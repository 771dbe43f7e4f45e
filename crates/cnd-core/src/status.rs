//! # Certificate Status Enums
//!
//! [`ClearanceStatus`] is what the certificate says about the taxpayer.
//! [`ProcessingStatus`] is where the system's attempt to obtain the
//! certificate stands. Both serialize to the certificate service's wire
//! values.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Debt status attested by a clearance certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClearanceStatus {
    /// No outstanding debts.
    #[serde(rename = "Negativa")]
    Clear,
    /// Debts exist but are suspended or guaranteed; legally equivalent to clear.
    #[serde(rename = "Positiva com Efeitos de Negativa")]
    ClearWithPendingEffects,
    /// Outstanding debts.
    #[serde(rename = "Positiva")]
    NotClear,
}

impl ClearanceStatus {
    /// All clearance statuses, in display order.
    pub const ALL: [ClearanceStatus; 3] = [
        Self::Clear,
        Self::ClearWithPendingEffects,
        Self::NotClear,
    ];

    /// Wire value used by the certificate service.
    pub fn wire_value(self) -> &'static str {
        match self {
            Self::Clear => "Negativa",
            Self::ClearWithPendingEffects => "Positiva com Efeitos de Negativa",
            Self::NotClear => "Positiva",
        }
    }

    /// Short English name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::ClearWithPendingEffects => "clear-with-pending-effects",
            Self::NotClear => "not-clear",
        }
    }
}

impl std::fmt::Display for ClearanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ClearanceStatus {
    type Err = ValidationError;

    /// Accepts the English name (`clear`, `clear-with-pending-effects`,
    /// `not-clear`, underscores allowed) or the exact wire value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(status) = Self::ALL.into_iter().find(|c| c.wire_value() == trimmed) {
            return Ok(status);
        }
        match trimmed.to_ascii_lowercase().replace('_', "-").as_str() {
            "clear" => Ok(Self::Clear),
            "clear-with-pending-effects" => Ok(Self::ClearWithPendingEffects),
            "not-clear" => Ok(Self::NotClear),
            _ => Err(ValidationError::UnknownClearanceStatus(s.to_string())),
        }
    }
}

/// State of the system's attempt to obtain a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProcessingStatus {
    /// Certificate obtained.
    #[serde(rename = "Concluído")]
    Done,
    /// Request queued or in progress.
    #[serde(rename = "Pendente")]
    Pending,
    /// The issuer answered with an error.
    #[serde(rename = "Erro")]
    Error,
    /// The issuer could not be reached.
    #[serde(rename = "Emissor Indisponível")]
    IssuerUnavailable,
}

impl ProcessingStatus {
    /// All processing statuses, in display order.
    pub const ALL: [ProcessingStatus; 4] = [
        Self::Done,
        Self::Pending,
        Self::Error,
        Self::IssuerUnavailable,
    ];

    /// Whether this status represents a failed attempt. Only failure
    /// statuses carry a meaningful error detail.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Error | Self::IssuerUnavailable)
    }

    /// Wire value used by the certificate service.
    pub fn wire_value(self) -> &'static str {
        match self {
            Self::Done => "Concluído",
            Self::Pending => "Pendente",
            Self::Error => "Erro",
            Self::IssuerUnavailable => "Emissor Indisponível",
        }
    }

    /// Short English name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Pending => "pending",
            Self::Error => "error",
            Self::IssuerUnavailable => "issuer-unavailable",
        }
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ProcessingStatus {
    type Err = ValidationError;

    /// Accepts the English name (`done`, `pending`, `error`,
    /// `issuer-unavailable`, underscores allowed) or the exact wire value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(status) = Self::ALL.into_iter().find(|p| p.wire_value() == trimmed) {
            return Ok(status);
        }
        match trimmed.to_ascii_lowercase().replace('_', "-").as_str() {
            "done" => Ok(Self::Done),
            "pending" => Ok(Self::Pending),
            "error" => Ok(Self::Error),
            "issuer-unavailable" => Ok(Self::IssuerUnavailable),
            _ => Err(ValidationError::UnknownProcessingStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearance_wire_values() {
        let json = serde_json::to_string(&ClearanceStatus::ClearWithPendingEffects).unwrap();
        assert_eq!(json, "\"Positiva com Efeitos de Negativa\"");
        let back: ClearanceStatus = serde_json::from_str("\"Negativa\"").unwrap();
        assert_eq!(back, ClearanceStatus::Clear);
    }

    #[test]
    fn processing_wire_values() {
        let back: ProcessingStatus = serde_json::from_str("\"Emissor Indisponível\"").unwrap();
        assert_eq!(back, ProcessingStatus::IssuerUnavailable);
        assert_eq!(
            serde_json::to_string(&ProcessingStatus::Done).unwrap(),
            "\"Concluído\""
        );
    }

    #[test]
    fn parse_accepts_labels_and_wire_values() {
        assert_eq!("not_clear".parse::<ClearanceStatus>().unwrap(), ClearanceStatus::NotClear);
        assert_eq!("Positiva".parse::<ClearanceStatus>().unwrap(), ClearanceStatus::NotClear);
        assert_eq!(
            "Issuer-Unavailable".parse::<ProcessingStatus>().unwrap(),
            ProcessingStatus::IssuerUnavailable
        );
        assert_eq!("Pendente".parse::<ProcessingStatus>().unwrap(), ProcessingStatus::Pending);
        assert!("maybe".parse::<ClearanceStatus>().is_err());
        assert!("stuck".parse::<ProcessingStatus>().is_err());
    }

    #[test]
    fn only_error_statuses_are_failures() {
        assert!(!ProcessingStatus::Done.is_failure());
        assert!(!ProcessingStatus::Pending.is_failure());
        assert!(ProcessingStatus::Error.is_failure());
        assert!(ProcessingStatus::IssuerUnavailable.is_failure());
    }
}
