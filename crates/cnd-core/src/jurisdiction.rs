//! # Jurisdiction
//!
//! The governmental level that issues a clearance certificate. On the wire
//! the certificate service uses the three-letter codes `FED`, `EST`, `MUN`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Issuing governmental level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Jurisdiction {
    /// Federal revenue authority.
    #[serde(rename = "FED")]
    Federal,
    /// State revenue authority.
    #[serde(rename = "EST")]
    State,
    /// Municipal revenue authority.
    #[serde(rename = "MUN")]
    Municipal,
}

impl Jurisdiction {
    /// All jurisdictions, in display order.
    pub const ALL: [Jurisdiction; 3] = [Self::Federal, Self::State, Self::Municipal];

    /// Wire code (`FED`, `EST`, `MUN`).
    pub fn code(self) -> &'static str {
        match self {
            Self::Federal => "FED",
            Self::State => "EST",
            Self::Municipal => "MUN",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Federal => "Federal",
            Self::State => "State",
            Self::Municipal => "Municipal",
        }
    }
}

impl std::fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Jurisdiction {
    type Err = ValidationError;

    /// Accepts the wire code or the English name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fed" | "federal" => Ok(Self::Federal),
            "est" | "state" => Ok(Self::State),
            "mun" | "municipal" => Ok(Self::Municipal),
            _ => Err(ValidationError::UnknownJurisdiction(s.to_string())),
        }
    }
}
