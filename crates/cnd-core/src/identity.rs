//! # Identity Newtypes
//!
//! [`RecordId`] identifies a certificate record in the collection.
//! [`TaxpayerId`] is the national tax identifier of the taxpayer the
//! certificate was issued for: 14 digits, displayed with the fixed mask
//! `NN.NNN.NNN/NNNN-NN`.
//!
//! ## Validation
//!
//! Both types deserialize leniently (`serde(transparent)`) because records
//! arrive from an external service and one malformed identifier must not
//! reject the whole collection. [`TaxpayerId::parse`] is the strict
//! constructor used when a record is created.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Number of digits in a taxpayer identifier.
pub const TAXPAYER_ID_DIGITS: usize = 14;

/// Maximum length of a masked taxpayer identifier (14 digits + 4 separators).
const MASKED_LEN: usize = 18;

/// Opaque identifier of a certificate record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create a record identifier, rejecting empty or whitespace-only values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyRecordId`] for blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::EmptyRecordId);
        }
        Ok(Self(s))
    }

    /// Wrap an identifier without validation, as for values read from the
    /// certificate service.
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Create a fresh random identifier (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// National tax identifier of a taxpayer (14 digits).
///
/// The value is kept exactly as supplied. [`digits`](Self::digits) gives the
/// punctuation-free form used for matching, [`formatted`](Self::formatted)
/// the masked form used for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxpayerId(String);

impl TaxpayerId {
    /// Parse a taxpayer id, validating that it holds exactly 14 digits.
    ///
    /// Accepts `"12345678000190"` and `"12.345.678/0001-90"`. Stores the
    /// masked form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTaxpayerId`] when the input contains
    /// characters other than digits and mask punctuation, or when the digit
    /// count is not 14.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '/' | '-'))
        {
            return Err(ValidationError::InvalidTaxpayerId(value.to_string()));
        }
        let digits = digits_only(trimmed);
        if digits.len() != TAXPAYER_ID_DIGITS {
            return Err(ValidationError::InvalidTaxpayerId(value.to_string()));
        }
        Ok(Self(mask_input(&digits)))
    }

    /// Wrap a value as supplied by the certificate service, without validation.
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the identifier exactly as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier with every non-digit character removed.
    pub fn digits(&self) -> String {
        digits_only(&self.0)
    }

    /// Whether the identifier holds exactly 14 digits.
    pub fn is_well_formed(&self) -> bool {
        self.digits().len() == TAXPAYER_ID_DIGITS
    }

    /// Masked form `NN.NNN.NNN/NNNN-NN`; values that are not 14 digits are
    /// returned unchanged.
    pub fn formatted(&self) -> String {
        if self.is_well_formed() {
            mask_input(&self.0)
        } else {
            self.0.clone()
        }
    }
}

impl std::fmt::Display for TaxpayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strip every character that is not an ASCII digit.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Progressive input mask for taxpayer ids.
///
/// Keeps only digits and inserts separators as soon as the digit that
/// follows them is typed: `12` → `12`, `123` → `12.3`, `123456789` →
/// `12.345.678/9`. Output never exceeds 18 characters, so excess digits are
/// dropped.
pub fn mask_input(value: &str) -> String {
    let mut out = String::with_capacity(MASKED_LEN);
    for (i, c) in value.chars().filter(|c| c.is_ascii_digit()).enumerate() {
        match i {
            2 | 5 => out.push('.'),
            8 => out.push('/'),
            12 => out.push('-'),
            _ => {}
        }
        out.push(c);
    }
    out.truncate(MASKED_LEN);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- RecordId --

    #[test]
    fn record_id_rejects_blank() {
        assert!(RecordId::new("").is_err());
        assert!(RecordId::new("  ").is_err());
        assert_eq!(RecordId::new("1").unwrap().as_str(), "1");
    }

    #[test]
    fn record_id_generate_unique() {
        assert_ne!(RecordId::generate(), RecordId::generate());
    }

    // -- TaxpayerId --

    #[test]
    fn taxpayer_id_parse_digits_only() {
        let id = TaxpayerId::parse("12345678000190").unwrap();
        assert_eq!(id.as_str(), "12.345.678/0001-90");
        assert_eq!(id.digits(), "12345678000190");
    }

    #[test]
    fn taxpayer_id_parse_masked() {
        let id = TaxpayerId::parse("98.765.432/0001-10").unwrap();
        assert_eq!(id.digits(), "98765432000110");
        assert!(id.is_well_formed());
    }

    #[test]
    fn taxpayer_id_rejects_invalid() {
        assert!(TaxpayerId::parse("").is_err());
        assert!(TaxpayerId::parse("1234567800019").is_err()); // 13 digits
        assert!(TaxpayerId::parse("123456780001901").is_err()); // 15 digits
        assert!(TaxpayerId::parse("12.345.678/0001-9a").is_err());
    }

    #[test]
    fn taxpayer_id_from_raw_keeps_value() {
        let id = TaxpayerId::from_raw("not a number");
        assert_eq!(id.as_str(), "not a number");
        assert_eq!(id.digits(), "");
        assert_eq!(id.formatted(), "not a number");
    }

    #[test]
    fn formatted_masks_bare_digits() {
        let id = TaxpayerId::from_raw("12345678000190");
        assert_eq!(id.formatted(), "12.345.678/0001-90");
    }

    // -- mask_input --

    #[test]
    fn mask_is_progressive() {
        assert_eq!(mask_input(""), "");
        assert_eq!(mask_input("12"), "12");
        assert_eq!(mask_input("123"), "12.3");
        assert_eq!(mask_input("123456"), "12.345.6");
        assert_eq!(mask_input("123456789"), "12.345.678/9");
        assert_eq!(mask_input("1234567800019"), "12.345.678/0001-9");
    }

    #[test]
    fn mask_strips_punctuation_and_truncates() {
        assert_eq!(mask_input("12.345.678/0001-90"), "12.345.678/0001-90");
        assert_eq!(mask_input("12a34"), "12.34");
        assert_eq!(mask_input("1234567800019099"), "12.345.678/0001-90");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Masking never changes which digits are present, only how they are grouped
        /// (up to the 14-digit limit).
        #[test]
        fn mask_preserves_digit_prefix(input in "[0-9./ -]{0,30}") {
            let masked = mask_input(&input);
            let digits = digits_only(&input);
            let kept = digits_only(&masked);
            prop_assert!(digits.starts_with(&kept));
            prop_assert!(masked.chars().count() <= MASKED_LEN);
        }

        /// Any 14 digits parse, and the parsed form re-parses to itself.
        #[test]
        fn fourteen_digits_always_parse(digits in "[0-9]{14}") {
            let id = TaxpayerId::parse(&digits).unwrap();
            prop_assert_eq!(id.digits(), digits);
            let again = TaxpayerId::parse(id.as_str()).unwrap();
            prop_assert_eq!(again, id);
        }
    }
}
