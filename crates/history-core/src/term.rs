//! Compact term identifiers.
//!
//! The upstream registration service names a term by a single integer:
//! `(year - 1900) * 10 + digit`, where the digit is `1` for spring, `4` for
//! summer and `7` for fall. `1247` is therefore Fall 2024.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HistoryError, Result};

/// Year that term identifiers count from.
pub const BASE_YEAR: i32 = 1900;

// ── TermName ──────────────────────────────────────────────────────────────────

/// One academic offering period within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermName {
    Spring,
    Summer,
    Fall,
    /// Produced only when decoding an identifier with an unexpected digit.
    Unknown,
}

impl TermName {
    /// The three real terms in their order within a year.
    pub const ORDERED: [TermName; 3] = [TermName::Spring, TermName::Summer, TermName::Fall];

    /// Lowercase name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TermName::Spring => "spring",
            TermName::Summer => "summer",
            TermName::Fall => "fall",
            TermName::Unknown => "unknown",
        }
    }

    /// Capitalized name for display (`"Spring"`).
    pub fn display_name(&self) -> &'static str {
        match self {
            TermName::Spring => "Spring",
            TermName::Summer => "Summer",
            TermName::Fall => "Fall",
            TermName::Unknown => "Unknown",
        }
    }

    /// Identifier digit, or `None` for [`TermName::Unknown`].
    pub fn digit(&self) -> Option<i64> {
        match self {
            TermName::Spring => Some(1),
            TermName::Summer => Some(4),
            TermName::Fall => Some(7),
            TermName::Unknown => None,
        }
    }

    fn from_digit(digit: i64) -> Self {
        match digit {
            1 => TermName::Spring,
            4 => TermName::Summer,
            7 => TermName::Fall,
            _ => TermName::Unknown,
        }
    }
}

impl fmt::Display for TermName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TermName {
    type Err = HistoryError;

    /// Case-insensitive. `"unknown"` is not a valid input.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "spring" => Ok(TermName::Spring),
            "summer" => Ok(TermName::Summer),
            "fall" => Ok(TermName::Fall),
            _ => Err(HistoryError::InvalidTermName(s.to_string())),
        }
    }
}

// ── TermId ────────────────────────────────────────────────────────────────────

/// Encoded `(year, term)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(i64);

impl TermId {
    /// Encode a year and term.
    pub fn encode(year: i32, term: TermName) -> Result<Self> {
        let digit = term
            .digit()
            .ok_or_else(|| HistoryError::InvalidTermName(term.as_str().to_string()))?;
        Ok(Self((i64::from(year) - i64::from(BASE_YEAR)) * 10 + digit))
    }

    /// Encode a year and a term name given as text.
    pub fn encode_str(year: i32, term: &str) -> Result<Self> {
        Self::encode(year, term.parse()?)
    }

    /// Wrap an identifier received from elsewhere without validation.
    pub fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Term of the year. Never fails.
    pub fn term_name(&self) -> TermName {
        TermName::from_digit(self.0.rem_euclid(10))
    }

    pub fn year(&self) -> i32 {
        // Out-of-range ids saturate rather than wrap.
        let year = i64::from(BASE_YEAR) + self.0.div_euclid(10);
        i32::try_from(year).unwrap_or(if year < 0 { i32::MIN } else { i32::MAX })
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Free functions over raw identifiers ───────────────────────────────────────

/// Encode `(year, term_name)` into a raw identifier.
pub fn encode(year: i32, term_name: &str) -> Result<i64> {
    TermId::encode_str(year, term_name).map(|id| id.value())
}

/// Term name for a raw identifier; `"unknown"` for unexpected digits.
pub fn decode_term_name(id: i64) -> &'static str {
    TermId::from_raw(id).term_name().as_str()
}

/// Calendar year for a raw identifier.
pub fn decode_year(id: i64) -> i32 {
    TermId::from_raw(id).year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_known_terms() {
        assert_eq!(TermId::encode(2024, TermName::Spring).unwrap().value(), 1241);
        assert_eq!(TermId::encode(2024, TermName::Summer).unwrap().value(), 1244);
        assert_eq!(TermId::encode(2024, TermName::Fall).unwrap().value(), 1247);
        assert_eq!(TermId::encode(1900, TermName::Fall).unwrap().value(), 7);
    }

    #[test]
    fn test_encode_str_case_insensitive() {
        assert_eq!(encode(2025, "FALL").unwrap(), 1257);
        assert_eq!(encode(2025, "Spring").unwrap(), 1251);
    }

    #[test]
    fn test_encode_rejects_unknown_names() {
        assert!(matches!(
            encode(2024, "winter"),
            Err(HistoryError::InvalidTermName(name)) if name == "winter"
        ));
        assert!(TermId::encode(2024, TermName::Unknown).is_err());
        assert!(encode(2024, "unknown").is_err());
    }

    #[test]
    fn test_decode_unexpected_digit_is_unknown() {
        assert_eq!(decode_term_name(1240), "unknown");
        assert_eq!(decode_term_name(1249), "unknown");
        assert_eq!(decode_term_name(1247), "fall");
    }

    #[test]
    fn test_decode_year() {
        assert_eq!(decode_year(1247), 2024);
        assert_eq!(decode_year(7), 1900);
    }

    #[test]
    fn test_years_before_base_round_trip() {
        let id = TermId::encode(1899, TermName::Spring).unwrap();
        assert_eq!(id.value(), -9);
        assert_eq!(id.year(), 1899);
        assert_eq!(id.term_name(), TermName::Spring);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(TermName::Summer.display_name(), "Summer");
        assert_eq!(TermName::Fall.to_string(), "fall");
    }

    #[test]
    fn test_term_id_serializes_as_integer() {
        let id = TermId::from_raw(1244);
        assert_eq!(serde_json::to_string(&id).unwrap(), "1244");
    }

    proptest! {
        #[test]
        fn prop_encode_decode_round_trip(year in -5000i32..5000, idx in 0usize..3) {
            let term = TermName::ORDERED[idx];
            let id = TermId::encode(year, term).unwrap();
            prop_assert_eq!(id.year(), year);
            prop_assert_eq!(id.term_name(), term);
        }

        #[test]
        fn prop_decode_term_name_is_total(id in any::<i64>()) {
            let name = decode_term_name(id);
            prop_assert!(["spring", "summer", "fall", "unknown"].contains(&name));
        }
    }
}
