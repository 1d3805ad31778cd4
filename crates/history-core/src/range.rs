use std::fmt;

use serde::{Deserialize, Serialize};

/// Window of years covered by a history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HistoryRange {
    #[serde(rename = "1yr")]
    OneYear,
    #[default]
    #[serde(rename = "3yr")]
    ThreeYears,
    #[serde(rename = "5yr")]
    FiveYears,
}

impl HistoryRange {
    /// Decode a free-form range token.
    ///
    /// Unrecognised tokens fall back to three years so the chart always has
    /// something to show.
    pub fn parse_lenient(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "1yr" => HistoryRange::OneYear,
            "3yr" => HistoryRange::ThreeYears,
            "5yr" => HistoryRange::FiveYears,
            other => {
                tracing::debug!(token = other, "unrecognised range token; using 3yr");
                HistoryRange::ThreeYears
            }
        }
    }

    pub fn years(&self) -> u32 {
        match self {
            HistoryRange::OneYear => 1,
            HistoryRange::ThreeYears => 3,
            HistoryRange::FiveYears => 5,
        }
    }
}

impl fmt::Display for HistoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}yr", self.years())
    }
}
