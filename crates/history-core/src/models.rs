use serde::{Deserialize, Serialize};

use crate::term::TermId;

/// Aggregated enrollment for one term.
///
/// Only produced for terms whose countable capacity is non-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermDataPoint {
    /// Encoded term identifier.
    pub semester_code: TermId,
    /// Capitalized term name, e.g. `"Fall"`.
    pub term: String,
    pub year: i32,
    /// Enrolled students across lecture sections, waitlists included.
    pub total_enrolled: u32,
    pub total_capacity: u32,
    /// `total_enrolled / total_capacity * 100`, one decimal place.
    pub load_percent: f64,
}

impl TermDataPoint {
    /// Key that sorts points from newest to oldest.
    pub fn reverse_chronological_key(&self) -> std::cmp::Reverse<TermId> {
        std::cmp::Reverse(self.semester_code)
    }
}
