//! Parsed sections of one course in one term.

use history_core::classifier::SectionClassifier;
use history_core::offering::OfferingRecord;
use history_core::term::{TermId, TermName};
use serde::{Deserialize, Serialize};

use crate::parser::parse_rows;

/// Everything the upstream reported for a course in a single term.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResult {
    pub year: i32,
    pub term: TermName,
    pub semester_code: TermId,
    /// Uppercased department code.
    pub dept: String,
    pub course_number: String,
    pub title: Option<String>,
    pub offerings: Vec<OfferingRecord>,
    /// Rows dropped as malformed.
    pub skipped_rows: usize,
}

/// One section as shown in the per-term listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary<'a> {
    pub section: &'a str,
    pub instructor: &'a str,
    pub campus: &'a str,
    pub info_url: &'a str,
    pub enrolled: u32,
    pub capacity: u32,
    pub load_percent: u32,
    pub countable: bool,
}

impl BrowseResult {
    /// Build a result from raw upstream rows.
    pub fn from_rows(dept: &str, course_number: &str, term: TermId, rows: &[Vec<String>]) -> Self {
        let parsed = parse_rows(rows);
        Self {
            offerings: parsed.offerings,
            title: parsed.title,
            skipped_rows: parsed.skipped,
            ..Self::empty(dept, course_number, term)
        }
    }

    /// A result with no sections, used when the upstream returned nothing.
    pub fn empty(dept: &str, course_number: &str, term: TermId) -> Self {
        Self {
            year: term.year(),
            term: term.term_name(),
            semester_code: term,
            dept: dept.to_uppercase(),
            course_number: course_number.to_string(),
            title: None,
            offerings: Vec::new(),
            skipped_rows: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.offerings.is_empty()
    }

    /// Per-section counts for display.
    pub fn sections(&self) -> Vec<SectionSummary<'_>> {
        self.offerings
            .iter()
            .map(|o| SectionSummary {
                section: &o.section,
                instructor: &o.instructor,
                campus: &o.campus,
                info_url: &o.info_url,
                enrolled: o.enrolled_count(),
                capacity: o.capacity_count(),
                load_percent: o.load_percent(),
                countable: SectionClassifier::is_countable(o),
            })
            .collect()
    }
}
