//! JSON payloads printed by the binary.

use history_core::models::TermDataPoint;
use history_core::range::HistoryRange;
use history_data::aggregator::TermAggregator;
use history_data::browse::{BrowseResult, SectionSummary};
use serde::Serialize;

/// Output of a history run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryReport {
    pub dept: String,
    pub course_number: String,
    pub range: HistoryRange,
    pub generated_at: String,
    pub totals: ReportTotals,
    pub points: Vec<TermDataPoint>,
}

/// Totals across every reported term.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub terms: u32,
    pub total_enrolled: u32,
    pub total_capacity: u32,
    pub load_percent: Option<f64>,
}

impl HistoryReport {
    pub fn new(dept: &str, course_number: &str, range: HistoryRange, points: Vec<TermDataPoint>) -> Self {
        let totals = TermAggregator::calculate_totals(&points);
        Self {
            dept: dept.to_uppercase(),
            course_number: course_number.to_string(),
            range,
            generated_at: chrono::Utc::now().to_rfc3339(),
            totals: ReportTotals {
                terms: totals.count,
                total_enrolled: totals.total_enrolled,
                total_capacity: totals.total_capacity,
                load_percent: totals.load_percent(),
            },
            points,
        }
    }
}

/// Output of a `--sections` run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionsReport<'a> {
    pub dept: &'a str,
    pub course_number: &'a str,
    pub year: i32,
    pub term: &'a str,
    pub semester_code: i64,
    pub title: Option<&'a str>,
    pub skipped_rows: usize,
    pub sections: Vec<SectionSummary<'a>>,
}

impl<'a> SectionsReport<'a> {
    pub fn new(browse: &'a BrowseResult) -> Self {
        Self {
            dept: &browse.dept,
            course_number: &browse.course_number,
            year: browse.year,
            term: browse.term.display_name(),
            semester_code: browse.semester_code.value(),
            title: browse.title.as_deref(),
            skipped_rows: browse.skipped_rows,
            sections: browse.sections(),
        }
    }
}

/// Serialize `value` as compact or pretty JSON.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
