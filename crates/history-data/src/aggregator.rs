//! Per-term enrollment aggregation.

use history_core::classifier::SectionClassifier;
use history_core::error::{HistoryError, Result};
use history_core::models::TermDataPoint;
use history_core::offering::OfferingRecord;
use history_core::term::TermId;

// ── TermTotals ────────────────────────────────────────────────────────────────

/// Enrolled and capacity totals accumulated across lecture sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TermTotals {
    pub total_enrolled: u32,
    pub total_capacity: u32,
    /// Number of sections (or terms, for cross-term totals) that contributed.
    pub count: u32,
}

impl TermTotals {
    /// Add a single section's counts to the running totals.
    pub fn add_offering(&mut self, offering: &OfferingRecord) {
        self.total_enrolled = self.total_enrolled.saturating_add(offering.enrolled_count());
        self.total_capacity = self.total_capacity.saturating_add(offering.capacity_count());
        self.count += 1;
    }

    /// Load percentage rounded half-up to one decimal, or `None` without
    /// capacity.
    pub fn load_percent(&self) -> Option<f64> {
        if self.total_capacity == 0 {
            return None;
        }
        let raw = f64::from(self.total_enrolled) * 100.0 / f64::from(self.total_capacity);
        Some(round_to(raw, 1))
    }
}

/// Round a non-negative value half-up to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor + 0.5).floor() / factor
}

// ── TermAggregator ────────────────────────────────────────────────────────────

/// Stateless helper that reduces one term's sections to a [`TermDataPoint`].
pub struct TermAggregator;

impl TermAggregator {
    /// Sum the countable sections of `offerings`.
    ///
    /// Tutorial and lab sections are ignored here so callers cannot feed
    /// them into the totals by accident.
    pub fn totals(offerings: &[OfferingRecord]) -> TermTotals {
        let mut totals = TermTotals::default();
        for offering in SectionClassifier::countable(offerings) {
            totals.add_offering(offering);
        }
        totals
    }

    /// Build the data point for `term`.
    ///
    /// Returns [`HistoryError::NoCountableData`] when the countable capacity
    /// is zero, even if students are enrolled.
    pub fn aggregate(term: TermId, offerings: &[OfferingRecord]) -> Result<TermDataPoint> {
        let totals = Self::totals(offerings);
        let load_percent = totals
            .load_percent()
            .ok_or(HistoryError::NoCountableData(term))?;

        Ok(TermDataPoint {
            semester_code: term,
            term: term.term_name().display_name().to_string(),
            year: term.year(),
            total_enrolled: totals.total_enrolled,
            total_capacity: totals.total_capacity,
            load_percent,
        })
    }

    /// Sum totals across already aggregated points.
    pub fn calculate_totals(points: &[TermDataPoint]) -> TermTotals {
        let mut totals = TermTotals::default();
        for point in points {
            totals.total_enrolled = totals.total_enrolled.saturating_add(point.total_enrolled);
            totals.total_capacity = totals.total_capacity.saturating_add(point.total_capacity);
            totals.count += 1;
        }
        totals
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
