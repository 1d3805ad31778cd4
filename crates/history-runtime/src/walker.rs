//! Multi-year enrollment history.
//!
//! [`HistoryWalker`] fans the per-term fetch → parse → aggregate pipeline
//! out over a window of terms, bounded by a semaphore, and assembles the
//! surviving data points oldest-first.

use std::sync::Arc;
use std::time::Duration;

use history_core::error::{HistoryError, Result};
use history_core::models::TermDataPoint;
use history_core::range::HistoryRange;
use history_core::term::{TermId, TermName};
use history_data::aggregator::TermAggregator;
use history_data::browse::BrowseResult;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::fetcher::UpstreamFetcher;
use crate::terms::{resolve_starting_year, TermSource};

// ── HistoryWalker ─────────────────────────────────────────────────────────────

/// Drives the per-term pipeline across a window of years.
pub struct HistoryWalker {
    fetcher: Arc<dyn UpstreamFetcher>,
    /// Maximum number of upstream requests in flight.
    concurrency: usize,
    /// Per-term deadline; an expired term is dropped like a failed fetch.
    term_timeout: Option<Duration>,
}

impl HistoryWalker {
    /// Create a walker issuing at most `concurrency` fetches at once
    /// (at least one).
    pub fn new(fetcher: Arc<dyn UpstreamFetcher>, concurrency: usize) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
            term_timeout: None,
        }
    }

    pub fn with_term_timeout(mut self, timeout: Duration) -> Self {
        self.term_timeout = Some(timeout);
        self
    }

    /// Terms visited for a walk: newest year first, spring → summer → fall
    /// within each year.
    pub fn plan(starting_year: i32, range: HistoryRange) -> Vec<TermId> {
        (0..range.years() as i32)
            .map(|offset| starting_year.saturating_sub(offset))
            .flat_map(|year| {
                TermName::ORDERED
                    .into_iter()
                    .filter_map(move |term| TermId::encode(year, term).ok())
            })
            .collect()
    }

    /// Resolve the starting year from `source` and walk the history.
    ///
    /// `range` is decoded leniently. The only error is
    /// [`HistoryError::NoStartingTerm`]; every per-term failure just shortens
    /// the series.
    pub async fn get_enrollment_history(
        &self,
        source: &dyn TermSource,
        dept: &str,
        course_number: &str,
        range: &str,
    ) -> Result<Vec<TermDataPoint>> {
        let range = HistoryRange::parse_lenient(range);
        let starting_year = resolve_starting_year(source).await?;
        Ok(self.walk(dept, course_number, starting_year, range).await)
    }

    /// Walk the window ending at `starting_year`, returning the terms that
    /// produced data, oldest first.
    pub async fn walk(
        &self,
        dept: &str,
        course_number: &str,
        starting_year: i32,
        range: HistoryRange,
    ) -> Vec<TermDataPoint> {
        let plan = Self::plan(starting_year, range);
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks: JoinSet<(usize, Result<TermDataPoint>)> = JoinSet::new();

        // Permits are taken here, in plan order, so fetches start in visit order.
        for (index, term) in plan.iter().copied().enumerate() {
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };
            let fetcher = Arc::clone(&self.fetcher);
            let dept = dept.to_string();
            let course_number = course_number.to_string();
            let timeout = self.term_timeout;

            tasks.spawn(async move {
                let result = term_data_point(fetcher, &dept, &course_number, term, timeout).await;
                drop(permit);
                (index, result)
            });
        }

        let mut slots: Vec<Option<TermDataPoint>> = vec![None; plan.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(point))) => slots[index] = Some(point),
                Ok((index, Err(e))) => log_dropped_term(plan[index], &e),
                Err(e) => tracing::warn!(error = %e, "term task failed"),
            }
        }

        let mut points: Vec<TermDataPoint> = slots.into_iter().flatten().collect();
        // Newest first, then one reversal for chronological order.
        points.sort_by_key(TermDataPoint::reverse_chronological_key);
        points.reverse();

        tracing::info!(
            "Enrollment history for {} {}: {} of {} terms with data",
            dept.to_uppercase(),
            course_number,
            points.len(),
            plan.len()
        );

        points
    }

    /// Parsed sections for a single term. Failures yield an empty result.
    pub async fn fetch_term(&self, dept: &str, course_number: &str, term: TermId) -> BrowseResult {
        match fetch_rows(self.fetcher.as_ref(), dept, course_number, term, self.term_timeout).await {
            Ok(rows) => BrowseResult::from_rows(dept, course_number, term, &rows),
            Err(e) => {
                tracing::warn!(term = %term, error = %e, "no sections for term");
                BrowseResult::empty(dept, course_number, term)
            }
        }
    }
}

// ── Per-term pipeline ─────────────────────────────────────────────────────────

async fn fetch_rows(
    fetcher: &dyn UpstreamFetcher,
    dept: &str,
    course_number: &str,
    term: TermId,
    timeout: Option<Duration>,
) -> Result<Vec<Vec<String>>> {
    let fetch = fetcher.fetch(dept, course_number, term);
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fetch)
            .await
            .map_err(|_| HistoryError::upstream(term, format!("timed out after {limit:?}")))?,
        None => fetch.await,
    }
}

/// Fetch, parse and aggregate one term.
async fn term_data_point(
    fetcher: Arc<dyn UpstreamFetcher>,
    dept: &str,
    course_number: &str,
    term: TermId,
    timeout: Option<Duration>,
) -> Result<TermDataPoint> {
    let rows = fetch_rows(fetcher.as_ref(), dept, course_number, term, timeout).await?;
    if rows.is_empty() {
        return Err(HistoryError::upstream(term, "empty response"));
    }

    let browse = BrowseResult::from_rows(dept, course_number, term, &rows);
    TermAggregator::aggregate(term, &browse.offerings)
}

fn log_dropped_term(term: TermId, error: &HistoryError) {
    match error {
        HistoryError::NoCountableData(_) => {
            tracing::debug!(term = %term, "no countable sections; term omitted")
        }
        e if e.is_recoverable() => tracing::warn!(term = %term, error = %e, "term omitted"),
        e => tracing::error!(term = %term, error = %e, "unexpected error; term omitted"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
