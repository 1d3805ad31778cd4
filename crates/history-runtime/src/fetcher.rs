//! Upstream access.
//!
//! [`UpstreamFetcher`] is the seam between the history walk and the
//! registration service. [`CourseSysClient`] talks to the real browse
//! endpoint; [`StaticFetcher`] serves canned rows.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use history_core::error::{HistoryError, Result};
use history_core::term::TermId;
use serde_json::Value;

/// Raw rows as returned by the upstream: one `Vec` of cell text per section.
pub type RawRows = Vec<Vec<String>>;

/// Source of raw tabular rows for one course in one term.
///
/// Every failure is reported as [`HistoryError::UpstreamUnavailable`].
#[async_trait]
pub trait UpstreamFetcher: Send + Sync {
    async fn fetch(&self, dept: &str, course_number: &str, term: TermId) -> Result<RawRows>;
}

// ── CourseSysClient ───────────────────────────────────────────────────────────

/// HTTP client for the browse endpoint.
///
/// Holds a single [`reqwest::Client`] so concurrent fetches share its
/// connection pool.
#[derive(Debug, Clone)]
pub struct CourseSysClient {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl CourseSysClient {
    /// Build a client for `base_url` with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = reqwest::Url::parse(base_url)
            .map_err(|e| HistoryError::Config(format!("invalid base url {base_url:?}: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("enrollment-history/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HistoryError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Browse URL for one course and term. The department is uppercased.
    pub fn browse_url(&self, dept: &str, course_number: &str, term: TermId) -> reqwest::Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("subject[]", &dept.to_uppercase())
            .append_pair("number[]", course_number)
            .append_pair("semester[]", &term.to_string())
            .append_pair("tabledata", "yes");
        url
    }
}

#[async_trait]
impl UpstreamFetcher for CourseSysClient {
    async fn fetch(&self, dept: &str, course_number: &str, term: TermId) -> Result<RawRows> {
        let url = self.browse_url(dept, course_number, term);
        tracing::debug!(%url, "fetching upstream rows");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HistoryError::upstream(term, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HistoryError::upstream(term, format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| HistoryError::upstream(term, format!("failed to read body: {e}")))?;

        rows_from_body(term, &body)
    }
}

/// Extract the `data` rows from a browse response body.
///
/// Non-string cells are rendered as text; `null` becomes an empty cell.
pub fn rows_from_body(term: TermId, body: &str) -> Result<RawRows> {
    if body.trim().is_empty() {
        return Err(HistoryError::upstream(term, "empty body"));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| HistoryError::upstream(term, format!("invalid JSON: {e}")))?;

    let Some(data) = value.get("data").and_then(Value::as_array) else {
        return Err(HistoryError::upstream(term, "response has no data array"));
    };

    Ok(data
        .iter()
        .map(|row| match row.as_array() {
            Some(cells) => cells.iter().map(cell_text).collect(),
            None => vec![cell_text(row)],
        })
        .collect())
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ── StaticFetcher ─────────────────────────────────────────────────────────────

/// In-memory fetcher serving fixed rows per term.
///
/// Terms without rows fail as unavailable. Every call is recorded so tests
/// can assert on the fetch order.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    rows: HashMap<TermId, RawRows>,
    delays: HashMap<TermId, Duration>,
    calls: Mutex<Vec<TermId>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `rows` for `term`.
    pub fn with_rows(mut self, term: TermId, rows: RawRows) -> Self {
        self.rows.insert(term, rows);
        self
    }

    /// Sleep for `delay` before answering for `term`.
    pub fn with_delay(mut self, term: TermId, delay: Duration) -> Self {
        self.delays.insert(term, delay);
        self
    }

    /// Terms requested so far, in call order.
    pub fn calls(&self) -> Vec<TermId> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl UpstreamFetcher for StaticFetcher {
    async fn fetch(&self, _dept: &str, _course_number: &str, term: TermId) -> Result<RawRows> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(term);
        }
        if let Some(delay) = self.delays.get(&term) {
            tokio::time::sleep(*delay).await;
        }
        self.rows
            .get(&term)
            .cloned()
            .ok_or_else(|| HistoryError::upstream(term, "no rows configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CourseSysClient {
        CourseSysClient::new("https://coursys.example.edu/browse/", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_browse_url_query() {
        let url = client().browse_url("cmpt", "276", TermId::from_raw(1247));
        assert_eq!(url.path(), "/browse/");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("subject[]".to_string(), "CMPT".to_string()),
                ("number[]".to_string(), "276".to_string()),
                ("semester[]".to_string(), "1247".to_string()),
                ("tabledata".to_string(), "yes".to_string()),
            ]
        );
        // Brackets are percent-encoded exactly once.
        assert!(url.as_str().contains("subject%5B%5D=CMPT"));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = CourseSysClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, HistoryError::Config(_)));
    }

    #[test]
    fn test_rows_from_body() {
        let body = r#"{"data": [["Fall 2024", "<a href=\"/x\">CMPT 276 D100</a>", "Intro", "96/100", "Chan", "Burnaby"]]}"#;
        let rows = rows_from_body(TermId::from_raw(1247), body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 6);
        assert_eq!(rows[0][3], "96/100");
    }

    #[test]
    fn test_rows_from_body_renders_non_string_cells() {
        let body = r#"{"data": [[1247, null, true]]}"#;
        let rows = rows_from_body(TermId::from_raw(1247), body).unwrap();
        assert_eq!(rows[0], vec!["1247", "", "true"]);
    }

    #[test]
    fn test_rows_from_body_failures() {
        let term = TermId::from_raw(1247);
        for body in ["", "   ", "<html>", r#"{"rows": []}"#, r#"{"data": "nope"}"#] {
            let err = rows_from_body(term, body).unwrap_err();
            assert!(
                matches!(err, HistoryError::UpstreamUnavailable { term: t, .. } if t == term),
                "body {body:?} should be unavailable"
            );
        }
    }

    #[test]
    fn test_rows_from_body_empty_data() {
        let rows = rows_from_body(TermId::from_raw(1247), r#"{"data": []}"#).unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_static_fetcher_records_calls() {
        let term = TermId::from_raw(1241);
        let fetcher = StaticFetcher::new().with_rows(term, vec![vec!["x".to_string()]]);

        assert_eq!(fetcher.fetch("CMPT", "276", term).await.unwrap().len(), 1);
        assert!(fetcher
            .fetch("CMPT", "276", TermId::from_raw(1244))
            .await
            .is_err());
        assert_eq!(fetcher.calls(), vec![term, TermId::from_raw(1244)]);
    }
}
