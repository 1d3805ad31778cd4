//! Starting-term lookup.
//!
//! The history walk counts back from the year of the term currently open
//! for enrollment, or failing that the term in session.

use std::path::Path;

use async_trait::async_trait;
use history_core::error::{HistoryError, Result};
use history_core::term::TermName;
use serde::{Deserialize, Serialize};

/// Reference data that knows which term is enrolling or current.
#[async_trait]
pub trait TermSource: Send + Sync {
    /// Year of the term currently open for enrollment.
    async fn enrolling_year(&self) -> Option<i32>;
    /// Year of the term currently in session.
    async fn current_year(&self) -> Option<i32>;
}

/// Year to start the walk from: enrolling term first, then current term.
pub async fn resolve_starting_year(source: &dyn TermSource) -> Result<i32> {
    if let Some(year) = source.enrolling_year().await {
        return Ok(year);
    }
    match source.current_year().await {
        Some(year) => {
            tracing::debug!(year, "no enrolling term; using current term");
            Ok(year)
        }
        None => Err(HistoryError::NoStartingTerm),
    }
}

// ── TermCatalog ───────────────────────────────────────────────────────────────

/// One entry of the terms reference file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermRef {
    pub year: i32,
    pub term: TermName,
    #[serde(default)]
    pub is_enrolling: bool,
    #[serde(default)]
    pub is_current: bool,
}

/// Terms reference data loaded from a JSON array.
#[derive(Debug, Clone, Default)]
pub struct TermCatalog {
    terms: Vec<TermRef>,
}

impl TermCatalog {
    pub fn new(terms: Vec<TermRef>) -> Self {
        Self { terms }
    }

    /// Load a catalog file. A missing file yields an empty catalog.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Terms file not found: {}", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| HistoryError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let terms: Vec<TermRef> = serde_json::from_str(&content)?;
        Ok(Self { terms })
    }

    pub fn terms(&self) -> &[TermRef] {
        &self.terms
    }
}

#[async_trait]
impl TermSource for TermCatalog {
    async fn enrolling_year(&self) -> Option<i32> {
        self.terms.iter().find(|t| t.is_enrolling).map(|t| t.year)
    }

    async fn current_year(&self) -> Option<i32> {
        self.terms.iter().find(|t| t.is_current).map(|t| t.year)
    }
}

// ── FixedYear ─────────────────────────────────────────────────────────────────

/// A source that always answers with the given year.
#[derive(Debug, Clone, Copy)]
pub struct FixedYear(pub i32);

#[async_trait]
impl TermSource for FixedYear {
    async fn enrolling_year(&self) -> Option<i32> {
        Some(self.0)
    }

    async fn current_year(&self) -> Option<i32> {
        Some(self.0)
    }
}
