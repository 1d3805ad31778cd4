use std::path::PathBuf;
use thiserror::Error;

use crate::term::TermId;

/// All errors produced by the enrollment history pipeline.
///
/// Only [`HistoryError::NoStartingTerm`] is expected to reach callers of the
/// history walk; row- and term-level variants are produced as values by the
/// individual stages and absorbed by the walker.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// A term name outside `spring` / `summer` / `fall` was passed to the codec.
    #[error("Invalid term name: {0}")]
    InvalidTermName(String),

    /// One upstream row did not match the expected cell layout.
    #[error("Malformed row: {reason}")]
    MalformedRow { reason: String },

    /// A term had no countable capacity once lecture sections were summed.
    #[error("No countable data for term {0}")]
    NoCountableData(TermId),

    /// The upstream service could not produce rows for a term.
    #[error("Upstream unavailable for term {term}: {reason}")]
    UpstreamUnavailable { term: TermId, reason: String },

    /// Neither an enrolling nor a current term is known.
    #[error("No term data: cannot determine a starting year")]
    NoStartingTerm,

    /// A reference-data file could not be read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HistoryError {
    /// Shorthand for a [`HistoryError::MalformedRow`].
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`HistoryError::UpstreamUnavailable`].
    pub fn upstream(term: TermId, reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            term,
            reason: reason.into(),
        }
    }

    /// Whether the error is recovered locally by dropping a row or a term.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedRow { .. } | Self::NoCountableData(_) | Self::UpstreamUnavailable { .. }
        )
    }
}

/// Convenience alias used throughout the history crates.
pub type Result<T> = std::result::Result<T, HistoryError>;
