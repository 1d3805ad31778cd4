//! Core types for the enrollment history pipeline.
//!
//! Term identifiers, section records and their derived counts, the lecture
//! section classifier, the per-term data point, the error taxonomy and the
//! command-line settings shared by the other crates.

pub mod classifier;
pub mod error;
pub mod models;
pub mod offering;
pub mod range;
pub mod settings;
pub mod term;

pub use error::{HistoryError, Result};
