//! Runtime layer for the enrollment history pipeline.
//!
//! Talks to the upstream registration service, looks up the starting term,
//! and walks the per-term pipeline across a window of years.

pub mod fetcher;
pub mod terms;
pub mod walker;

pub use history_core as core;
pub use history_data as data;
