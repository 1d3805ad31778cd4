//! Data layer for the enrollment history pipeline.
//!
//! Turns raw upstream rows into typed section records, assembles them into
//! per-term browse results, and reduces them to per-term data points.

pub mod aggregator;
pub mod browse;
pub mod parser;

pub use history_core as core;
