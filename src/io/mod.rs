//! File import and export.

/// CSV batch import of household inputs.
pub mod batch;
/// CSV export of estimation results.
pub mod export;
