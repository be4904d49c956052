//! Error types for series configuration.

use thiserror::Error;

/// Result type for series operations.
pub type SeriesResult<T> = Result<T, SeriesError>;

/// Errors raised while building extraction configuration.
///
/// Extraction itself never fails: malformed sheets produce empty results.
#[derive(Debug, Error)]
pub enum SeriesError {
    /// A correction whose target is itself corrected elsewhere.
    #[error("Correction '{alias}' -> '{canonical}' would chain through another correction")]
    ChainedCorrection { alias: String, canonical: String },

    /// A year range whose first year lies after its last.
    #[error("Invalid year range: {first} to {last}")]
    InvalidYearRange { first: i32, last: i32 },
}
