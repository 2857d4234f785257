//! Station list error types.

use crate::domain::DomainError;
use crate::viaggiatreno::ViaggiaTrenoError;

/// Errors that can occur while building, reading or writing the station list.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// Fetching a letter of the station list failed
    #[error("station list fetch failed: {0}")]
    Upstream(#[from] ViaggiaTrenoError),

    /// Reading or writing the CSV failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV row holds an unusable station id
    #[error("invalid station record: {0}")]
    Record(#[from] DomainError),

    /// Cache operation failed
    #[error("cache error: {message}")]
    Cache { message: String },
}
