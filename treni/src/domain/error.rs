//! Domain error types.
//!
//! These errors describe invalid identifiers and data-contract violations
//! found while building domain values. Transport failures live in
//! [`crate::viaggiatreno::ViaggiaTrenoError`].

use super::{EneeCode, TrainKey};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Station id is not a 5-digit ENEE code in any known spelling
    #[error("invalid station id: {0:?}")]
    InvalidStationId(String),

    /// Upstream stop-type code outside P/F/A
    #[error("unknown stop kind: {0:?}")]
    UnknownStopKind(String),

    /// A train with real-time data does not list the board's station
    #[error("station {station} not found in stops of train {train}")]
    ReferenceStationNotFound { station: EneeCode, train: TrainKey },
}
