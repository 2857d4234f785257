//! Domain types for real-time train information.
//!
//! Every type here is validated at construction, so code that receives
//! one can trust it. Nothing in this module knows about upstream field
//! names or JSON.

mod board;
mod error;
mod progress;
mod solution;
mod station;
mod stop;
mod time;

pub use board::{BoardKind, Stats, TimetableEntry};
pub use error::DomainError;
pub use progress::{NumberChange, TrainInfo, TrainKey, TrainProgress};
pub use solution::{Change, TravelSolution, TravelSolutions, Vehicle};
pub use station::{EneeCode, StationRecord, StationRef, format_prefixed_id, resolve_enee_code};
pub use stop::{Side, Stop, StopKind};
pub use time::{RailTime, board_query_time, midnight_epoch_ms, now_local};
