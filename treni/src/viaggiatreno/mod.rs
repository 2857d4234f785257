//! ViaggiaTreno client.
//!
//! This module provides an HTTP client for the undocumented ViaggiaTreno
//! API, which serves real-time information about Italian trains.
//!
//! Key characteristics of the API:
//! - Times are epoch milliseconds, with `0` standing in for "unknown"
//! - Station ids come as `S01700`, `83001700` or `1700`
//! - "No data" is an empty body, not an error status

mod client;
mod convert;
mod error;
#[cfg(test)]
pub(crate) mod mock;
mod source;
mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_BOARD_LIMIT, ViaggiaTrenoClient, ViaggiaTrenoConfig};
pub use convert::{
    ConversionError, build_stops, convert_board, convert_board_entry, convert_station,
    convert_stats, convert_stop, convert_train_progress, convert_travel_solution,
    convert_travel_solutions, decode_category, decode_stop_kind,
    decode_text, decode_timestamp_ms, decode_train_progress, normalize_name, parse_train_search,
    parse_train_search_line,
};
pub use error::ViaggiaTrenoError;
pub use source::ProgressSource;
pub use types::{
    RawBoardEntry, RawNumber, RawNumberChange, RawResponse, RawSolution, RawSolutions,
    RawStation, RawStats, RawStop, RawTrainProgress, RawVehicle,
};
