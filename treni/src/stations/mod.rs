//! The national station list.
//!
//! Built from upstream's prefix search, kept on disk as CSV and searched
//! by fuzzy name match.

mod cache;
mod dump;
mod error;
mod index;

pub use cache::{DEFAULT_STATIONS_FILE, StationCache, StationCacheConfig, read_csv, write_csv};
pub use dump::{dump_stations, load_or_dump, merge_station_lists};
pub use error::StationError;
pub use index::{StationIndex, StationMatch, token_set_ratio};
