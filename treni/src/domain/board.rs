//! Departure and arrival boards.

use chrono::NaiveDate;

use super::{EneeCode, RailTime, Side, TrainKey};

/// Which board of a station is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardKind {
    Departures,
    Arrivals,
}

impl BoardKind {
    /// The half of a stop that matters for this board.
    pub fn side(self) -> Side {
        match self {
            BoardKind::Departures => Side::Departure,
            BoardKind::Arrivals => Side::Arrival,
        }
    }

    pub fn is_departures(self) -> bool {
        self == BoardKind::Departures
    }
}

/// One row of a board as returned by the board query, before it is
/// enriched with the train's progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableEntry {
    pub kind: BoardKind,
    pub category: Option<String>,
    pub number: u32,
    pub origin: EneeCode,
    pub departure_date: NaiveDate,
    /// Destination on a departures board, origin on an arrivals board.
    pub endpoint_name: String,
    /// Scheduled departure or arrival at the board's station.
    pub scheduled_time: RailTime,
    pub scheduled_track: Option<String>,
    pub actual_track: Option<String>,
    pub delay_minutes: i32,
    pub departed_from_origin: bool,
    pub in_station: bool,
    pub warning: Option<String>,
}

impl TimetableEntry {
    pub fn key(&self) -> TrainKey {
        TrainKey {
            number: self.number,
            origin: self.origin,
            departure_date: self.departure_date,
        }
    }

    /// Category and number, e.g. `REG 2033`.
    pub fn display_identity(&self) -> String {
        match &self.category {
            Some(category) => format!("{} {}", category, self.number),
            None => self.number.to_string(),
        }
    }
}

/// Network-wide counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub trains_since_midnight: u64,
    pub trains_running: u64,
    pub last_update: Option<RailTime>,
}
