//! Data transfer objects for web requests and responses.
//!
//! Times are RFC 3339 in Italian local time; dates are `YYYY-MM-DD`.

use serde::{Deserialize, Serialize};

use crate::domain::{
    NumberChange, RailTime, StationRecord, StationRef, Stats, Stop, StopKind, TrainInfo,
    TrainProgress,
};
use crate::presentation::{RowPresentation, StyledText};
use crate::stations::StationMatch;
use crate::timetable::TimetableRow;

/// `?limit=` on station search.
#[derive(Debug, Deserialize)]
pub struct StationSearchQuery {
    pub limit: Option<usize>,
}

/// `?kind=&search_datetime=&limit=` on boards.
#[derive(Debug, Deserialize)]
pub struct BoardQuery {
    /// `departures` or `arrivals`; only read by the combined board route
    pub kind: Option<String>,
    /// `YYYY-MM-DDTHH:MM[:SS]` in Italian local time; defaults to now
    pub search_datetime: Option<String>,
    pub limit: Option<usize>,
}

/// `?origin_station_id=&train_number=&departure_date=` on train progress.
#[derive(Debug, Deserialize)]
pub struct TrainProgressQuery {
    pub origin_station_id: String,
    pub train_number: u32,
    /// `YYYY-MM-DD`
    pub departure_date: String,
}

#[derive(Debug, Serialize)]
pub struct StationResult {
    pub station_id: String,
    pub name: String,
}

impl StationResult {
    pub fn from_ref(station: &StationRef) -> Self {
        Self {
            station_id: station.enee_code.to_prefixed_id(),
            name: station.name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StationMatchResult {
    pub station_id: String,
    pub long_name: String,
    pub short_name: String,
    pub score: f64,
}

impl StationMatchResult {
    pub fn from_match(m: &StationMatch) -> Self {
        let StationRecord {
            enee_code,
            long_name,
            short_name,
        } = &m.record;
        Self {
            station_id: enee_code.to_prefixed_id(),
            long_name: long_name.clone(),
            short_name: short_name.clone(),
            score: m.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub stations: Vec<StationMatchResult>,
}

/// A text and its style name, e.g. `{"text": "+5", "style": "warning"}`.
#[derive(Debug, Serialize, PartialEq)]
pub struct StyledTextResult {
    pub text: String,
    pub style: &'static str,
}

impl StyledTextResult {
    pub fn from_styled(styled: &StyledText) -> Self {
        Self {
            text: styled.text.clone(),
            style: styled.style.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PresentationResult {
    pub delay: StyledTextResult,
    pub track: StyledTextResult,
    pub row_style: &'static str,
    pub is_approximate: bool,
}

impl PresentationResult {
    pub fn from_presentation(p: &RowPresentation) -> Self {
        Self {
            delay: StyledTextResult::from_styled(&p.delay_text),
            track: StyledTextResult::from_styled(&p.track_text),
            row_style: p.row_style.as_str(),
            is_approximate: p.is_approximate,
        }
    }
}

/// One row of a station board.
#[derive(Debug, Serialize)]
pub struct BoardRowResult {
    pub train_number: u32,
    pub origin_station_id: String,
    pub departure_date: String,
    pub identity: String,
    /// Destination on departures, origin on arrivals
    pub endpoint: String,
    pub scheduled_time: String,
    pub warning: Option<String>,
    pub presentation: PresentationResult,
}

impl BoardRowResult {
    pub fn from_row(row: &TimetableRow) -> Self {
        Self {
            train_number: row.key.number,
            origin_station_id: row.key.origin.to_prefixed_id(),
            departure_date: row.key.departure_date.to_string(),
            identity: row.identity.clone(),
            endpoint: row.endpoint_name.clone(),
            scheduled_time: row.scheduled_time.to_rfc3339(),
            warning: row.warning.clone(),
            presentation: PresentationResult::from_presentation(&row.presentation),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub station: StationResult,
    pub kind: &'static str,
    pub rows: Vec<BoardRowResult>,
}

#[derive(Debug, Serialize)]
pub struct TrainInfoResult {
    pub train_number: u32,
    pub origin: StationResult,
    pub departure_date: String,
}

impl TrainInfoResult {
    pub fn from_info(info: &TrainInfo) -> Self {
        Self {
            train_number: info.number,
            origin: StationResult::from_ref(&info.origin),
            departure_date: info.departure_date.to_string(),
        }
    }
}

fn time(t: Option<RailTime>) -> Option<String> {
    t.map(|t| t.to_rfc3339())
}

fn stop_kind(kind: StopKind) -> &'static str {
    match kind {
        StopKind::Departure => "departure",
        StopKind::Intermediate => "intermediate",
        StopKind::Arrival => "arrival",
    }
}

#[derive(Debug, Serialize)]
pub struct StopResult {
    pub station: StationResult,
    pub kind: &'static str,
    pub scheduled_arrival: Option<String>,
    pub actual_arrival: Option<String>,
    pub scheduled_departure: Option<String>,
    pub actual_departure: Option<String>,
    pub scheduled_arrival_track: Option<String>,
    pub actual_arrival_track: Option<String>,
    pub scheduled_departure_track: Option<String>,
    pub actual_departure_track: Option<String>,
}

impl StopResult {
    pub fn from_stop(stop: &Stop) -> Self {
        Self {
            station: StationResult::from_ref(&stop.station),
            kind: stop_kind(stop.kind),
            scheduled_arrival: time(stop.scheduled_arrival),
            actual_arrival: time(stop.actual_arrival),
            scheduled_departure: time(stop.scheduled_departure),
            actual_departure: time(stop.actual_departure),
            scheduled_arrival_track: stop.scheduled_arrival_track.clone(),
            actual_arrival_track: stop.actual_arrival_track.clone(),
            scheduled_departure_track: stop.scheduled_departure_track.clone(),
            actual_departure_track: stop.actual_departure_track.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NumberChangeResult {
    pub new_number: u32,
    pub station: String,
}

impl NumberChangeResult {
    pub fn from_change(change: &NumberChange) -> Self {
        Self {
            new_number: change.new_number,
            station: change.at_station.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrainProgressResponse {
    pub train_number: u32,
    pub identity: String,
    pub category: Option<String>,
    pub origin: StationResult,
    pub destination: StationResult,
    pub departure_date: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub delay_minutes: i32,
    pub departed_from_origin: bool,
    pub last_update_station: Option<String>,
    pub last_update_time: Option<String>,
    pub warning: Option<String>,
    pub delay_reason: Option<String>,
    pub completion: f64,
    pub number_changes: Vec<NumberChangeResult>,
    pub stops: Vec<StopResult>,
}

impl TrainProgressResponse {
    pub fn from_progress(p: &TrainProgress) -> Self {
        Self {
            train_number: p.number,
            identity: p.display_identity(),
            category: p.category.clone(),
            origin: StationResult::from_ref(&p.origin),
            destination: StationResult::from_ref(&p.destination),
            departure_date: p.departure_date.to_string(),
            departure_time: p.departure_time.to_rfc3339(),
            arrival_time: p.arrival_time.to_rfc3339(),
            delay_minutes: p.delay_minutes,
            departed_from_origin: p.departed_from_origin,
            last_update_station: p.last_update_station.clone(),
            last_update_time: time(p.last_update_time),
            warning: p.warning.clone(),
            delay_reason: p.delay_reason.clone(),
            completion: p.completion_ratio(),
            number_changes: p
                .number_changes
                .iter()
                .map(NumberChangeResult::from_change)
                .collect(),
            stops: p.stops.iter().map(StopResult::from_stop).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub trains_since_midnight: u64,
    pub trains_running: u64,
    pub last_update: Option<String>,
}

impl StatsResponse {
    pub fn from_stats(stats: &Stats) -> Self {
        Self {
            trains_since_midnight: stats.trains_since_midnight,
            trains_running: stats.trains_running,
            last_update: time(stats.last_update),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
