//! Real-time progress of one train journey.

use std::fmt;

use chrono::NaiveDate;

use super::{DomainError, EneeCode, RailTime, StationRef, Stop, StopKind};

/// Natural key of a train journey.
///
/// Two snapshots with equal keys describe the same journey at different
/// moments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrainKey {
    pub number: u32,
    pub origin: EneeCode,
    pub departure_date: NaiveDate,
}

impl fmt::Display for TrainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.number, self.origin, self.departure_date)
    }
}

/// A renumbering of the train at an intermediate station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberChange {
    pub new_number: u32,
    pub at_station: String,
}

/// Snapshot of a train's real-time state at fetch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainProgress {
    pub number: u32,
    pub origin: StationRef,
    pub destination: StationRef,
    pub departure_date: NaiveDate,
    pub category: Option<String>,
    pub number_changes: Vec<NumberChange>,
    pub departure_time: RailTime,
    pub arrival_time: RailTime,
    /// Delay in minutes as reported upstream.
    ///
    /// Before the train leaves its origin this is the departure delay.
    /// Afterwards it is the delay at the most recently reported stop,
    /// arrival or departure. Upstream gives no way to tell which.
    pub delay_minutes: i32,
    pub departed_from_origin: bool,
    pub last_update_station: Option<String>,
    pub last_update_time: Option<RailTime>,
    pub warning: Option<String>,
    pub delay_reason: Option<String>,
    /// Stops in journey order, origin first.
    pub stops: Vec<Stop>,
}

impl TrainProgress {
    pub fn key(&self) -> TrainKey {
        TrainKey {
            number: self.number,
            origin: self.origin.enee_code,
            departure_date: self.departure_date,
        }
    }

    /// Original number followed by every later number, e.g. `9999/10001`.
    pub fn display_numbers(&self) -> String {
        let mut numbers = self.number.to_string();
        for change in &self.number_changes {
            numbers.push('/');
            numbers.push_str(&change.new_number.to_string());
        }
        numbers
    }

    /// Category and numbers, e.g. `FR 9999/10001`, or just the numbers.
    pub fn display_identity(&self) -> String {
        match &self.category {
            Some(category) => format!("{} {}", category, self.display_numbers()),
            None => self.display_numbers(),
        }
    }

    /// The logical origin: the departure-kind stop, else the first stop.
    pub fn origin_stop(&self) -> Option<&Stop> {
        self.stops
            .iter()
            .find(|s| s.kind == StopKind::Departure)
            .or_else(|| self.stops.first())
    }

    /// The logical destination: the arrival-kind stop, else the last stop.
    pub fn destination_stop(&self) -> Option<&Stop> {
        self.stops
            .iter()
            .rev()
            .find(|s| s.kind == StopKind::Arrival)
            .or_else(|| self.stops.last())
    }

    /// Find the stop at `station`.
    pub fn stop_at(&self, station: EneeCode) -> Result<&Stop, DomainError> {
        self.stops
            .iter()
            .find(|s| s.station.enee_code == station)
            .ok_or_else(|| DomainError::ReferenceStationNotFound {
                station,
                train: self.key(),
            })
    }

    pub fn origin_actually_departed(&self) -> bool {
        self.origin_stop().is_some_and(Stop::departed)
    }

    pub fn destination_actually_arrived(&self) -> bool {
        self.destination_stop().is_some_and(Stop::arrived)
    }

    /// Fraction of the scheduled journey time covered up to the latest
    /// actual arrival, clamped to `0.0..=1.0`.
    pub fn completion_ratio(&self) -> f64 {
        let total = self.arrival_time.signed_duration_since(self.departure_time);
        if total.num_seconds() <= 0 {
            return 0.0;
        }

        let reached = self
            .stops
            .iter()
            .rev()
            .find_map(|s| s.actual_arrival)
            .unwrap_or(self.departure_time);
        let elapsed = reached.signed_duration_since(self.departure_time);

        (elapsed.num_seconds() as f64 / total.num_seconds() as f64).clamp(0.0, 1.0)
    }
}

/// One result of a train-number search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainInfo {
    pub number: u32,
    pub origin: StationRef,
    pub departure_date: NaiveDate,
}

impl TrainInfo {
    pub fn key(&self) -> TrainKey {
        TrainKey {
            number: self.number,
            origin: self.origin.enee_code,
            departure_date: self.departure_date,
        }
    }
}

impl fmt::Display for TrainInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} from {} ({})",
            self.number,
            self.origin.name,
            self.departure_date.format("%d/%m/%Y")
        )
    }
}
