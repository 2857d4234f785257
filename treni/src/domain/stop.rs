//! Stops along a train's journey.

use super::{RailTime, StationRef};

/// Role of a stop in the journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopKind {
    /// The journey's origin. Only departure fields are meaningful.
    Departure,
    Intermediate,
    /// The journey's destination. Only arrival fields are meaningful.
    Arrival,
}

/// Which half of a stop a caller is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Arrival,
    Departure,
}

/// One scheduled and actual stop of a train.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub station: StationRef,
    pub kind: StopKind,
    pub scheduled_arrival: Option<RailTime>,
    pub actual_arrival: Option<RailTime>,
    pub scheduled_departure: Option<RailTime>,
    pub actual_departure: Option<RailTime>,
    pub scheduled_arrival_track: Option<String>,
    pub actual_arrival_track: Option<String>,
    pub scheduled_departure_track: Option<String>,
    pub actual_departure_track: Option<String>,
}

impl Stop {
    /// A stop with no times or tracks filled in.
    pub fn new(station: StationRef, kind: StopKind) -> Self {
        Self {
            station,
            kind,
            scheduled_arrival: None,
            actual_arrival: None,
            scheduled_departure: None,
            actual_departure: None,
            scheduled_arrival_track: None,
            actual_arrival_track: None,
            scheduled_departure_track: None,
            actual_departure_track: None,
        }
    }

    pub fn arrived(&self) -> bool {
        self.actual_arrival.is_some()
    }

    pub fn departed(&self) -> bool {
        self.actual_departure.is_some()
    }

    /// Scheduled and actual time for one side.
    pub fn times(&self, side: Side) -> (Option<RailTime>, Option<RailTime>) {
        match side {
            Side::Arrival => (self.scheduled_arrival, self.actual_arrival),
            Side::Departure => (self.scheduled_departure, self.actual_departure),
        }
    }

    /// Scheduled and actual track for one side.
    pub fn tracks(&self, side: Side) -> (Option<&str>, Option<&str>) {
        match side {
            Side::Arrival => (
                self.scheduled_arrival_track.as_deref(),
                self.actual_arrival_track.as_deref(),
            ),
            Side::Departure => (
                self.scheduled_departure_track.as_deref(),
                self.actual_departure_track.as_deref(),
            ),
        }
    }

    /// Whether this kind of stop carries data for `side`.
    pub fn has_side(&self, side: Side) -> bool {
        !matches!(
            (self.kind, side),
            (StopKind::Departure, Side::Arrival) | (StopKind::Arrival, Side::Departure)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EneeCode;

    fn make_stop(kind: StopKind) -> Stop {
        Stop::new(
            StationRef::new(EneeCode::new(1700).unwrap(), "MILANO CENTRALE"),
            kind,
        )
    }

    #[test]
    fn derived_flags() {
        let mut stop = make_stop(StopKind::Intermediate);
        assert!(!stop.arrived());
        assert!(!stop.departed());

        stop.actual_arrival = RailTime::from_epoch_ms(1_705_302_000_000);
        assert!(stop.arrived());
        assert!(!stop.departed());

        stop.actual_departure = RailTime::from_epoch_ms(1_705_302_120_000);
        assert!(stop.departed());
    }

    #[test]
    fn tracks_by_side() {
        let mut stop = make_stop(StopKind::Intermediate);
        stop.scheduled_arrival_track = Some("3".into());
        stop.actual_departure_track = Some("5".into());

        assert_eq!(stop.tracks(Side::Arrival), (Some("3"), None));
        assert_eq!(stop.tracks(Side::Departure), (None, Some("5")));
    }

    #[test]
    fn sides_by_kind() {
        let origin = make_stop(StopKind::Departure);
        assert!(origin.has_side(Side::Departure));
        assert!(!origin.has_side(Side::Arrival));

        let terminus = make_stop(StopKind::Arrival);
        assert!(terminus.has_side(Side::Arrival));
        assert!(!terminus.has_side(Side::Departure));

        let middle = make_stop(StopKind::Intermediate);
        assert!(middle.has_side(Side::Arrival) && middle.has_side(Side::Departure));
    }
}
