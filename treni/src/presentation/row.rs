//! Board rows and progress-view stops.

use tracing::warn;

use crate::domain::{
    BoardKind, DomainError, EneeCode, Side, StationRef, Stop, TimetableEntry, TrainProgress,
};

use super::rules::{delay_rule, row_style_rule, time_display, track_rule};
use super::style::{RowStyle, StyledText};

/// How one board row should look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPresentation {
    pub delay_text: StyledText,
    pub track_text: StyledText,
    pub row_style: RowStyle,
    /// Built from the board entry alone, without real-time data.
    ///
    /// Orthogonal to `row_style`: renderers mark these rows separately.
    pub is_approximate: bool,
}

/// Classify a row from the train's real-time progress.
///
/// Fails when the board's station is not among the train's stops.
pub fn classify(
    progress: &TrainProgress,
    reference: EneeCode,
    kind: BoardKind,
) -> Result<RowPresentation, DomainError> {
    let stop = progress.stop_at(reference)?;
    let origin_track_known = progress
        .origin_stop()
        .is_some_and(|s| s.actual_departure_track.is_some());

    let (scheduled_track, actual_track) = stop.tracks(kind.side());

    Ok(RowPresentation {
        delay_text: delay_rule(
            progress.delay_minutes,
            progress.departed_from_origin,
            origin_track_known,
        ),
        track_text: track_rule(actual_track, scheduled_track),
        row_style: row_style_rule(
            stop.arrived(),
            stop.departed(),
            progress.origin_actually_departed(),
            progress.destination_actually_arrived(),
        ),
        is_approximate: false,
    })
}

/// Classify a row from the board entry alone.
///
/// The origin's track only counts as known when the board is the
/// origin's own and the entry carries an actual track.
pub fn approximate(entry: &TimetableEntry, reference: EneeCode) -> RowPresentation {
    let origin_track_known = entry.origin == reference && entry.actual_track.is_some();

    RowPresentation {
        delay_text: delay_rule(
            entry.delay_minutes,
            entry.departed_from_origin,
            origin_track_known,
        ),
        track_text: track_rule(entry.actual_track.as_deref(), entry.scheduled_track.as_deref()),
        row_style: RowStyle::Plain,
        is_approximate: true,
    }
}

/// Presentation of one board row.
///
/// Without real-time data, or when the data disagrees with the board
/// about the station, the row falls back to approximate mode.
pub fn build_row_presentation(
    progress: Option<&TrainProgress>,
    entry: &TimetableEntry,
    reference: &StationRef,
    kind: BoardKind,
) -> RowPresentation {
    let Some(progress) = progress else {
        return approximate(entry, reference.enee_code);
    };

    match classify(progress, reference.enee_code, kind) {
        Ok(row) => row,
        Err(e) => {
            warn!(
                train = %progress.key(),
                station = %reference.enee_code,
                error = %e,
                "falling back to approximate row"
            );
            approximate(entry, reference.enee_code)
        }
    }
}

/// How one stop of the progress view should look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopPresentation {
    pub track_text: StyledText,
    pub row_style: RowStyle,
    /// Absent for the origin.
    pub arrival: Option<StyledText>,
    /// Absent for the destination.
    pub departure: Option<StyledText>,
}

/// Presentation of one stop in the stop-by-stop view.
///
/// The track shown is the departure track where there is one, else the
/// arrival track.
pub fn present_stop(progress: &TrainProgress, stop: &Stop) -> StopPresentation {
    let (scheduled_dep, actual_dep) = stop.tracks(Side::Departure);
    let (scheduled_arr, actual_arr) = stop.tracks(Side::Arrival);

    let side_text = |side: Side| {
        stop.has_side(side).then(|| {
            let (scheduled, actual) = stop.times(side);
            time_display(scheduled, actual, progress.delay_minutes)
        })
    };

    StopPresentation {
        track_text: track_rule(actual_dep.or(actual_arr), scheduled_dep.or(scheduled_arr)),
        row_style: row_style_rule(
            stop.arrived(),
            stop.departed(),
            progress.origin_actually_departed(),
            progress.destination_actually_arrived(),
        ),
        arrival: side_text(Side::Arrival),
        departure: side_text(Side::Departure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RailTime, StopKind};
    use crate::presentation::TextStyle;
    use chrono::NaiveDate;

    // 2024-01-15 08:00 CET
    const T0: i64 = 1_705_302_000_000;
    const MINUTE: i64 = 60_000;

    fn at(offset_min: i64) -> RailTime {
        RailTime::from_epoch_ms(T0 + offset_min * MINUTE).unwrap()
    }

    fn station(code: u32, name: &str) -> StationRef {
        StationRef::new(EneeCode::new(code).unwrap(), name)
    }

    fn milano() -> StationRef {
        station(1700, "MILANO CENTRALE")
    }

    fn bologna() -> StationRef {
        station(5997, "BOLOGNA C.LE")
    }

    fn make_stops() -> Vec<Stop> {
        let mut origin = Stop::new(milano(), StopKind::Departure);
        origin.scheduled_departure = Some(at(0));
        origin.scheduled_departure_track = Some("5".into());

        let mut middle = Stop::new(bologna(), StopKind::Intermediate);
        middle.scheduled_arrival = Some(at(60));
        middle.scheduled_departure = Some(at(62));
        middle.scheduled_arrival_track = Some("3".into());
        middle.scheduled_departure_track = Some("3".into());

        let mut terminus = Stop::new(station(8409, "ROMA TERMINI"), StopKind::Arrival);
        terminus.scheduled_arrival = Some(at(190));

        vec![origin, middle, terminus]
    }

    fn make_progress(stops: Vec<Stop>) -> TrainProgress {
        TrainProgress {
            number: 9999,
            origin: milano(),
            destination: station(8409, "ROMA TERMINI"),
            departure_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            category: None,
            number_changes: vec![],
            departure_time: at(0),
            arrival_time: at(190),
            delay_minutes: 0,
            departed_from_origin: false,
            last_update_station: None,
            last_update_time: None,
            warning: None,
            delay_reason: None,
            stops,
        }
    }

    fn make_entry(kind: BoardKind) -> TimetableEntry {
        TimetableEntry {
            kind,
            category: None,
            number: 9999,
            origin: milano().enee_code,
            departure_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            endpoint_name: "ROMA TERMINI".into(),
            scheduled_time: at(0),
            scheduled_track: Some("5".into()),
            actual_track: None,
            delay_minutes: 0,
            departed_from_origin: false,
            in_station: false,
            warning: None,
        }
    }

    #[test]
    fn departed_on_time_from_origin() {
        let mut stops = make_stops();
        stops[0].actual_departure_track = Some("5".into());
        let mut progress = make_progress(stops);
        progress.departed_from_origin = true;

        let row = build_row_presentation(
            Some(&progress),
            &make_entry(BoardKind::Departures),
            &milano(),
            BoardKind::Departures,
        );

        assert_eq!(row.delay_text, StyledText::plain("On time"));
        assert_eq!(row.track_text, StyledText::new("5", TextStyle::TrackUnchanged));
        assert_eq!(row.row_style, RowStyle::Plain);
        assert!(!row.is_approximate);
    }

    #[test]
    fn ready_at_origin_platform() {
        let mut stops = make_stops();
        stops[0].actual_departure_track = Some("7".into());
        let progress = make_progress(stops);

        let row = classify(&progress, milano().enee_code, BoardKind::Departures).unwrap();
        assert_eq!(row.delay_text, StyledText::plain("Ready"));
        assert_eq!(row.track_text, StyledText::new("7", TextStyle::TrackChanged));
    }

    #[test]
    fn standing_at_intermediate_stop_is_bold() {
        let mut stops = make_stops();
        stops[0].actual_departure = Some(at(1));
        stops[1].actual_arrival = Some(at(64));
        stops[1].actual_arrival_track = Some("3".into());
        let mut progress = make_progress(stops);
        progress.departed_from_origin = true;
        progress.delay_minutes = 4;

        let row = classify(&progress, bologna().enee_code, BoardKind::Arrivals).unwrap();
        assert_eq!(row.row_style, RowStyle::Bold);
        assert_eq!(row.delay_text, StyledText::new("+4", TextStyle::Warning));
        assert_eq!(row.track_text, StyledText::new("3", TextStyle::TrackUnchanged));
    }

    #[test]
    fn passed_stop_is_dimmed() {
        let mut stops = make_stops();
        stops[0].actual_departure = Some(at(0));
        stops[1].actual_arrival = Some(at(60));
        stops[1].actual_departure = Some(at(62));
        let mut progress = make_progress(stops);
        progress.departed_from_origin = true;

        let row = classify(&progress, bologna().enee_code, BoardKind::Departures).unwrap();
        assert_eq!(row.row_style, RowStyle::Dimmed);
    }

    #[test]
    fn board_side_picks_track() {
        let mut stops = make_stops();
        stops[1].scheduled_arrival_track = Some("2".into());
        stops[1].scheduled_departure_track = Some("4".into());
        let progress = make_progress(stops);

        let arr = classify(&progress, bologna().enee_code, BoardKind::Arrivals).unwrap();
        let dep = classify(&progress, bologna().enee_code, BoardKind::Departures).unwrap();
        assert_eq!(arr.track_text.text, "2");
        assert_eq!(dep.track_text.text, "4");
    }

    #[test]
    fn missing_reference_station_is_an_error() {
        let progress = make_progress(make_stops());
        let err = classify(&progress, EneeCode::new(219).unwrap(), BoardKind::Departures);
        assert!(matches!(
            err,
            Err(DomainError::ReferenceStationNotFound { .. })
        ));
    }

    #[test]
    fn missing_reference_station_falls_back() {
        let progress = make_progress(make_stops());
        let torino = station(219, "TORINO PORTA NUOVA");
        let row = build_row_presentation(
            Some(&progress),
            &make_entry(BoardKind::Departures),
            &torino,
            BoardKind::Departures,
        );
        assert!(row.is_approximate);
        assert_eq!(row.row_style, RowStyle::Plain);
    }

    #[test]
    fn no_progress_is_approximate() {
        let mut entry = make_entry(BoardKind::Departures);
        entry.departed_from_origin = true;
        entry.delay_minutes = 12;
        entry.actual_track = Some("6".into());

        let row = build_row_presentation(None, &entry, &bologna(), BoardKind::Departures);
        assert!(row.is_approximate);
        assert_eq!(row.row_style, RowStyle::Plain);
        assert_eq!(row.delay_text, StyledText::new("+12", TextStyle::Warning));
        assert_eq!(row.track_text, StyledText::new("6", TextStyle::TrackChanged));
    }

    #[test]
    fn approximate_ready_only_at_origin() {
        let mut entry = make_entry(BoardKind::Departures);
        entry.actual_track = Some("5".into());

        let at_origin = approximate(&entry, milano().enee_code);
        assert_eq!(at_origin.delay_text, StyledText::plain("Ready"));

        let elsewhere = approximate(&entry, bologna().enee_code);
        assert_eq!(elsewhere.delay_text, StyledText::plain("Not departed"));
    }

    #[test]
    fn stop_presentation_sides() {
        let mut stops = make_stops();
        stops[0].actual_departure = Some(at(2));
        let mut progress = make_progress(stops);
        progress.departed_from_origin = true;
        progress.delay_minutes = 5;

        let origin = present_stop(&progress, &progress.stops[0]);
        assert_eq!(origin.arrival, None);
        assert_eq!(
            origin.departure,
            Some(StyledText::new("08:02", TextStyle::Late))
        );
        assert_eq!(origin.track_text, StyledText::plain("5"));
        assert_eq!(origin.row_style, RowStyle::Dimmed);

        let middle = present_stop(&progress, &progress.stops[1]);
        assert_eq!(
            middle.arrival,
            Some(StyledText::new("09:05", TextStyle::Estimated))
        );
        assert_eq!(middle.row_style, RowStyle::Plain);

        let terminus = present_stop(&progress, &progress.stops[2]);
        assert!(terminus.departure.is_none());
        assert!(terminus.arrival.is_some());
        assert!(terminus.track_text.is_empty());
    }
}
