//! The presentation rules.
//!
//! Each rule is a pure function of a few flags and values, so the board
//! row, the stop-by-stop progress view and the HTTP wrapper all agree.

use chrono::Duration;

use crate::domain::RailTime;

use super::style::{RowStyle, StyledText, TextStyle};

/// Grace period before an actual time counts as late.
const LATE_GRACE_SECS: i64 = 30;

/// Delay or status text.
///
/// `origin_track_known` means the origin already has an actual departure
/// track, i.e. the train is standing at its platform.
pub fn delay_rule(
    delay_minutes: i32,
    departed_from_origin: bool,
    origin_track_known: bool,
) -> StyledText {
    if departed_from_origin {
        match delay_minutes {
            d if d > 0 => StyledText::new(format!("+{d}"), TextStyle::Warning),
            d if d < 0 => StyledText::new(d.to_string(), TextStyle::Positive),
            _ => StyledText::plain("On time"),
        }
    } else if origin_track_known {
        StyledText::plain("Ready")
    } else {
        StyledText::plain("Not departed")
    }
}

/// Track to show, given the actual and scheduled track for one side.
pub fn track_rule(actual: Option<&str>, scheduled: Option<&str>) -> StyledText {
    match (actual, scheduled) {
        (Some(actual), Some(scheduled)) if actual == scheduled => {
            StyledText::new(actual, TextStyle::TrackUnchanged)
        }
        (Some(actual), _) => StyledText::new(actual, TextStyle::TrackChanged),
        (None, Some(scheduled)) => StyledText::plain(scheduled),
        (None, None) => StyledText::empty(),
    }
}

/// Row weight for a stop, from the viewer's point in the journey.
pub fn row_style_rule(
    arrived: bool,
    departed: bool,
    origin_departed: bool,
    destination_arrived: bool,
) -> RowStyle {
    if (arrived || origin_departed) && (departed || destination_arrived) {
        RowStyle::Dimmed
    } else if arrived && !departed {
        RowStyle::Bold
    } else {
        RowStyle::Plain
    }
}

/// A stop's own arrival or departure time.
pub fn time_display(
    scheduled: Option<RailTime>,
    actual: Option<RailTime>,
    delay_minutes: i32,
) -> StyledText {
    match (actual, scheduled) {
        (Some(actual), Some(scheduled)) => {
            let deadline = scheduled.checked_add(Duration::seconds(LATE_GRACE_SECS));
            let style = if deadline.is_some_and(|d| actual > d) {
                TextStyle::Late
            } else {
                TextStyle::OnTime
            };
            StyledText::new(actual.to_string(), style)
        }
        (Some(actual), None) => StyledText::new(actual.to_string(), TextStyle::OnTime),
        (None, Some(scheduled)) if delay_minutes > 0 => {
            match scheduled.plus_minutes(i64::from(delay_minutes)) {
                Some(estimate) => StyledText::new(estimate.to_string(), TextStyle::Estimated),
                None => StyledText::plain(scheduled.to_string()),
            }
        }
        (None, Some(scheduled)) => StyledText::plain(scheduled.to_string()),
        (None, None) => StyledText::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-15 08:00 CET
    const T0: i64 = 1_705_302_000_000;

    fn at(offset_secs: i64) -> RailTime {
        RailTime::from_epoch_ms(T0 + offset_secs * 1000).unwrap()
    }

    #[test]
    fn delay_when_departed() {
        assert_eq!(
            delay_rule(5, true, false),
            StyledText::new("+5", TextStyle::Warning)
        );
        assert_eq!(
            delay_rule(-3, true, false),
            StyledText::new("-3", TextStyle::Positive)
        );
        assert_eq!(delay_rule(0, true, false), StyledText::plain("On time"));
        assert_eq!(delay_rule(0, true, true), StyledText::plain("On time"));
    }

    #[test]
    fn delay_when_not_departed() {
        assert_eq!(delay_rule(0, false, true), StyledText::plain("Ready"));
        assert_eq!(delay_rule(0, false, false), StyledText::plain("Not departed"));
        // Delay is ignored until the train moves
        assert_eq!(delay_rule(7, false, false), StyledText::plain("Not departed"));
    }

    #[test]
    fn track_unchanged_and_changed() {
        assert_eq!(
            track_rule(Some("5"), Some("5")),
            StyledText::new("5", TextStyle::TrackUnchanged)
        );
        assert_eq!(
            track_rule(Some("5"), Some("3")),
            StyledText::new("5", TextStyle::TrackChanged)
        );
    }

    #[test]
    fn track_without_schedule_is_changed() {
        assert_eq!(
            track_rule(Some("5"), None),
            StyledText::new("5", TextStyle::TrackChanged)
        );
    }

    #[test]
    fn track_falls_back_to_schedule() {
        assert_eq!(track_rule(None, Some("3")), StyledText::plain("3"));
        assert_eq!(track_rule(None, None), StyledText::empty());
    }

    #[test]
    fn row_style_dimmed_when_passed() {
        assert_eq!(row_style_rule(true, true, true, true), RowStyle::Dimmed);
        assert_eq!(row_style_rule(true, true, true, false), RowStyle::Dimmed);
        // Origin stop: no arrival, but origin departed
        assert_eq!(row_style_rule(false, true, true, false), RowStyle::Dimmed);
        // Destination stop: no departure, but destination arrived
        assert_eq!(row_style_rule(true, false, true, true), RowStyle::Dimmed);
    }

    #[test]
    fn row_style_bold_when_standing() {
        assert_eq!(row_style_rule(true, false, true, false), RowStyle::Bold);
    }

    #[test]
    fn row_style_plain_otherwise() {
        assert_eq!(row_style_rule(false, false, false, false), RowStyle::Plain);
        assert_eq!(row_style_rule(false, false, true, false), RowStyle::Plain);
    }

    #[test]
    fn time_actual_late_after_grace() {
        let shown = time_display(Some(at(0)), Some(at(31)), 0);
        assert_eq!(shown.style, TextStyle::Late);
        assert_eq!(shown.text, "08:00");

        let shown = time_display(Some(at(0)), Some(at(240)), 0);
        assert_eq!(shown, StyledText::new("08:04", TextStyle::Late));
    }

    #[test]
    fn time_actual_within_grace_is_on_time() {
        assert_eq!(time_display(Some(at(0)), Some(at(30)), 5).style, TextStyle::OnTime);
        assert_eq!(time_display(Some(at(0)), Some(at(-60)), 0).style, TextStyle::OnTime);
    }

    #[test]
    fn time_estimated_from_delay() {
        assert_eq!(
            time_display(Some(at(0)), None, 7),
            StyledText::new("08:07", TextStyle::Estimated)
        );
    }

    #[test]
    fn time_bare_schedule() {
        assert_eq!(time_display(Some(at(0)), None, 0), StyledText::plain("08:00"));
        assert_eq!(time_display(Some(at(0)), None, -2), StyledText::plain("08:00"));
        assert_eq!(time_display(None, None, 3), StyledText::empty());
    }
}
