//! Board, progress and statistics views.

use std::io::{self, Write};

use chrono::Duration;

use crate::domain::{BoardKind, RailTime, StationRef, Stats, TrainProgress, TravelSolutions};
use crate::presentation::{delay_rule, present_stop};
use crate::timetable::TimetableRow;

use super::ansi::{bold, dim, paint, weigh, yellow};
use super::table::Table;

const PROGRESS_BAR_WIDTH: usize = 40;
const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';

fn board_title(station: &StationRef, kind: BoardKind) -> String {
    match kind {
        BoardKind::Departures => format!("Departures from {}", station.name),
        BoardKind::Arrivals => format!("Arrivals at {}", station.name),
    }
}

fn board_headers(kind: BoardKind) -> [&'static str; 5] {
    match kind {
        BoardKind::Departures => ["Train", "Destination", "Departure", "Delay", "Track"],
        BoardKind::Arrivals => ["Train", "Origin", "Arrival", "Delay", "Track"],
    }
}

fn empty_board_message(kind: BoardKind) -> &'static str {
    match kind {
        BoardKind::Departures => "No trains departing in the next 90 minutes.",
        BoardKind::Arrivals => "No trains arriving in the next 90 minutes.",
    }
}

/// Draw a station board.
pub fn render_board<W: Write>(
    out: &mut W,
    station: &StationRef,
    kind: BoardKind,
    rows: &[TimetableRow],
) -> io::Result<()> {
    writeln!(out, "{}", bold(&board_title(station, kind)))?;

    if rows.is_empty() {
        writeln!(out, "{}", empty_board_message(kind))?;
        return Ok(());
    }

    let mut table = Table::new(board_headers(kind));
    for row in rows {
        let cells = row
            .cells()
            .iter()
            .map(|cell| {
                let painted = weigh(&paint(cell), row.presentation.row_style);
                if row.presentation.is_approximate {
                    yellow(&painted)
                } else {
                    painted
                }
            })
            .collect();
        table.add_row(cells);
    }
    writeln!(out, "{}", table.render())?;

    for row in rows {
        if let Some(warning) = &row.warning {
            writeln!(out, "{}: {}", row.identity, dim(warning))?;
        }
    }
    Ok(())
}

/// `[████░░░░] 42%`, with `ratio` clamped to `0.0..=1.0`.
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
    let filled = (ratio * width as f64).round() as usize;
    format!(
        "[{}{}] {:>3}%",
        BAR_FILLED.to_string().repeat(filled),
        BAR_EMPTY.to_string().repeat(width - filled),
        (ratio * 100.0).round() as u32
    )
}

fn hhmm(time: Option<RailTime>) -> String {
    time.map_or_else(|| "--:--".to_string(), |t| t.to_string())
}

/// Draw the stop-by-stop progress of one journey.
pub fn render_progress<W: Write>(out: &mut W, progress: &TrainProgress) -> io::Result<()> {
    let origin_track_known = progress
        .origin_stop()
        .is_some_and(|s| s.actual_departure_track.is_some());
    let delay = delay_rule(
        progress.delay_minutes,
        progress.departed_from_origin,
        origin_track_known,
    );

    writeln!(
        out,
        "Train {} · {}",
        progress.display_identity(),
        paint(&delay)
    )?;
    writeln!(out, "{} {}", progress.departure_time, progress.origin.name)?;
    writeln!(out, "{} {}", progress.arrival_time, progress.destination.name)?;

    match (&progress.last_update_station, progress.last_update_time) {
        (Some(station), Some(time)) => {
            writeln!(out, "{}", dim(&format!("Last update at {time} at {station}")))?;
            writeln!(
                out,
                "Progress {}",
                progress_bar(progress.completion_ratio(), PROGRESS_BAR_WIDTH)
            )?;
        }
        _ => writeln!(out, "{}", dim("No updates available."))?,
    }

    if let Some(warning) = &progress.warning {
        writeln!(out, "{}", dim(warning))?;
    }
    if let Some(reason) = &progress.delay_reason {
        writeln!(out, "{}", dim(reason))?;
    }

    for stop in &progress.stops {
        let shown = present_stop(progress, stop);

        let heading = if shown.track_text.is_empty() {
            stop.station.name.clone()
        } else {
            format!("{} · {}", stop.station.name, paint(&shown.track_text))
        };
        writeln!(out)?;
        writeln!(out, "{}", weigh(&heading, shown.row_style))?;

        if let Some(arrival) = &shown.arrival {
            writeln!(
                out,
                "Arr.:\t{}\t{}",
                hhmm(stop.scheduled_arrival),
                paint(arrival)
            )?;
        }
        if let Some(departure) = &shown.departure {
            writeln!(
                out,
                "Dep.:\t{}\t{}",
                hhmm(stop.scheduled_departure),
                paint(departure)
            )?;
        }
    }
    Ok(())
}

/// Draw the network statistics.
pub fn render_stats<W: Write>(out: &mut W, stats: &Stats) -> io::Result<()> {
    writeln!(out, "Trains since midnight: {}", stats.trains_since_midnight)?;
    writeln!(out, "Trains running now: {}", stats.trains_running)?;
    if let Some(update) = stats.last_update {
        let text = format!("Last update: {}", update.local().format("%H:%M:%S"));
        writeln!(out, "{}", dim(&text))?;
    }
    Ok(())
}

/// `45 min`, `1h05`, `1d2h05`. Negative spans show as zero.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_minutes().max(0);
    let (days, hours, minutes) = (total / 1440, total / 60 % 24, total % 60);
    if days > 0 {
        format!("{days}d{hours}h{minutes:02}")
    } else if hours > 0 {
        format!("{hours}h{minutes:02}")
    } else {
        format!("{minutes} min")
    }
}

/// Draw travel solutions, one block per solution.
pub fn render_solutions<W: Write>(
    out: &mut W,
    from: &StationRef,
    to: &StationRef,
    solutions: &TravelSolutions,
) -> io::Result<()> {
    let title = format!("Travel solutions from {} to {}", from.name, to.name);
    writeln!(out, "{}", bold(&title))?;

    if solutions.solutions.is_empty() {
        writeln!(out, "No travel solutions found.")?;
        return Ok(());
    }

    for solution in &solutions.solutions {
        writeln!(out)?;
        let changes = solution.changes();
        for (i, vehicle) in solution.vehicles.iter().enumerate() {
            writeln!(out, "{vehicle} [{}]", format_duration(vehicle.duration()))?;
            if let Some(change) = changes.get(i) {
                let text = format!(
                    "Change at {} [{}]",
                    change.station,
                    format_duration(change.wait)
                );
                writeln!(out, "{}", dim(&text))?;
            }
        }
    }
    Ok(())
}
