//! Timetable rows for a station board.
//!
//! Every train on a board needs its own progress request. Those requests
//! run concurrently; rows come back in board order regardless of which
//! request finishes first, and a failed request only degrades its own row.

use futures::future::join_all;
use tracing::{debug, error, warn};

use crate::domain::{BoardKind, RailTime, StationRef, TimetableEntry, TrainKey, TrainProgress};
use crate::presentation::{RowPresentation, StyledText, build_row_presentation};
use crate::viaggiatreno::{ProgressSource, ViaggiaTrenoError};

/// One assembled board row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableRow {
    pub key: TrainKey,
    /// Category and number(s), e.g. `FR 9999/10001`.
    pub identity: String,
    /// Destination on a departures board, origin on an arrivals board.
    pub endpoint_name: String,
    pub scheduled_time: RailTime,
    pub warning: Option<String>,
    pub presentation: RowPresentation,
}

impl TimetableRow {
    /// The five display cells: train, endpoint, time, delay, track.
    pub fn cells(&self) -> [StyledText; 5] {
        [
            StyledText::plain(&self.identity),
            StyledText::plain(&self.endpoint_name),
            StyledText::plain(self.scheduled_time.to_string()),
            self.presentation.delay_text.clone(),
            self.presentation.track_text.clone(),
        ]
    }
}

/// Assemble one row from a board entry and its progress, if any.
pub fn build_row(
    entry: &TimetableEntry,
    progress: Option<&TrainProgress>,
    reference: &StationRef,
    kind: BoardKind,
) -> TimetableRow {
    let presentation = build_row_presentation(progress, entry, reference, kind);

    let (identity, endpoint_name, scheduled_time) = match progress {
        Some(progress) if !presentation.is_approximate => {
            let endpoint = match kind {
                BoardKind::Departures => &progress.destination.name,
                BoardKind::Arrivals => &progress.origin.name,
            };
            let scheduled = progress
                .stop_at(reference.enee_code)
                .ok()
                .and_then(|stop| stop.times(kind.side()).0)
                .unwrap_or(entry.scheduled_time);
            (progress.display_identity(), endpoint.clone(), scheduled)
        }
        _ => (
            entry.display_identity(),
            entry.endpoint_name.clone(),
            entry.scheduled_time,
        ),
    };

    TimetableRow {
        key: entry.key(),
        identity,
        endpoint_name,
        scheduled_time,
        warning: progress
            .and_then(|p| p.warning.clone())
            .or_else(|| entry.warning.clone()),
        presentation,
    }
}

fn log_fetch_failure(key: &TrainKey, e: &ViaggiaTrenoError) {
    if e.is_transport() {
        warn!(train = %key, error = %e, "progress unavailable, showing approximate row");
    } else {
        error!(train = %key, error = %e, "progress rejected, showing approximate row");
    }
}

/// Build the rows of a board.
///
/// Fetches every entry's progress concurrently through `source`. Rows are
/// returned in the order of `entries`. Any fetch error, including a
/// timeout, is treated as "no real-time data" for that row.
pub async fn build_timetable<P: ProgressSource>(
    source: &P,
    entries: &[TimetableEntry],
    reference: &StationRef,
    kind: BoardKind,
) -> Vec<TimetableRow> {
    let fetches = entries.iter().map(|entry| async move {
        let key = entry.key();
        match source.train_progress(&key).await {
            Ok(progress) => {
                if progress.is_none() {
                    debug!(train = %key, "no real-time data");
                }
                progress
            }
            Err(e) => {
                log_fetch_failure(&key, &e);
                None
            }
        }
    });

    let progress = join_all(fetches).await;

    entries
        .iter()
        .zip(progress)
        .map(|(entry, progress)| build_row(entry, progress.as_ref(), reference, kind))
        .collect()
}
