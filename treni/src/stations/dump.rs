//! Building the national station list.
//!
//! Upstream has no "list all stations" endpoint, but the prefix search
//! accepts single letters, so the list is the union of the searches for
//! `A` to `Z`.

use std::collections::HashSet;

use futures::future::join_all;
use tracing::{info, warn};

use crate::domain::StationRecord;
use crate::viaggiatreno::ViaggiaTrenoClient;

use super::cache::StationCache;
use super::error::StationError;

/// Merge per-letter results: drop duplicate ids, sort by long name.
pub fn merge_station_lists(lists: Vec<Vec<StationRecord>>) -> Vec<StationRecord> {
    let mut seen = HashSet::new();
    let mut merged: Vec<StationRecord> = lists
        .into_iter()
        .flatten()
        .filter(|record| seen.insert(record.enee_code))
        .collect();

    merged.sort_by(|a, b| {
        a.long_name
            .cmp(&b.long_name)
            .then(a.enee_code.cmp(&b.enee_code))
    });
    merged
}

/// Fetch every station from upstream.
///
/// Fails if any letter fails, so a partial list is never cached.
pub async fn dump_stations(
    client: &ViaggiaTrenoClient,
) -> Result<Vec<StationRecord>, StationError> {
    let letters: Vec<String> = ('A'..='Z').map(String::from).collect();
    let fetches = letters
        .iter()
        .map(|letter| client.search_stations(letter));

    let mut lists = Vec::with_capacity(letters.len());
    for (letter, result) in letters.iter().zip(join_all(fetches).await) {
        match result {
            Ok(list) => lists.push(list),
            Err(e) => {
                warn!(%letter, error = %e, "station search failed");
                return Err(e.into());
            }
        }
    }

    let stations = merge_station_lists(lists);
    info!(count = stations.len(), "fetched station list");
    Ok(stations)
}

/// The cached station list, refreshed from upstream once it expires.
///
/// If the refresh fails and an expired file exists, the expired list is
/// used.
pub async fn load_or_dump(
    client: &ViaggiaTrenoClient,
    cache: &StationCache,
) -> Result<Vec<StationRecord>, StationError> {
    if let Some(stations) = cache.load() {
        return Ok(stations);
    }

    match dump_stations(client).await {
        Ok(stations) => {
            if let Err(e) = cache.save(&stations) {
                warn!(path = %cache.path().display(), error = %e, "could not save station list");
            }
            Ok(stations)
        }
        Err(e) => match cache.load_stale() {
            Ok(stale) => {
                warn!(error = %e, "station refresh failed, using expired list");
                Ok(stale)
            }
            Err(_) => Err(e),
        },
    }
}
