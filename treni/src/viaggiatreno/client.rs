//! ViaggiaTreno HTTP client.
//!
//! Every endpoint is a plain `GET {base}/{endpoint}/{arg}/{arg}...`.
//! Responses are JSON or plain text depending on the endpoint and on
//! whether upstream has data, so [`ViaggiaTrenoClient::fetch`] returns a
//! [`RawResponse`] and the typed methods decide what to do with it.

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use chrono_tz::Tz;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::{
    BoardKind, EneeCode, StationRecord, Stats, TimetableEntry, TrainInfo, TrainKey, TrainProgress,
    TravelSolutions, board_query_time, midnight_epoch_ms, now_local,
};

use super::convert::{
    ConversionError, convert_board, convert_station, convert_stats, convert_travel_solutions,
    decode_train_progress, parse_train_search,
};
use super::error::ViaggiaTrenoError;
use super::types::{RawBoardEntry, RawResponse, RawSolutions, RawStation, RawStats};

/// Default base URL for the ViaggiaTreno API.
pub const DEFAULT_BASE_URL: &str = "http://www.viaggiatreno.it/infomobilita/resteasy/viaggiatreno";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 16;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of board entries kept.
pub const DEFAULT_BOARD_LIMIT: usize = 10;

/// How much of an unparseable body to keep in errors.
const BODY_SNIPPET_LEN: usize = 500;

/// Configuration for the ViaggiaTreno client.
#[derive(Debug, Clone)]
pub struct ViaggiaTrenoConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ViaggiaTrenoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ViaggiaTrenoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL (for testing or a proxy).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// ViaggiaTreno API client.
///
/// Uses a semaphore to bound the number of requests in flight, since a
/// single board fans out into one progress request per train.
#[derive(Debug, Clone)]
pub struct ViaggiaTrenoClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl ViaggiaTrenoClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ViaggiaTrenoConfig) -> Result<Self, ViaggiaTrenoError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Fetch one endpoint.
    ///
    /// Non-2xx statuses become [`ViaggiaTrenoError::Upstream`]. The body is
    /// JSON when the content type says so and it is not blank.
    pub async fn fetch(
        &self,
        endpoint: &str,
        args: &[&str],
    ) -> Result<RawResponse, ViaggiaTrenoError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ViaggiaTrenoError::Upstream {
                status: 0,
                body: "semaphore closed".to_string(),
            })?;

        let url = endpoint_url(&self.base_url, endpoint, args);
        debug!(%url, "fetching");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ViaggiaTrenoError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("json"));

        let body = response.text().await?;

        if !is_json || body.trim().is_empty() {
            return Ok(RawResponse::Text(body));
        }

        serde_json::from_str(&body)
            .map(RawResponse::Json)
            .map_err(|e| ViaggiaTrenoError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(BODY_SNIPPET_LEN).collect()),
            })
    }

    async fn fetch_json<T: DeserializeOwned + Default>(
        &self,
        endpoint: &str,
        args: &[&str],
    ) -> Result<T, ViaggiaTrenoError> {
        let raw = self.fetch(endpoint, args).await?;
        if raw.is_empty() {
            return Ok(T::default());
        }

        match raw {
            RawResponse::Json(value) => {
                serde_json::from_value(value).map_err(|e| ViaggiaTrenoError::Json {
                    message: e.to_string(),
                    body: None,
                })
            }
            RawResponse::Text(text) => {
                serde_json::from_str(&text).map_err(|e| ViaggiaTrenoError::Json {
                    message: e.to_string(),
                    body: Some(text.chars().take(BODY_SNIPPET_LEN).collect()),
                })
            }
        }
    }

    /// Network-wide counters for today.
    pub async fn statistics(&self) -> Result<Stats, ViaggiaTrenoError> {
        let now_ms = now_local().timestamp_millis().to_string();
        let raw: RawStats = self.fetch_json("statistiche", &[&now_ms]).await?;
        Ok(convert_stats(&raw))
    }

    /// Stations whose name starts with `prefix`.
    ///
    /// Records that fail to convert are logged and skipped.
    pub async fn search_stations(
        &self,
        prefix: &str,
    ) -> Result<Vec<StationRecord>, ViaggiaTrenoError> {
        let raw: Vec<RawStation> = self.fetch_json("cercaStazione", &[prefix]).await?;

        Ok(raw
            .iter()
            .filter_map(|s| match convert_station(s) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(id = ?s.id, error = %e, "skipping station record");
                    None
                }
            })
            .collect())
    }

    /// Departures from or arrivals at `station` around `at`.
    pub async fn board(
        &self,
        station: EneeCode,
        kind: BoardKind,
        at: &DateTime<Tz>,
        limit: usize,
    ) -> Result<Vec<TimetableEntry>, ViaggiaTrenoError> {
        let endpoint = match kind {
            BoardKind::Departures => "partenze",
            BoardKind::Arrivals => "arrivi",
        };
        let station_id = station.to_prefixed_id();
        let when = board_query_time(at);

        let raw: Vec<RawBoardEntry> = self.fetch_json(endpoint, &[&station_id, &when]).await?;
        Ok(convert_board(&raw, kind, limit))
    }

    pub async fn departures(
        &self,
        station: EneeCode,
        at: &DateTime<Tz>,
        limit: usize,
    ) -> Result<Vec<TimetableEntry>, ViaggiaTrenoError> {
        self.board(station, BoardKind::Departures, at, limit).await
    }

    pub async fn arrivals(
        &self,
        station: EneeCode,
        at: &DateTime<Tz>,
        limit: usize,
    ) -> Result<Vec<TimetableEntry>, ViaggiaTrenoError> {
        self.board(station, BoardKind::Arrivals, at, limit).await
    }

    /// Journeys running today or recently with the given number.
    pub async fn search_train_number(
        &self,
        number: u32,
    ) -> Result<Vec<TrainInfo>, ViaggiaTrenoError> {
        let number = number.to_string();
        let raw = self
            .fetch("cercaNumeroTrenoTrenoAutocomplete", &[&number])
            .await?;

        Ok(match raw {
            RawResponse::Text(text) => parse_train_search(&text),
            RawResponse::Json(serde_json::Value::String(text)) => parse_train_search(&text),
            RawResponse::Json(_) => Vec::new(),
        })
    }

    /// Real-time progress of one journey. `Ok(None)` when upstream has none.
    pub async fn train_progress(
        &self,
        key: &TrainKey,
    ) -> Result<Option<TrainProgress>, ViaggiaTrenoError> {
        let midnight = midnight_epoch_ms(key.departure_date).ok_or_else(|| {
            ConversionError::InvalidValue {
                field: "departure date",
                value: key.departure_date.to_string(),
            }
        })?;

        let origin = key.origin.to_prefixed_id();
        let number = key.number.to_string();
        let midnight = midnight.to_string();

        let raw = self
            .fetch("andamentoTreno", &[&origin, &number, &midnight])
            .await?;
        Ok(decode_train_progress(&raw)?)
    }

    /// Journeys from `origin` to `destination` leaving after `at`, at most `limit`.
    ///
    /// This endpoint takes bare numeric station codes.
    pub async fn travel_solutions(
        &self,
        origin: EneeCode,
        destination: EneeCode,
        at: &DateTime<Tz>,
        limit: usize,
    ) -> Result<TravelSolutions, ViaggiaTrenoError> {
        let origin = origin.value().to_string();
        let destination = destination.value().to_string();
        let when = solution_query_time(at);

        let raw: RawSolutions = self
            .fetch_json("soluzioniViaggioNew", &[&origin, &destination, &when])
            .await?;
        Ok(convert_travel_solutions(&raw, limit))
    }
}

/// Local ISO date-time without an offset, as the solutions endpoint expects.
fn solution_query_time(at: &DateTime<Tz>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Build `{base}/{endpoint}/{args joined by "/"}`.
fn endpoint_url(base_url: &str, endpoint: &str, args: &[&str]) -> String {
    let mut url = format!("{base_url}/{endpoint}");
    for arg in args {
        url.push('/');
        url.push_str(arg);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = ViaggiaTrenoConfig::new()
            .with_base_url("http://localhost:8080")
            .with_max_concurrent(4)
            .with_timeout(5);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_concurrent, 4);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn config_defaults() {
        let config = ViaggiaTrenoConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn url_joins_args() {
        assert_eq!(
            endpoint_url("http://x/vt", "andamentoTreno", &["S01700", "9999", "1705273200000"]),
            "http://x/vt/andamentoTreno/S01700/9999/1705273200000"
        );
        assert_eq!(endpoint_url("http://x/vt", "statistiche", &[]), "http://x/vt/statistiche");
    }

    #[test]
    fn solution_query_is_local_iso() {
        use chrono::TimeZone;

        let at = chrono_tz::Europe::Rome
            .with_ymd_and_hms(2024, 1, 15, 8, 0, 0)
            .unwrap();
        let when = solution_query_time(&at);
        assert_eq!(when, "2024-01-15T08:00:00");
        assert_eq!(
            endpoint_url("http://x/vt", "soluzioniViaggioNew", &["1700", "6421", &when]),
            "http://x/vt/soluzioniViaggioNew/1700/6421/2024-01-15T08:00:00"
        );
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client =
            ViaggiaTrenoClient::new(ViaggiaTrenoConfig::new().with_base_url("http://x/vt/"))
                .unwrap();
        assert_eq!(client.base_url, "http://x/vt");
    }
}
