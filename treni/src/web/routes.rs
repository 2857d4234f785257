//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{BoardKind, EneeCode, RailTime, StationRef, TrainKey, now_local};
use crate::timetable::build_timetable;
use crate::viaggiatreno::{DEFAULT_BOARD_LIMIT, ViaggiaTrenoError};

use super::dto::*;
use super::state::AppState;

/// Upper bound on `limit` for any route.
const MAX_LIMIT: usize = 50;

/// Create the application router.
///
/// `webapp_dir` is served under `/webapp`.
pub fn create_router(state: AppState, webapp_dir: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations/search/:query", get(search_stations))
        .route("/stations/:station_id/departures", get(departures))
        .route("/stations/:station_id/arrivals", get(arrivals))
        .route("/stations/:station_id/board", get(board))
        .route("/trains/:train_number", get(trains_with_number))
        .route("/trains", get(train_progress))
        .route("/stats", get(stats))
        .nest_service("/webapp", ServeDir::new(webapp_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Fuzzy search over the station list.
async fn search_stations(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(req): Query<StationSearchQuery>,
) -> Response {
    let limit = req.limit.unwrap_or(10).min(MAX_LIMIT);
    let matches = state.stations.search(&query, limit);

    if matches.is_empty() {
        return no_content();
    }

    let stations = matches.iter().map(StationMatchResult::from_match).collect();
    Json(StationSearchResponse { stations }).into_response()
}

/// Parse `search_datetime` as Italian local time. Absent means now.
fn parse_search_datetime(raw: Option<&str>) -> Result<DateTime<Tz>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(now_local());
    };

    let bad = || AppError::BadRequest {
        message: format!("Invalid search_datetime: {raw}"),
    };

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.with_timezone(&chrono_tz::Europe::Rome));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .map_err(|_| bad())?;

    RailTime::from_local(naive)
        .map(|t| t.local())
        .ok_or_else(bad)
}

fn parse_station_id(raw: &str) -> Result<EneeCode, AppError> {
    EneeCode::parse(raw).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })
}

fn parse_board_kind(raw: Option<&str>) -> Result<BoardKind, AppError> {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        None | Some("departures") => Ok(BoardKind::Departures),
        Some("arrivals") => Ok(BoardKind::Arrivals),
        Some(other) => Err(AppError::BadRequest {
            message: format!("Invalid kind: {other}"),
        }),
    }
}

/// The named station, falling back to its id when not in the list.
fn station_ref(state: &AppState, code: EneeCode) -> StationRef {
    state
        .stations
        .get(code)
        .map(|record| record.station_ref())
        .unwrap_or_else(|| StationRef::new(code, code.to_prefixed_id()))
}

async fn board_response(
    state: &AppState,
    station_id: &str,
    kind: BoardKind,
    req: &BoardQuery,
) -> Result<Json<BoardResponse>, AppError> {
    let code = parse_station_id(station_id)?;
    let at = parse_search_datetime(req.search_datetime.as_deref())?;
    let limit = req.limit.unwrap_or(DEFAULT_BOARD_LIMIT).min(MAX_LIMIT);

    let entries = state.client().board(code, kind, &at, limit).await?;
    let station = station_ref(state, code);
    let rows = build_timetable(state.client(), &entries, &station, kind).await;

    Ok(Json(BoardResponse {
        station: StationResult::from_ref(&station),
        kind: match kind {
            BoardKind::Departures => "departures",
            BoardKind::Arrivals => "arrivals",
        },
        rows: rows.iter().map(BoardRowResult::from_row).collect(),
    }))
}

async fn departures(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Query(req): Query<BoardQuery>,
) -> Result<Json<BoardResponse>, AppError> {
    board_response(&state, &station_id, BoardKind::Departures, &req).await
}

async fn arrivals(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Query(req): Query<BoardQuery>,
) -> Result<Json<BoardResponse>, AppError> {
    board_response(&state, &station_id, BoardKind::Arrivals, &req).await
}

/// Either board, chosen by `?kind=`.
async fn board(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Query(req): Query<BoardQuery>,
) -> Result<Json<BoardResponse>, AppError> {
    let kind = parse_board_kind(req.kind.as_deref())?;
    board_response(&state, &station_id, kind, &req).await
}

/// Journeys with the given number.
async fn trains_with_number(
    State(state): State<AppState>,
    Path(train_number): Path<u32>,
) -> Result<Response, AppError> {
    let found = state.lookups.search_train_number(train_number).await?;

    if found.is_empty() {
        return Ok(no_content());
    }

    let trains: Vec<_> = found.iter().map(TrainInfoResult::from_info).collect();
    Ok(Json(trains).into_response())
}

/// Real-time progress of one journey.
async fn train_progress(
    State(state): State<AppState>,
    Query(req): Query<TrainProgressQuery>,
) -> Result<Response, AppError> {
    let origin = parse_station_id(&req.origin_station_id)?;
    let departure_date = NaiveDate::parse_from_str(&req.departure_date, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest {
            message: format!("Invalid departure_date: {}", req.departure_date),
        })?;

    let key = TrainKey {
        number: req.train_number,
        origin,
        departure_date,
    };

    match state.client().train_progress(&key).await? {
        Some(progress) => Ok(Json(TrainProgressResponse::from_progress(&progress)).into_response()),
        None => Ok(no_content()),
    }
}

async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.lookups.statistics().await?;
    Ok(Json(StatsResponse::from_stats(&stats)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Upstream { message: String },
}

impl From<ViaggiaTrenoError> for AppError {
    fn from(e: ViaggiaTrenoError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "bad request");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use chrono::Timelike;

    use super::*;
    use crate::cache::{CacheConfig, CachedLookups};
    use crate::domain::StationRecord;
    use crate::stations::StationIndex;
    use crate::viaggiatreno::{ViaggiaTrenoClient, ViaggiaTrenoConfig};

    fn test_state() -> AppState {
        // Nothing listens here; routes under test never reach upstream
        let client = ViaggiaTrenoClient::new(
            ViaggiaTrenoConfig::new()
                .with_base_url("http://127.0.0.1:9")
                .with_timeout(1),
        )
        .unwrap();

        let stations = ["MILANO CENTRALE", "ROMA TERMINI"]
            .iter()
            .zip([1700, 8409])
            .map(|(name, code)| StationRecord {
                enee_code: EneeCode::new(code).unwrap(),
                long_name: name.to_string(),
                short_name: name.to_string(),
            })
            .collect();

        AppState::new(
            CachedLookups::new(client, &CacheConfig::default()),
            StationIndex::new(stations),
        )
    }

    async fn serve() -> SocketAddr {
        let app = create_router(test_state(), "webapp");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn health_ok() {
        let addr = serve().await;
        let body = reqwest::get(format!("http://{addr}/health"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn station_search_finds_and_misses() {
        let addr = serve().await;

        let found = reqwest::get(format!("http://{addr}/stations/search/termini"))
            .await
            .unwrap();
        assert_eq!(found.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = found.json().await.unwrap();
        assert_eq!(json["stations"][0]["station_id"], "S08409");
        assert_eq!(json["stations"][0]["long_name"], "ROMA TERMINI");

        let missed = reqwest::get(format!("http://{addr}/stations/search/%20"))
            .await
            .unwrap();
        assert_eq!(missed.status(), reqwest::StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn bad_station_id_is_rejected() {
        let addr = serve().await;
        let response = reqwest::get(format!("http://{addr}/stations/XYZ/departures"))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let json: serde_json::Value = response.json().await.unwrap();
        assert!(json["error"].as_str().unwrap().contains("XYZ"));
    }

    #[tokio::test]
    async fn bad_board_kind_is_rejected() {
        let addr = serve().await;
        let response = reqwest::get(format!("http://{addr}/stations/S01700/board?kind=sideways"))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bad_departure_date_is_rejected() {
        let addr = serve().await;
        let response = reqwest::get(format!(
            "http://{addr}/trains?origin_station_id=S01700&train_number=9999&departure_date=15/01/2024"
        ))
        .await
        .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn search_datetime_formats() {
        let t = parse_search_datetime(Some("2024-01-15T08:30")).unwrap();
        assert_eq!((t.hour(), t.minute()), (8, 30));
        assert_eq!(t.timezone(), chrono_tz::Europe::Rome);

        let t = parse_search_datetime(Some("2024-01-15T08:30:15")).unwrap();
        assert_eq!(t.second(), 15);

        // Given as UTC, answered in Rome time
        let t = parse_search_datetime(Some("2024-01-15T07:30:00Z")).unwrap();
        assert_eq!(t.hour(), 8);

        assert!(parse_search_datetime(Some("yesterday")).is_err());
        assert!(parse_search_datetime(None).is_ok());
        assert!(parse_search_datetime(Some("  ")).is_ok());
    }

    #[test]
    fn error_status_codes() {
        let upstream = AppError::from(ViaggiaTrenoError::Upstream {
            status: 500,
            body: "boom".into(),
        });
        assert_eq!(upstream.into_response().status(), StatusCode::BAD_GATEWAY);

        let bad = AppError::BadRequest {
            message: "nope".into(),
        };
        assert_eq!(bad.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn board_kind_values() {
        assert_eq!(parse_board_kind(None).unwrap(), BoardKind::Departures);
        assert_eq!(parse_board_kind(Some("Arrivals")).unwrap(), BoardKind::Arrivals);
        assert!(parse_board_kind(Some("both")).is_err());
    }
}
