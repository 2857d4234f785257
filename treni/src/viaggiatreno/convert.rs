//! Conversion from ViaggiaTreno DTOs to domain types.
//!
//! Upstream uses `0` as the null sentinel for timestamps, pads category
//! codes and track names with spaces, and spells station ids three
//! different ways. All of that is absorbed here so raw JSON never leaks
//! past this module.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::domain::{
    BoardKind, DomainError, EneeCode, NumberChange, RailTime, Side, StationRecord, StationRef,
    Stats, Stop, StopKind, TimetableEntry, TrainInfo, TrainProgress, TravelSolution,
    TravelSolutions, Vehicle,
};

use super::types::{
    RawBoardEntry, RawNumber, RawNumberChange, RawResponse, RawSolution, RawSolutions,
    RawStation, RawStats, RawStop, RawTrainProgress, RawVehicle,
};

/// Last-update station value meaning "no report yet".
const NO_STATION: &str = "--";

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Field present but unusable
    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    /// Body is not the JSON shape the endpoint returns
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Decode an epoch-millisecond timestamp. `0` and `null` mean unknown.
pub fn decode_timestamp_ms(raw: Option<i64>) -> Option<RailTime> {
    match raw {
        None | Some(0) => None,
        Some(ms) => RailTime::from_epoch_ms(ms),
    }
}

/// Trim a category code. Blank codes become `None`.
pub fn decode_category(raw: Option<&str>) -> Option<String> {
    decode_text(raw)
}

/// Trim free text (tracks, notices). Blank strings become `None`.
pub fn decode_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Map an upstream stop-type code.
pub fn decode_stop_kind(raw: &str) -> Result<StopKind, DomainError> {
    match raw.trim() {
        "P" => Ok(StopKind::Departure),
        "F" => Ok(StopKind::Intermediate),
        "A" => Ok(StopKind::Arrival),
        other => Err(DomainError::UnknownStopKind(other.to_string())),
    }
}

fn decode_station_id(raw: Option<&str>, field: &'static str) -> Result<EneeCode, ConversionError> {
    let raw = raw.ok_or(ConversionError::MissingField(field))?;
    Ok(EneeCode::parse(raw)?)
}

fn decode_number(raw: Option<&RawNumber>, field: &'static str) -> Result<u32, ConversionError> {
    let raw = raw.ok_or(ConversionError::MissingField(field))?;
    raw.as_u32().ok_or_else(|| ConversionError::InvalidValue {
        field,
        value: format!("{raw:?}"),
    })
}

fn decode_delay(raw: Option<i64>) -> Result<i32, ConversionError> {
    let minutes = raw.unwrap_or(0);
    i32::try_from(minutes).map_err(|_| ConversionError::InvalidValue {
        field: "ritardo",
        value: minutes.to_string(),
    })
}

fn required_time(raw: Option<i64>, field: &'static str) -> Result<RailTime, ConversionError> {
    decode_timestamp_ms(raw).ok_or(ConversionError::MissingField(field))
}

fn required_date(raw: Option<i64>, field: &'static str) -> Result<NaiveDate, ConversionError> {
    required_time(raw, field).map(|t| t.date())
}

/// Convert one raw stop record.
///
/// Fields that make no sense for the stop's kind are dropped: an origin
/// has no arrival side and a destination has no departure side.
pub fn convert_stop(raw: &RawStop) -> Result<Stop, ConversionError> {
    let enee_code = decode_station_id(raw.id.as_deref(), "id")?;
    let name = raw
        .stazione
        .as_deref()
        .map(str::trim)
        .ok_or(ConversionError::MissingField("stazione"))?;
    let kind_code = raw
        .tipo_fermata
        .as_deref()
        .ok_or(ConversionError::MissingField("tipoFermata"))?;
    let kind = decode_stop_kind(kind_code)?;

    let mut stop = Stop::new(StationRef::new(enee_code, name), kind);

    if stop.has_side(Side::Arrival) {
        stop.scheduled_arrival = decode_timestamp_ms(raw.arrivo_teorico);
        stop.actual_arrival = decode_timestamp_ms(raw.arrivo_reale);
        stop.scheduled_arrival_track =
            decode_text(raw.binario_programmato_arrivo_descrizione.as_deref());
        stop.actual_arrival_track = decode_text(raw.binario_effettivo_arrivo_descrizione.as_deref());
    }

    if stop.has_side(Side::Departure) {
        stop.scheduled_departure = decode_timestamp_ms(raw.partenza_teorica);
        stop.actual_departure = decode_timestamp_ms(raw.partenza_reale);
        stop.scheduled_departure_track =
            decode_text(raw.binario_programmato_partenza_descrizione.as_deref());
        stop.actual_departure_track =
            decode_text(raw.binario_effettivo_partenza_descrizione.as_deref());
    }

    Ok(stop)
}

/// Convert the ordered stop records of one train.
///
/// Each record is decoded on its own. A missing origin or destination
/// record is tolerated here and handled by
/// [`TrainProgress::origin_stop`] / [`TrainProgress::destination_stop`].
pub fn build_stops(raw: &[RawStop]) -> Result<Vec<Stop>, ConversionError> {
    raw.iter().map(convert_stop).collect()
}

fn convert_number_changes(
    raw: Option<&[RawNumberChange]>,
) -> Result<Vec<NumberChange>, ConversionError> {
    raw.unwrap_or(&[])
        .iter()
        .map(|c| {
            Ok(NumberChange {
                new_number: decode_number(c.nuovo_numero_treno.as_ref(), "nuovoNumeroTreno")?,
                at_station: c.stazione.as_deref().unwrap_or_default().trim().to_string(),
            })
        })
        .collect()
}

/// Convert a train progress payload.
pub fn convert_train_progress(raw: &RawTrainProgress) -> Result<TrainProgress, ConversionError> {
    let number = decode_number(raw.numero_treno.as_ref(), "numeroTreno")?;

    let origin = StationRef::new(
        decode_station_id(raw.id_origine.as_deref(), "idOrigine")?,
        raw.origine.as_deref().unwrap_or_default().trim(),
    );
    let destination = StationRef::new(
        decode_station_id(raw.id_destinazione.as_deref(), "idDestinazione")?,
        raw.destinazione.as_deref().unwrap_or_default().trim(),
    );

    let departure_time = required_time(raw.orario_partenza, "orarioPartenza")?;
    let arrival_time = required_time(raw.orario_arrivo, "orarioArrivo")?;
    let departure_date = decode_timestamp_ms(raw.data_partenza_treno)
        .map(|t| t.date())
        .unwrap_or_else(|| departure_time.date());

    let last_update_station = decode_text(raw.stazione_ultimo_rilevamento.as_deref())
        .filter(|s| s != NO_STATION);

    Ok(TrainProgress {
        number,
        origin,
        destination,
        departure_date,
        category: decode_category(raw.categoria.as_deref()),
        number_changes: convert_number_changes(raw.cambi_numero.as_deref())?,
        departure_time,
        arrival_time,
        delay_minutes: decode_delay(raw.ritardo)?,
        departed_from_origin: !raw.non_partito.unwrap_or(true),
        last_update_station,
        last_update_time: decode_timestamp_ms(raw.ora_ultimo_rilevamento),
        warning: decode_text(raw.sub_title.as_deref()),
        delay_reason: decode_text(raw.motivo_ritardo_prevalente.as_deref()),
        stops: build_stops(raw.fermate.as_deref().unwrap_or(&[]))?,
    })
}

/// Decode a train progress response.
///
/// An empty body means upstream has no real-time data for the train,
/// which is `Ok(None)` and not an error.
pub fn decode_train_progress(raw: &RawResponse) -> Result<Option<TrainProgress>, ConversionError> {
    if raw.is_empty() {
        return Ok(None);
    }

    let value = match raw {
        RawResponse::Json(value) => value.clone(),
        RawResponse::Text(text) => {
            serde_json::from_str(text).map_err(|e| ConversionError::Malformed(e.to_string()))?
        }
    };

    let progress: RawTrainProgress =
        serde_json::from_value(value).map_err(|e| ConversionError::Malformed(e.to_string()))?;

    convert_train_progress(&progress).map(Some)
}

/// Convert one board entry.
pub fn convert_board_entry(
    raw: &RawBoardEntry,
    kind: BoardKind,
) -> Result<TimetableEntry, ConversionError> {
    let (endpoint_name, scheduled_time, scheduled_track, actual_track) = match kind {
        BoardKind::Departures => (
            raw.destinazione.as_deref(),
            required_time(raw.orario_partenza, "orarioPartenza")?,
            raw.binario_programmato_partenza_descrizione.as_deref(),
            raw.binario_effettivo_partenza_descrizione.as_deref(),
        ),
        BoardKind::Arrivals => (
            raw.origine.as_deref(),
            required_time(raw.orario_arrivo, "orarioArrivo")?,
            raw.binario_programmato_arrivo_descrizione.as_deref(),
            raw.binario_effettivo_arrivo_descrizione.as_deref(),
        ),
    };

    Ok(TimetableEntry {
        kind,
        category: decode_category(raw.categoria_descrizione.as_deref()),
        number: decode_number(raw.numero_treno.as_ref(), "numeroTreno")?,
        origin: decode_station_id(raw.cod_origine.as_deref(), "codOrigine")?,
        departure_date: required_date(raw.data_partenza_treno, "dataPartenzaTreno")?,
        endpoint_name: endpoint_name.unwrap_or_default().trim().to_string(),
        scheduled_time,
        scheduled_track: decode_text(scheduled_track),
        actual_track: decode_text(actual_track),
        delay_minutes: decode_delay(raw.ritardo)?,
        departed_from_origin: !raw.non_partito.unwrap_or(true),
        in_station: raw.in_stazione.unwrap_or(false),
        warning: decode_text(raw.sub_title.as_deref()),
    })
}

/// Convert a board, keeping at most `limit` entries.
///
/// Entries that fail to convert are logged and skipped so one bad record
/// does not hide the rest of the board.
pub fn convert_board(raw: &[RawBoardEntry], kind: BoardKind, limit: usize) -> Vec<TimetableEntry> {
    raw.iter()
        .take(limit)
        .filter_map(|entry| match convert_board_entry(entry, kind) {
            Ok(converted) => Some(converted),
            Err(e) => {
                warn!(
                    number = ?entry.numero_treno,
                    error = %e,
                    "skipping board entry"
                );
                None
            }
        })
        .collect()
}

pub fn convert_stats(raw: &RawStats) -> Stats {
    Stats {
        trains_since_midnight: raw.treni_giorno.unwrap_or(0),
        trains_running: raw.treni_circolanti.unwrap_or(0),
        last_update: decode_timestamp_ms(raw.ultimo_aggiornamento),
    }
}

/// Collapse runs of double spaces and trim, as upstream pads names.
pub fn normalize_name(raw: &str) -> String {
    let mut name = raw.trim().to_string();
    while name.contains("  ") {
        name = name.replace("  ", " ");
    }
    name
}

/// Convert one station search result.
pub fn convert_station(raw: &RawStation) -> Result<StationRecord, ConversionError> {
    let long_name = raw
        .nome_lungo
        .as_deref()
        .ok_or(ConversionError::MissingField("nomeLungo"))?;

    Ok(StationRecord {
        enee_code: decode_station_id(raw.id.as_deref(), "id")?,
        long_name: normalize_name(long_name),
        short_name: normalize_name(raw.nome_breve.as_deref().unwrap_or(long_name)),
    })
}

/// Parse one line of the train-number autocomplete response.
///
/// Lines look like `2033 - TORINO PORTA NUOVA|2033-S00219-1731711600000`,
/// optionally with ` - 16/11/24` after the station name.
pub fn parse_train_search_line(line: &str) -> Result<TrainInfo, ConversionError> {
    let malformed = || ConversionError::Malformed(line.to_string());

    let (label, key) = line.trim().split_once('|').ok_or_else(malformed)?;
    let mut key_parts = key.split('-');
    let number = key_parts.next().ok_or_else(malformed)?;
    let station_id = key_parts.next().ok_or_else(malformed)?;
    let midnight_ms = key_parts.next().ok_or_else(malformed)?;

    let number: u32 = number.trim().parse().map_err(|_| ConversionError::InvalidValue {
        field: "number",
        value: number.to_string(),
    })?;
    let midnight_ms: i64 = midnight_ms
        .trim()
        .parse()
        .map_err(|_| ConversionError::InvalidValue {
            field: "departure date",
            value: midnight_ms.to_string(),
        })?;
    let departure_date = required_date(Some(midnight_ms), "departure date")?;

    let origin_name = label.split(" - ").nth(1).ok_or_else(malformed)?.trim();

    Ok(TrainInfo {
        number,
        origin: StationRef::new(EneeCode::parse(station_id)?, origin_name),
        departure_date,
    })
}

/// Parse the train-number autocomplete response, skipping bad lines.
pub fn parse_train_search(text: &str) -> Vec<TrainInfo> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_train_search_line(line) {
            Ok(info) => Some(info),
            Err(e) => {
                debug!(line, error = %e, "skipping train search line");
                None
            }
        })
        .collect()
}

/// Decode a solution time: local Italian time without an offset, or RFC 3339.
fn decode_local_time(raw: Option<&str>, field: &'static str) -> Result<RailTime, ConversionError> {
    let raw = raw.map(str::trim).ok_or(ConversionError::MissingField(field))?;
    let invalid = || ConversionError::InvalidValue {
        field,
        value: raw.to_string(),
    };
    if let Ok(local) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return RailTime::from_local(local).ok_or_else(invalid);
    }
    let instant = DateTime::parse_from_rfc3339(raw).map_err(|_| invalid())?;
    RailTime::from_epoch_ms(instant.timestamp_millis()).ok_or_else(invalid)
}

fn convert_vehicle(raw: &RawVehicle) -> Result<Vehicle, ConversionError> {
    let number = match raw.numero_treno.as_ref() {
        Some(RawNumber::Int(n)) => n.to_string(),
        Some(RawNumber::Text(s)) => {
            decode_text(Some(s)).ok_or(ConversionError::MissingField("numeroTreno"))?
        }
        None => return Err(ConversionError::MissingField("numeroTreno")),
    };
    let departure = decode_local_time(raw.orario_partenza.as_deref(), "orarioPartenza")?;
    let arrival = decode_local_time(raw.orario_arrivo.as_deref(), "orarioArrivo")?;
    if arrival < departure {
        return Err(ConversionError::InvalidValue {
            field: "orarioArrivo",
            value: format!("{arrival} before {departure}"),
        });
    }

    Ok(Vehicle {
        origin: normalize_name(raw.origine.as_deref().unwrap_or_default()),
        destination: normalize_name(raw.destinazione.as_deref().unwrap_or_default()),
        departure,
        arrival,
        category: decode_category(raw.categoria_descrizione.as_deref()),
        number,
    })
}

/// Convert one solution. A solution with no vehicles is malformed.
pub fn convert_travel_solution(raw: &RawSolution) -> Result<TravelSolution, ConversionError> {
    let vehicles = raw
        .vehicles
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(convert_vehicle)
        .collect::<Result<Vec<_>, _>>()?;
    if vehicles.is_empty() {
        return Err(ConversionError::MissingField("vehicles"));
    }
    Ok(TravelSolution { vehicles })
}

/// Convert a solutions response, keeping at most `limit` solutions.
///
/// A solution with any unusable vehicle is logged and skipped whole.
pub fn convert_travel_solutions(raw: &RawSolutions, limit: usize) -> TravelSolutions {
    let solutions = raw
        .soluzioni
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|solution| match convert_travel_solution(solution) {
            Ok(converted) => Some(converted),
            Err(e) => {
                warn!(error = %e, "skipping travel solution");
                None
            }
        })
        .take(limit)
        .collect();

    TravelSolutions {
        origin: normalize_name(raw.origine.as_deref().unwrap_or_default()),
        destination: normalize_name(raw.destinazione.as_deref().unwrap_or_default()),
        solutions,
    }
}
