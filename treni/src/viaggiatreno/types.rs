//! ViaggiaTreno response DTOs.
//!
//! These types map directly to the upstream JSON. Field names are the
//! literal Italian keys. Every field is optional because upstream sends
//! `null`, omits keys, or changes types between trains without notice.

use serde::Deserialize;

/// An upstream response body.
///
/// Upstream answers with JSON for most endpoints and with plain text for
/// autocomplete endpoints and for "no data" replies, decided by the
/// response content type.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    Json(serde_json::Value),
    Text(String),
}

impl RawResponse {
    /// True for an empty text body, `null`, or an empty JSON object or array.
    pub fn is_empty(&self) -> bool {
        match self {
            RawResponse::Text(text) => text.trim().is_empty(),
            RawResponse::Json(serde_json::Value::Null) => true,
            RawResponse::Json(serde_json::Value::Object(map)) => map.is_empty(),
            RawResponse::Json(serde_json::Value::Array(items)) => items.is_empty(),
            RawResponse::Json(_) => false,
        }
    }
}

/// A train number, which upstream sends as either a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Int(i64),
    Text(String),
}

impl RawNumber {
    /// Numeric value, if the text form is a plain integer.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            RawNumber::Int(n) => u32::try_from(*n).ok(),
            RawNumber::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Response of `andamentoTreno/{origin}/{number}/{midnight_ms}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTrainProgress {
    pub numero_treno: Option<RawNumber>,

    /// Category code, e.g. `"REG"`, `"FR"`. Sometimes padded with spaces.
    pub categoria: Option<String>,

    pub origine: Option<String>,
    pub id_origine: Option<String>,
    pub destinazione: Option<String>,
    pub id_destinazione: Option<String>,

    /// Midnight of the departure day, epoch ms.
    pub data_partenza_treno: Option<i64>,
    pub orario_partenza: Option<i64>,
    pub orario_arrivo: Option<i64>,

    /// True until the train leaves its origin.
    pub non_partito: Option<bool>,

    /// Minutes late. Negative when early.
    pub ritardo: Option<i64>,

    pub ora_ultimo_rilevamento: Option<i64>,

    /// Station of the last report, `"--"` when none.
    pub stazione_ultimo_rilevamento: Option<String>,

    pub cambi_numero: Option<Vec<RawNumberChange>>,

    /// Free-text service notice.
    pub sub_title: Option<String>,
    pub motivo_ritardo_prevalente: Option<String>,

    pub fermate: Option<Vec<RawStop>>,
}

/// Entry of `cambiNumero`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNumberChange {
    pub nuovo_numero_treno: Option<RawNumber>,
    pub stazione: Option<String>,
}

/// Entry of `fermate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawStop {
    /// Prefixed station id, e.g. `"S01700"`.
    pub id: Option<String>,
    pub stazione: Option<String>,

    /// `"P"` origin, `"F"` intermediate, `"A"` destination.
    pub tipo_fermata: Option<String>,

    #[serde(rename = "arrivo_teorico")]
    pub arrivo_teorico: Option<i64>,
    pub arrivo_reale: Option<i64>,
    #[serde(rename = "partenza_teorica")]
    pub partenza_teorica: Option<i64>,
    pub partenza_reale: Option<i64>,

    pub binario_programmato_arrivo_descrizione: Option<String>,
    pub binario_effettivo_arrivo_descrizione: Option<String>,
    pub binario_programmato_partenza_descrizione: Option<String>,
    pub binario_effettivo_partenza_descrizione: Option<String>,
}

/// Entry of a `partenze` or `arrivi` board.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawBoardEntry {
    pub categoria_descrizione: Option<String>,
    pub numero_treno: Option<RawNumber>,

    /// Prefixed id of the train's origin station.
    pub cod_origine: Option<String>,

    /// Set on departure boards.
    pub destinazione: Option<String>,
    /// Set on arrival boards.
    pub origine: Option<String>,

    pub data_partenza_treno: Option<i64>,
    pub orario_partenza: Option<i64>,
    pub orario_arrivo: Option<i64>,
    pub non_partito: Option<bool>,
    pub in_stazione: Option<bool>,
    pub ritardo: Option<i64>,
    pub sub_title: Option<String>,

    pub binario_programmato_arrivo_descrizione: Option<String>,
    pub binario_effettivo_arrivo_descrizione: Option<String>,
    pub binario_programmato_partenza_descrizione: Option<String>,
    pub binario_effettivo_partenza_descrizione: Option<String>,
}

/// Response of `statistiche/{now_ms}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawStats {
    pub treni_giorno: Option<u64>,
    pub treni_circolanti: Option<u64>,
    pub ultimo_aggiornamento: Option<i64>,
}

/// Entry of `cercaStazione/{prefix}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawStation {
    pub id: Option<String>,
    pub nome_lungo: Option<String>,
    pub nome_breve: Option<String>,
}

/// Response of `soluzioniViaggioNew/{origin}/{destination}/{local_iso}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSolutions {
    pub origine: Option<String>,
    pub destinazione: Option<String>,
    pub soluzioni: Option<Vec<RawSolution>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSolution {
    /// `"HH:MM"`; recomputed from the vehicles instead.
    pub durata: Option<String>,
    pub vehicles: Option<Vec<RawVehicle>>,
}

/// Times are local ISO strings without an offset, e.g. `"2024-01-15T08:00:00"`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawVehicle {
    pub origine: Option<String>,
    pub destinazione: Option<String>,
    pub orario_partenza: Option<String>,
    pub orario_arrivo: Option<String>,
    pub categoria_descrizione: Option<String>,
    pub numero_treno: Option<RawNumber>,
}
