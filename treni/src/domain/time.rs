//! Real-time instants for the Italian network.
//!
//! Upstream reports every time as Unix epoch milliseconds. Display and
//! calendar arithmetic always happen in the `Europe/Rome` zone, which is
//! what every station clock in the network shows.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Europe::Rome;
use chrono_tz::Tz;

/// Format upstream expects for the board query path argument.
const BOARD_QUERY_FORMAT: &str = "%a %b %d %Y %H:%M:%S";

/// An instant reported by the upstream service.
///
/// # Examples
///
/// ```
/// use treni::domain::RailTime;
///
/// let t = RailTime::from_epoch_ms(1_700_000_000_000).unwrap();
/// assert_eq!(t.to_string(), "23:13");
/// assert_eq!(t.epoch_ms(), 1_700_000_000_000);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RailTime(DateTime<Utc>);

impl RailTime {
    /// Build from epoch milliseconds. Returns `None` outside chrono's range.
    pub fn from_epoch_ms(ms: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(ms).map(Self)
    }

    /// Build from a wall-clock time in Rome.
    ///
    /// Ambiguous times (the repeated hour in October) resolve to the
    /// earlier instant; nonexistent times (the skipped hour in March)
    /// return `None`.
    pub fn from_local(local: NaiveDateTime) -> Option<Self> {
        Rome.from_local_datetime(&local)
            .earliest()
            .map(|t| Self(t.with_timezone(&Utc)))
    }

    pub fn epoch_ms(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// The instant as seen on a Rome clock.
    pub fn local(&self) -> DateTime<Tz> {
        self.0.with_timezone(&Rome)
    }

    /// Calendar date in Rome.
    pub fn date(&self) -> NaiveDate {
        self.local().date_naive()
    }

    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        self.0.checked_add_signed(duration).map(Self)
    }

    /// Add a whole number of minutes, as used for estimated times.
    pub fn plus_minutes(&self, minutes: i64) -> Option<Self> {
        self.checked_add(Duration::minutes(minutes))
    }

    pub fn signed_duration_since(&self, other: RailTime) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// RFC 3339 with the Rome offset, e.g. `2024-01-15T08:00:00+01:00`.
    pub fn to_rfc3339(&self) -> String {
        self.local().to_rfc3339()
    }
}

impl fmt::Debug for RailTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RailTime({})", self.local().format("%Y-%m-%d %H:%M:%S %Z"))
    }
}

impl fmt::Display for RailTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.local().format("%H:%M"))
    }
}

/// Epoch milliseconds of local midnight at the start of `date`.
///
/// The train progress endpoint identifies a journey by this value.
pub fn midnight_epoch_ms(date: NaiveDate) -> Option<i64> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    RailTime::from_local(midnight).map(|t| t.epoch_ms())
}

/// Format a Rome wall-clock time for the board query path argument.
pub fn board_query_time(at: &DateTime<Tz>) -> String {
    at.format(BOARD_QUERY_FORMAT).to_string()
}

/// Current time in Rome.
pub fn now_local() -> DateTime<Tz> {
    Utc::now().with_timezone(&Rome)
}
