//! Disk cache for the station list.
//!
//! The list is a CSV file with the header `station_id,long_name,short_name`.
//! Its age is the file's modification time.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::domain::{EneeCode, StationRecord};

use super::error::StationError;

/// Default cache TTL: 7 days.
const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Default file name, relative to the working directory.
pub const DEFAULT_STATIONS_FILE: &str = "stations.csv";

/// One CSV row.
#[derive(Debug, Serialize, Deserialize)]
struct StationRow {
    station_id: String,
    long_name: String,
    short_name: String,
}

impl From<&StationRecord> for StationRow {
    fn from(record: &StationRecord) -> Self {
        Self {
            station_id: record.enee_code.to_prefixed_id(),
            long_name: record.long_name.clone(),
            short_name: record.short_name.clone(),
        }
    }
}

impl TryFrom<StationRow> for StationRecord {
    type Error = StationError;

    fn try_from(row: StationRow) -> Result<Self, Self::Error> {
        Ok(StationRecord {
            enee_code: EneeCode::parse(&row.station_id)?,
            long_name: row.long_name,
            short_name: row.short_name,
        })
    }
}

/// Write station records as CSV.
pub fn write_csv<W: Write>(writer: W, records: &[StationRecord]) -> Result<(), StationError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(StationRow::from(record))?;
    }
    csv_writer.flush().map_err(|e| StationError::Cache {
        message: format!("failed to flush station list: {e}"),
    })?;
    Ok(())
}

/// Read station records from CSV.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<StationRecord>, StationError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<StationRow>()
        .map(|row| StationRecord::try_from(row?))
        .collect()
}

/// Configuration for the station disk cache.
#[derive(Debug, Clone)]
pub struct StationCacheConfig {
    /// Path to the CSV file.
    pub path: PathBuf,
    /// How long the file remains valid.
    pub ttl: Duration,
}

impl StationCacheConfig {
    /// Create a new cache config with the given path and default TTL (7 days).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for StationCacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STATIONS_FILE)
    }
}

/// Disk cache for the station list.
#[derive(Debug, Clone)]
pub struct StationCache {
    config: StationCacheConfig,
}

impl StationCache {
    pub fn new(config: StationCacheConfig) -> Self {
        Self { config }
    }

    /// Whether the file exists and is younger than the TTL.
    pub fn is_fresh(&self) -> bool {
        let Ok(modified) = std::fs::metadata(&self.config.path).and_then(|m| m.modified()) else {
            return false;
        };

        // A modification time in the future counts as brand new
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        age < self.config.ttl
    }

    /// Load the station list if the file is fresh and readable.
    ///
    /// Returns `None` if the file doesn't exist, is invalid, or has expired.
    pub fn load(&self) -> Option<Vec<StationRecord>> {
        if !self.is_fresh() {
            return None;
        }
        self.load_stale().ok()
    }

    /// Load the station list regardless of age.
    pub fn load_stale(&self) -> Result<Vec<StationRecord>, StationError> {
        let file = std::fs::File::open(&self.config.path).map_err(|e| StationError::Cache {
            message: format!("failed to open {}: {e}", self.config.path.display()),
        })?;
        read_csv(file)
    }

    /// Save the station list.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, records: &[StationRecord]) -> Result<(), StationError> {
        if let Some(parent) = self.config.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StationError::Cache {
                message: format!("failed to create cache directory: {e}"),
            })?;
        }

        let file = std::fs::File::create(&self.config.path).map_err(|e| StationError::Cache {
            message: format!("failed to write cache file: {e}"),
        })?;
        write_csv(file, records)
    }

    /// Get the cache file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the cache TTL.
    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(code: u32, long: &str, short: &str) -> StationRecord {
        StationRecord {
            enee_code: EneeCode::new(code).unwrap(),
            long_name: long.to_string(),
            short_name: short.to_string(),
        }
    }

    fn sample() -> Vec<StationRecord> {
        vec![
            record(5997, "BOLOGNA CENTRALE", "Bologna C.le"),
            record(1700, "MILANO CENTRALE", "Milano C.le"),
        ]
    }

    #[test]
    fn csv_layout() {
        let mut out = Vec::new();
        write_csv(&mut out, &sample()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("station_id,long_name,short_name"));
        assert_eq!(lines.next(), Some("S05997,BOLOGNA CENTRALE,Bologna C.le"));
        assert_eq!(lines.next(), Some("S01700,MILANO CENTRALE,Milano C.le"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn csv_quotes_commas() {
        let records = vec![record(8409, "ROMA, TERMINI", "Roma T.")];
        let mut out = Vec::new();
        write_csv(&mut out, &records).unwrap();
        let back = read_csv(out.as_slice()).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn read_rejects_bad_station_id() {
        let text = "station_id,long_name,short_name\nXYZ,NOWHERE,Nowhere\n";
        let err = read_csv(text.as_bytes()).unwrap_err();
        assert!(matches!(err, StationError::Record(_)));
    }

    #[test]
    fn save_and_load_cache() {
        let dir = tempdir().unwrap();
        let cache = StationCache::new(StationCacheConfig::new(dir.path().join("stations.csv")));

        cache.save(&sample()).unwrap();

        let loaded = cache.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].enee_code.value(), 5997);
        assert_eq!(loaded[1].long_name, "MILANO CENTRALE");
    }

    #[test]
    fn expired_cache_returns_none() {
        let dir = tempdir().unwrap();
        let config =
            StationCacheConfig::new(dir.path().join("stations.csv")).with_ttl(Duration::ZERO);
        let cache = StationCache::new(config);

        cache.save(&sample()).unwrap();

        // With 0 TTL, cache should immediately be expired
        assert!(!cache.is_fresh());
        assert!(cache.load().is_none());
        assert_eq!(cache.load_stale().unwrap().len(), 2);
    }

    #[test]
    fn missing_cache_returns_none() {
        let cache = StationCache::new(StationCacheConfig::new("/nonexistent/path/stations.csv"));

        assert!(!cache.is_fresh());
        assert!(cache.load().is_none());
        assert!(cache.load_stale().is_err());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("stations.csv");
        let cache = StationCache::new(StationCacheConfig::new(&path));

        cache.save(&sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn default_config() {
        let config = StationCacheConfig::default();
        assert_eq!(config.path, PathBuf::from(DEFAULT_STATIONS_FILE));
        assert_eq!(config.ttl, DEFAULT_TTL);
    }
}
