//! Single-value timestamp records
//!
//! Each durable record holds exactly one ISO-8601 timestamp and is fully
//! overwritten on every update. The `TimestampRecord` trait keeps the
//! backend pluggable:
//! - `FileRecord`: plain text file, the production backend
//! - `InMemoryRecord`: volatile store for tests and dry runs

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, NaiveDateTime, Utc};

/// Write format: naive UTC with microseconds, e.g. `2024-01-01T00:02:00.000000`.
const WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Accepted naive formats; `%.f` also matches a missing fraction.
const READ_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Trait for durable single-timestamp records
///
/// Implementations must be thread-safe (Send + Sync) since the receiver
/// and the monitor touch records from different tasks.
pub trait TimestampRecord: Send + Sync {
    /// Read the stored value. `Ok(None)` means the record does not exist.
    fn load(&self) -> Result<Option<DateTime<Utc>>, RecordError>;

    /// Overwrite the stored value.
    fn store(&self, at: DateTime<Utc>) -> Result<(), RecordError>;

    /// Human-readable location for logging
    fn describe(&self) -> String;
}

/// Record errors
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid timestamp {raw:?} in {path}")]
    Parse { path: String, raw: String },
}

/// Render a timestamp the way records and API responses carry it.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.naive_utc().format(WRITE_FORMAT).to_string()
}

/// Parse record text. Naive values are taken as UTC; values carrying an
/// offset are converted.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in READ_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ============================================================================
// File backend
// ============================================================================

/// Record stored as a text file
#[derive(Debug, Clone)]
pub struct FileRecord {
    path: PathBuf,
}

impl FileRecord {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> RecordError {
        RecordError::Io {
            path: self.describe(),
            source,
        }
    }
}

impl TimestampRecord for FileRecord {
    fn load(&self) -> Result<Option<DateTime<Utc>>, RecordError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        parse_timestamp(&raw).map(Some).ok_or_else(|| RecordError::Parse {
            path: self.describe(),
            raw: raw.trim().to_string(),
        })
    }

    fn store(&self, at: DateTime<Utc>) -> Result<(), RecordError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        std::fs::write(&self.path, format_timestamp(at)).map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), "Record updated");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// In-memory record holding the raw text, so corrupt content can be staged.
///
/// Not durable: data is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryRecord {
    raw: RwLock<Option<String>>,
    name: String,
}

impl InMemoryRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            raw: RwLock::new(None),
            name: name.into(),
        }
    }

    /// Replace the stored text verbatim.
    pub fn set_raw(&self, raw: impl Into<String>) {
        let mut guard = self.raw.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(raw.into());
    }

    /// Current stored text, if any.
    pub fn raw(&self) -> Option<String> {
        self.raw.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl TimestampRecord for InMemoryRecord {
    fn load(&self) -> Result<Option<DateTime<Utc>>, RecordError> {
        match self.raw() {
            None => Ok(None),
            Some(raw) => parse_timestamp(&raw).map(Some).ok_or(RecordError::Parse {
                path: self.describe(),
                raw,
            }),
        }
    }

    fn store(&self, at: DateTime<Utc>) -> Result<(), RecordError> {
        self.set_raw(format_timestamp(at));
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory:{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_absent() {
        let dir = tempdir().unwrap();
        let record = FileRecord::new(dir.path().join("last_ping.txt"));
        assert!(record.load().unwrap().is_none());
    }

    #[test]
    fn test_store_overwrites_and_reloads() {
        let dir = tempdir().unwrap();
        let record = FileRecord::new(dir.path().join("last_ping.txt"));

        let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 0).unwrap()
            + chrono::Duration::microseconds(123_456);
        record.store(first).unwrap();
        record.store(second).unwrap();

        let contents = std::fs::read_to_string(record.path()).unwrap();
        assert_eq!(contents, "2024-01-01T00:05:00.123456");
        assert_eq!(record.load().unwrap(), Some(second));
    }

    #[test]
    fn test_store_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let record = FileRecord::new(dir.path().join("nested/state/last_alert.txt"));
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        record.store(at).unwrap();
        assert_eq!(record.load().unwrap(), Some(at));
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("last_alert.txt");
        std::fs::write(&path, "not a timestamp").unwrap();

        let err = FileRecord::new(&path).load().unwrap_err();
        assert!(matches!(err, RecordError::Parse { ref raw, .. } if raw == "not a timestamp"));
    }

    #[test]
    fn test_directory_in_place_of_file_is_io_error() {
        let dir = tempdir().unwrap();
        let record = FileRecord::new(dir.path());
        assert!(matches!(record.load(), Err(RecordError::Io { .. })));
    }

    #[test]
    fn test_parse_accepts_common_iso_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-01T00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T00:00:00.000000\n"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T01:00:00+01:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_in_memory_record_stages_raw_text() {
        let record = InMemoryRecord::new("alert");
        assert!(record.load().unwrap().is_none());

        record.set_raw("garbage");
        assert!(matches!(record.load(), Err(RecordError::Parse { .. })));

        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        record.store(at).unwrap();
        assert_eq!(record.raw().as_deref(), Some("2024-01-01T00:00:00.000000"));
        assert_eq!(record.load().unwrap(), Some(at));
    }

    #[test]
    fn test_trait_object() {
        let record: Box<dyn TimestampRecord> = Box::new(InMemoryRecord::new("ping"));
        assert_eq!(record.describe(), "memory:ping");
    }
}
