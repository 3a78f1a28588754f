//! The buffered reading record and its line codec.

use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// `strftime` format for buffered timestamps. Second resolution is the
/// floor for the whole pipeline.
pub const TIMESTAMP_FORMAT: &str = "%m-%d-%Y %H:%M:%S";

/// One timestamped temperature reading.
///
/// Immutable once constructed; an entry has no identity beyond its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// When the reading was captured, in the configured timezone
    pub timestamp: DateTime<Tz>,
    /// Temperature in degrees Fahrenheit
    pub temperature: f64,
}

/// Why a buffer line failed to decode.
///
/// Recoverable: the caller logs the line and keeps going with the rest of
/// the file.
#[derive(Debug, thiserror::Error)]
pub enum EntryParseError {
    /// The line did not split into `timestamp,temperature`
    #[error("expected `timestamp,temperature` but found {0} field(s)")]
    FieldCount(usize),

    /// The timestamp field did not parse, or names a local time that does
    /// not exist in the configured timezone
    #[error("invalid timestamp `{0}`")]
    Timestamp(String),

    /// The temperature field did not parse as a float
    #[error("invalid temperature `{0}`")]
    Temperature(String),
}

impl Entry {
    /// Create a new entry.
    pub fn new(timestamp: DateTime<Tz>, temperature: f64) -> Self {
        Self {
            timestamp,
            temperature,
        }
    }

    /// Render this entry as a buffer line: `MM-DD-YYYY HH:MM:SS,<temp>`.
    ///
    /// The temperature is printed with the shortest representation that
    /// parses back to the identical float.
    pub fn encode(&self) -> String {
        format!(
            "{},{:?}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.temperature
        )
    }

    /// Parse a buffer line produced by [`Entry::encode`].
    ///
    /// The timestamp is interpreted in `tz`. Ambiguous local times resolve
    /// to the earlier instant; local times skipped by a daylight-saving
    /// transition fail to parse.
    pub fn decode(line: &str, tz: Tz) -> std::result::Result<Self, EntryParseError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 2 {
            return Err(EntryParseError::FieldCount(fields.len()));
        }

        let naive = NaiveDateTime::parse_from_str(fields[0], TIMESTAMP_FORMAT)
            .map_err(|_| EntryParseError::Timestamp(fields[0].to_string()))?;
        let timestamp = tz
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| EntryParseError::Timestamp(fields[0].to_string()))?;

        let temperature: f64 = fields[1]
            .trim()
            .parse()
            .map_err(|_| EntryParseError::Temperature(fields[1].to_string()))?;

        Ok(Self {
            timestamp,
            temperature,
        })
    }
}
