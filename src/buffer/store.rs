//! On-disk snapshot of not-yet-persisted readings.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use tracing::warn;

use crate::buffer::Entry;
use crate::error::Result;

/// Durable buffer backed by a line-oriented snapshot file.
///
/// `save` always rewrites the complete file; the contents are therefore
/// never an append log, they are the exact set of readings still owed to
/// the remote store. A missing file and an empty file mean the same thing.
///
/// The file is owned by a single process instance. Concurrent runs are not
/// supported and must be prevented by the scheduler invoking the program.
pub struct DurableBuffer {
    path: PathBuf,
    tz: Tz,
}

impl DurableBuffer {
    /// Create a buffer over an explicit file path.
    pub fn new(path: impl Into<PathBuf>, tz: Tz) -> Self {
        Self {
            path: path.into(),
            tz,
        }
    }

    /// Create a buffer at the fixed location next to the executable.
    ///
    /// The location is deliberately not configurable: a crashed run and its
    /// successor must agree on it without consulting anything else.
    pub fn at_default_location(tz: Tz) -> Result<Self> {
        let exe = std::env::current_exe()?;
        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self::new(dir.join(crate::BUFFER_FILE_NAME), tz))
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all buffered readings, oldest first.
    ///
    /// A missing file is an empty buffer, not an error. Malformed lines are
    /// logged and skipped; they never abort the rest of the file.
    pub fn load(&self) -> Result<Vec<Entry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        let mut entries = Vec::new();
        for (number, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match Entry::decode(line, self.tz) {
                Ok(entry) => entries.push(entry),
                Err(err) => warn!("skipping malformed buffer line {}: {}", number + 1, err),
            }
        }

        Ok(entries)
    }

    /// Replace the buffer contents with `entries`, in order.
    ///
    /// The new snapshot is written to a sibling temp file and renamed over
    /// the target, so a crash mid-write leaves either the old or the new
    /// complete contents.
    pub fn save(&self, entries: &[Entry]) -> Result<()> {
        let mut contents = String::new();
        for entry in entries {
            contents.push_str(&entry.encode());
            contents.push('\n');
        }

        let tmp = self.path.with_extension("csv.tmp");
        let mut file = File::create(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}
