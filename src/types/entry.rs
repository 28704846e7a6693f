//! Entry - One file or directory observed in a tree listing

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A file or directory under a mirrored root
///
/// Entries live for one run only: the lister creates them, the diff engine
/// consumes them, and nothing is persisted between invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Root-relative path, always `/`-separated, never empty
    pub path: String,

    /// Directory or not
    pub is_dir: bool,

    /// Last modification time
    pub modified: SystemTime,

    /// Size in bytes (meaningless for directories)
    pub size: u64,
}

impl Entry {
    /// Create an entry for a regular file
    pub fn file(path: impl Into<String>, size: u64, modified: SystemTime) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
            modified,
            size,
        }
    }

    /// Create an entry for a directory
    pub fn dir(path: impl Into<String>, modified: SystemTime) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
            modified,
            size: 0,
        }
    }

    /// Final path segment
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Modification time truncated to whole seconds since the Unix epoch
    ///
    /// Timestamps before the epoch round toward negative infinity so that
    /// truncation stays monotonic.
    pub fn modified_secs(&self) -> i64 {
        unix_seconds(self.modified)
    }

    /// Whether both entries describe the same kind of object
    pub fn same_kind(&self, other: &Entry) -> bool {
        self.is_dir == other.is_dir
    }
}

/// Whole seconds since the Unix epoch, floored
pub fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs() as i64,
        Err(before) => {
            let before: Duration = before.duration();
            let secs = before.as_secs() as i64;
            if before.subsec_nanos() > 0 {
                -secs - 1
            } else {
                -secs
            }
        }
    }
}
