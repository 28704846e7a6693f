//! File comparison logic

use crate::types::Entry;

/// Why a file present on both sides must be transferred again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateReason {
    /// Local copy is newer (whole-second comparison)
    Newer,
    /// Sizes differ; timestamps may agree
    SizeChanged,
}

/// Compare a local file with its remote counterpart
///
/// Metadata only:
/// 1. Local modification time later than remote, truncated to whole seconds
///    so sub-second precision differences between the two sides do not count
/// 2. Sizes differ
///
/// A remote copy that is newer but the same size is left alone.
pub fn compare_entries(local: &Entry, remote: &Entry) -> Option<UpdateReason> {
    if local.modified_secs() > remote.modified_secs() {
        Some(UpdateReason::Newer)
    } else if local.size != remote.size {
        Some(UpdateReason::SizeChanged)
    } else {
        None
    }
}

/// True if `remote` must be overwritten with `local`
pub fn needs_update(local: &Entry, remote: &Entry) -> bool {
    compare_entries(local, remote).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn file(size: u64, millis: u64) -> Entry {
        Entry::file("f.txt", size, UNIX_EPOCH + Duration::from_millis(millis))
    }

    #[test]
    fn test_newer_local_triggers_update() {
        assert_eq!(
            compare_entries(&file(5, 200_000), &file(5, 100_000)),
            Some(UpdateReason::Newer)
        );
    }

    #[test]
    fn test_size_change_triggers_update() {
        assert_eq!(
            compare_entries(&file(5, 100_000), &file(7, 100_000)),
            Some(UpdateReason::SizeChanged)
        );
    }

    #[test]
    fn test_subsecond_difference_is_ignored() {
        assert!(!needs_update(&file(5, 100_900), &file(5, 100_000)));
    }

    #[test]
    fn test_newer_remote_same_size_is_kept() {
        assert!(!needs_update(&file(5, 100_000), &file(5, 300_000)));
    }

    #[test]
    fn test_newer_remote_different_size_is_updated() {
        assert!(needs_update(&file(5, 100_000), &file(6, 300_000)));
    }
}
