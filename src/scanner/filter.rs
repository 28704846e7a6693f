//! Pattern-based pruning of walked entries

use super::pattern::Pattern;
use crate::types::Entry;
use tracing::trace;

/// Drop entries matched by any pattern, pruning whole excluded directories
///
/// `entries` must be in traversal order (each directory before its contents),
/// not sorted order. When a directory is excluded, everything after it that
/// lives under `<dir>/` is dropped without testing the patterns again.
pub fn filter_entries(entries: Vec<Entry>, patterns: &[Pattern]) -> Vec<Entry> {
    if patterns.is_empty() {
        return entries;
    }

    let capacity = entries.len();
    let (kept, _) = entries.into_iter().fold(
        (Vec::with_capacity(capacity), None::<String>),
        |(mut kept, excluded_dir), entry| {
            if let Some(prefix) = &excluded_dir {
                if entry.path.starts_with(prefix.as_str()) {
                    return (kept, excluded_dir);
                }
            }

            match patterns.iter().find(|p| p.matches(&entry.path)) {
                Some(pattern) => {
                    trace!(path = %entry.path, pattern = pattern.as_str(), "excluded");
                    let excluded_dir = if entry.is_dir {
                        Some(format!("{}/", entry.path))
                    } else {
                        excluded_dir
                    };
                    (kept, excluded_dir)
                }
                None => {
                    kept.push(entry);
                    (kept, excluded_dir)
                }
            }
        },
    );

    kept
}
