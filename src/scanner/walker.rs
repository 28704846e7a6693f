//! Tree listing for either side of a mirror

use super::filter::filter_entries;
use super::pattern::Pattern;
use crate::transport::FileSystem;
use crate::types::{Entry, MirrorError};
use std::time::Instant;
use tracing::debug;

/// Check that `root` exists and is a directory
///
/// # Errors
/// * `MirrorError::RootMissing` if `root` cannot be stat'ed
/// * `MirrorError::NotADirectory` if it is something else
pub fn ensure_directory(fs: &dyn FileSystem, root: &str) -> Result<(), MirrorError> {
    match fs.stat(root) {
        Err(e) => {
            debug!(root, error = %e, "root stat failed");
            Err(MirrorError::RootMissing {
                path: root.to_string(),
            })
        }
        Ok(meta) if !meta.is_dir => Err(MirrorError::NotADirectory {
            path: root.to_string(),
        }),
        Ok(_) => Ok(()),
    }
}

/// Root-relative, `/`-separated form of `full`
///
/// Returns an empty string for the root itself. A root of `.` is treated as
/// an empty prefix because walked paths under it carry no `./` prefix.
pub fn relative_path(root: &str, full: &str) -> String {
    let rest = if root == "." {
        full
    } else {
        full.strip_prefix(root).unwrap_or(full)
    };
    rest.trim_start_matches(['/', '\\']).replace('\\', "/")
}

/// List every entry under `root`, filtered by `patterns` and sorted by path
///
/// Filtering runs on traversal order so excluded directories can prune their
/// subtrees; sorting happens afterwards with byte-wise string comparison.
///
/// # Errors
/// Fails when `root` is missing or not a directory, or when the root itself
/// cannot be read. Unreadable subdirectories are skipped with a warning.
pub fn list_tree(
    fs: &dyn FileSystem,
    root: &str,
    patterns: &[Pattern],
) -> Result<Vec<Entry>, MirrorError> {
    let start = Instant::now();
    ensure_directory(fs, root)?;

    let walked: Vec<Entry> = fs
        .walk(root)?
        .into_iter()
        .filter_map(|item| {
            let path = relative_path(root, &item.path);
            if path.is_empty() {
                return None;
            }
            Some(Entry {
                path,
                is_dir: item.metadata.is_dir,
                modified: item.metadata.modified,
                size: item.metadata.size,
            })
        })
        .collect();
    let walked_count = walked.len();

    let mut entries = filter_entries(walked, patterns);
    entries.sort_by(|a, b| a.path.cmp(&b.path));

    debug!(
        root,
        walked = walked_count,
        kept = entries.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "listed tree"
    );
    Ok(entries)
}
