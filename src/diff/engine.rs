//! Three-way diff between sorted local and remote listings

use super::compare::compare_entries;
use super::plan::SyncPlan;
use crate::types::Entry;
use tracing::{debug, trace};

/// What happens to one remote entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOutcome {
    /// Same path and kind exist locally
    Unchanged,
    /// No local entry at this path
    Deleted,
    /// Local entry at this path is of the other kind (file vs directory);
    /// removed first, then created again from the local side
    RecreateAfterKindChange,
}

impl RemoteOutcome {
    /// True if the remote entry will be removed
    pub fn is_deleted(self) -> bool {
        !matches!(self, RemoteOutcome::Unchanged)
    }
}

fn find(entries: &[Entry], path: &str) -> Option<usize> {
    entries
        .binary_search_by(|e| e.path.as_str().cmp(path))
        .ok()
}

/// Classify each remote entry against the local listing
///
/// Both slices must be sorted ascending by `path`. The result is index-aligned
/// with `remote`.
pub fn classify_remote(local: &[Entry], remote: &[Entry]) -> Vec<RemoteOutcome> {
    remote
        .iter()
        .map(|r| match find(local, &r.path) {
            None => RemoteOutcome::Deleted,
            Some(i) if !local[i].same_kind(r) => RemoteOutcome::RecreateAfterKindChange,
            Some(_) => RemoteOutcome::Unchanged,
        })
        .collect()
}

/// Compute the plan that makes `remote` match `local`
///
/// Both listings must be sorted ascending by `path` with byte-wise
/// comparison, as produced by `scanner::list_tree`.
///
/// # Example
/// ```
/// use sftp_mirror::diff::diff;
/// use sftp_mirror::types::Entry;
/// use std::time::{Duration, UNIX_EPOCH};
///
/// let t = |s| UNIX_EPOCH + Duration::from_secs(s);
/// let local = vec![Entry::dir("a", t(100)), Entry::file("a/x.txt", 10, t(100))];
/// let remote = vec![Entry::file("a", 3, t(50))];
///
/// let plan = diff(&local, &remote);
/// assert_eq!(plan.to_delete[0].path, "a");
/// assert_eq!(plan.to_create.len(), 2);
/// assert!(plan.to_update.is_empty());
/// ```
pub fn diff(local: &[Entry], remote: &[Entry]) -> SyncPlan {
    let outcomes = classify_remote(local, remote);
    let mut plan = SyncPlan::new();

    // Descending: children are removed before their parents
    plan.to_delete = remote
        .iter()
        .zip(&outcomes)
        .rev()
        .filter(|(_, outcome)| outcome.is_deleted())
        .map(|(entry, _)| entry.clone())
        .collect();

    for entry in local {
        match find(remote, &entry.path) {
            None => plan.to_create.push(entry.clone()),
            Some(i) if outcomes[i] == RemoteOutcome::RecreateAfterKindChange => {
                plan.to_create.push(entry.clone());
            }
            Some(_) if entry.is_dir => {}
            Some(i) => {
                if let Some(reason) = compare_entries(entry, &remote[i]) {
                    trace!(path = %entry.path, ?reason, "update");
                    plan.to_update.push(entry.clone());
                }
            }
        }
    }

    debug!(
        deleted = plan.to_delete.len(),
        created = plan.to_create.len(),
        updated = plan.to_update.len(),
        "diff complete"
    );
    plan
}
