//! Sync plan types

use crate::types::Entry;

/// Work computed by the diff engine for one run
///
/// The three lists are disjoint by entry. `to_delete` is in descending path
/// order so children are removed before their parents; `to_create` and
/// `to_update` are ascending so parents are created before their children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// Remote entries to remove
    pub to_delete: Vec<Entry>,

    /// Local entries missing remotely, or whose remote counterpart changed kind
    pub to_create: Vec<Entry>,

    /// Local files whose remote copy is older or differently sized
    pub to_update: Vec<Entry>,
}

impl SyncPlan {
    /// Create an empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// True if there is nothing to do
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_create.is_empty() && self.to_update.is_empty()
    }

    /// Total number of planned items
    pub fn len(&self) -> usize {
        self.to_delete.len() + self.to_create.len() + self.to_update.len()
    }

    /// Aggregate statistics
    pub fn stats(&self) -> PlanStats {
        let transfer_bytes = self
            .to_create
            .iter()
            .chain(&self.to_update)
            .filter(|e| !e.is_dir)
            .map(|e| e.size)
            .sum();

        PlanStats {
            create_count: self.to_create.len(),
            update_count: self.to_update.len(),
            delete_count: self.to_delete.len(),
            transfer_bytes,
        }
    }
}

/// Statistics about a sync plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanStats {
    pub create_count: usize,
    pub update_count: usize,
    pub delete_count: usize,

    /// Bytes of file content to send (creates + updates)
    pub transfer_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    #[test]
    fn test_new_plan_is_empty() {
        let plan = SyncPlan::new();
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
        assert_eq!(plan.stats(), PlanStats::default());
    }

    #[test]
    fn test_stats_count_only_file_bytes() {
        let plan = SyncPlan {
            to_delete: vec![Entry::file("old.txt", 999, UNIX_EPOCH)],
            to_create: vec![
                Entry::dir("dir", UNIX_EPOCH),
                Entry::file("dir/new.txt", 1000, UNIX_EPOCH),
            ],
            to_update: vec![Entry::file("changed.txt", 24, UNIX_EPOCH)],
        };

        let stats = plan.stats();
        assert_eq!(stats.create_count, 2);
        assert_eq!(stats.update_count, 1);
        assert_eq!(stats.delete_count, 1);
        assert_eq!(stats.transfer_bytes, 1024);
        assert_eq!(plan.len(), 4);
        assert!(!plan.is_empty());
    }
}
