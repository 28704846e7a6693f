//! Diff engine - Comparison logic and plan generation

mod compare;
mod engine;
mod plan;

pub use compare::{compare_entries, needs_update, UpdateReason};
pub use engine::{classify_remote, diff, RemoteOutcome};
pub use plan::{PlanStats, SyncPlan};
