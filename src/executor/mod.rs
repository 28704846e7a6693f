//! Executor module for remote operations

pub mod copy;

use crate::diff::SyncPlan;
use crate::transport::FileSystem;
use crate::types::{Entry, MirrorError};
use crate::ui::{ItemOutcome, Phase, Reporter};
use std::fmt;
use std::io::Write;
use tracing::{info, warn};

pub use copy::{copy_chunked, percent_complete, CHUNK_SIZE};

/// The two trees a plan is applied between
#[derive(Clone, Copy)]
pub struct Endpoints<'a> {
    /// Side files are read from
    pub local: &'a dyn FileSystem,
    pub local_root: &'a str,
    /// Side that is modified
    pub remote: &'a dyn FileSystem,
    pub remote_root: &'a str,
}

impl Endpoints<'_> {
    fn local_path(&self, entry: &Entry) -> String {
        self.local.join(self.local_root, &entry.path)
    }

    fn remote_path(&self, entry: &Entry) -> String {
        self.remote.join(self.remote_root, &entry.path)
    }
}

/// Succeeded and attempted counts for one phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub ok: usize,
    pub total: usize,
}

impl Tally {
    /// Items attempted but not completed
    pub fn failed(&self) -> usize {
        self.total - self.ok
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ok, self.total)
    }
}

/// Per-phase results of one execution
///
/// In simulate mode only the totals are filled; `ok` stays zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub created: Tally,
    pub updated: Tally,
    pub deleted: Tally,
}

impl SyncSummary {
    /// Failed items across all phases
    pub fn failed(&self) -> usize {
        self.created.failed() + self.updated.failed() + self.deleted.failed()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created {}, updated {}, deleted {}",
            self.created, self.updated, self.deleted
        )
    }
}

/// Apply a sync plan to the remote side
///
/// Phases run strictly in order: every deletion, then every creation, then
/// every update. Each item is attempted independently; a failure is reported,
/// logged and counted, and execution moves on to the next item.
///
/// With `simulate` set, items are reported but no transport call is made.
pub fn execute_plan(
    plan: &SyncPlan,
    endpoints: &Endpoints<'_>,
    simulate: bool,
    reporter: &mut dyn Reporter,
) -> SyncSummary {
    let summary = SyncSummary {
        deleted: run_phase(Phase::Delete, &plan.to_delete, endpoints, simulate, reporter),
        created: run_phase(Phase::Create, &plan.to_create, endpoints, simulate, reporter),
        updated: run_phase(Phase::Update, &plan.to_update, endpoints, simulate, reporter),
    };
    info!(%summary, simulate, "plan executed");
    summary
}

fn run_phase(
    phase: Phase,
    entries: &[Entry],
    endpoints: &Endpoints<'_>,
    simulate: bool,
    reporter: &mut dyn Reporter,
) -> Tally {
    let mut tally = Tally {
        ok: 0,
        total: entries.len(),
    };
    if entries.is_empty() {
        return tally;
    }

    info!(phase = phase.heading(), items = entries.len(), "phase started");
    reporter.phase_start(phase, entries.len());
    for entry in entries {
        reporter.item_start(phase, &entry.path);
        if simulate {
            reporter.item_end(ItemOutcome::Simulated);
            continue;
        }

        let result = match phase {
            Phase::Delete => endpoints.remote.remove(&endpoints.remote_path(entry)),
            Phase::Create | Phase::Update => apply_entry(entry, endpoints, reporter),
        };

        match result {
            Ok(()) => {
                tally.ok += 1;
                reporter.item_end(ItemOutcome::Done);
            }
            Err(err) => {
                warn!(path = %entry.path, error = %err, "{} failed", phase.verb());
                reporter.item_end(ItemOutcome::Failed(&err));
            }
        }
    }
    tally
}

fn apply_entry(
    entry: &Entry,
    endpoints: &Endpoints<'_>,
    reporter: &mut dyn Reporter,
) -> Result<(), MirrorError> {
    if entry.is_dir {
        return endpoints.remote.mkdir(&endpoints.remote_path(entry));
    }
    transfer_file(entry, endpoints, reporter)
}

fn transfer_file(
    entry: &Entry,
    endpoints: &Endpoints<'_>,
    reporter: &mut dyn Reporter,
) -> Result<(), MirrorError> {
    let remote_path = endpoints.remote_path(entry);
    let mut source = endpoints.local.open(&endpoints.local_path(entry))?;
    let mut destination = endpoints.remote.create(&remote_path)?;

    let written = copy_chunked(&mut *source, &mut *destination, entry.size, reporter)?;
    destination.flush()?;
    drop(destination);

    if written != entry.size {
        return Err(MirrorError::LengthMismatch {
            path: entry.path.clone(),
            expected: entry.size,
            actual: written,
        });
    }

    // The item counts as done once the content is written
    if let Err(err) = endpoints.remote.set_modified_time(&remote_path, entry.modified) {
        warn!(path = %entry.path, error = %err, "could not set remote modification time");
    }
    Ok(())
}
