//! Main sync command

use crate::config::{Config, RemoteTarget};
use crate::diff::{diff, SyncPlan};
use crate::executor::{execute_plan, Endpoints, SyncSummary};
use crate::scanner::{list_tree, FilterSet, Pattern};
use crate::transport::{FileSystem, LocalFs, SftpFs};
use crate::types::{Entry, MirrorError};
use crate::ui::{Reporter, ScanSpinner, TextReporter};
use indicatif::HumanBytes;
use tracing::info;

/// Run a mirror against the configured SFTP server
///
/// The local tree is validated and listed before any network I/O, so a
/// mistyped local path fails without a connection or password prompt.
pub fn run(config: &Config) -> Result<SyncSummary, MirrorError> {
    let filters = FilterSet::compile(&config.exclude, &config.ignore)?;
    let local_fs = LocalFs::new();
    // Listing checks the root, so this must stay ahead of connect
    let local = scan("local", &local_fs, config.local_root.as_str(), filters.local())?;

    let remote_fs = connect(&config.remote)?;
    let mut reporter = TextReporter::stdout(config.color);
    sync_remote(config, &local, &local_fs, &remote_fs, filters.remote(), &mut reporter)
}

/// Mirror between two arbitrary file systems
///
/// `config.local_root` is read through `local_fs` and `config.remote.path`
/// through `remote_fs`. The summary line is reported after a live run.
pub fn mirror(
    config: &Config,
    local_fs: &dyn FileSystem,
    remote_fs: &dyn FileSystem,
    reporter: &mut dyn Reporter,
) -> Result<SyncSummary, MirrorError> {
    let filters = FilterSet::compile(&config.exclude, &config.ignore)?;
    let local = scan("local", local_fs, config.local_root.as_str(), filters.local())?;
    sync_remote(config, &local, local_fs, remote_fs, filters.remote(), reporter)
}

fn connect(target: &RemoteTarget) -> Result<SftpFs, MirrorError> {
    info!(remote = %target, "connecting");
    SftpFs::connect(
        &target.host,
        target.port,
        &target.user,
        target.password.as_deref(),
        || rpassword::prompt_password(format!("Password for {}@{}: ", target.user, target.host)),
    )
}

fn sync_remote(
    config: &Config,
    local: &[Entry],
    local_fs: &dyn FileSystem,
    remote_fs: &dyn FileSystem,
    remote_patterns: &[Pattern],
    reporter: &mut dyn Reporter,
) -> Result<SyncSummary, MirrorError> {
    let remote = scan("remote", remote_fs, &config.remote.path, remote_patterns)?;

    let plan = diff(local, &remote);
    info!("{}", format_plan_preview(&plan));

    let endpoints = Endpoints {
        local: local_fs,
        local_root: config.local_root.as_str(),
        remote: remote_fs,
        remote_root: &config.remote.path,
    };
    let summary = execute_plan(&plan, &endpoints, config.simulate, reporter);
    if !config.simulate {
        reporter.summary(&summary);
    }
    Ok(summary)
}

fn scan(
    label: &'static str,
    fs: &dyn FileSystem,
    root: &str,
    patterns: &[Pattern],
) -> Result<Vec<Entry>, MirrorError> {
    let spinner = ScanSpinner::start(label);
    match list_tree(fs, root, patterns) {
        Ok(entries) => {
            spinner.finish(&entries);
            Ok(entries)
        }
        Err(err) => {
            spinner.abandon();
            Err(err)
        }
    }
}

fn format_plan_preview(plan: &SyncPlan) -> String {
    let stats = plan.stats();
    format!(
        "Plan: create {}, update {}, delete {} | {} to transfer",
        stats.create_count,
        stats.update_count,
        stats.delete_count,
        HumanBytes(stats.transfer_bytes)
    )
}
