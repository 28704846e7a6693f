//! # sftp-mirror - One-way directory mirroring over SFTP
//!
//! Local wins, remote follows.
//!
//! Lists a local tree and a remote tree, computes what must be deleted,
//! created and re-sent to make the remote side identical to the local one,
//! and applies that plan over an SFTP session.

// Module declarations
pub mod commands;
pub mod config;
pub mod diff;
pub mod executor;
pub mod logging;
pub mod scanner;
pub mod transport;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::{Config, RemoteTarget};
pub use diff::SyncPlan;
pub use executor::SyncSummary;
pub use types::{Entry, MirrorError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
