//! Tracing setup for the command line tool
//!
//! Logs go to stderr so they never interleave with the per-item report on
//! stdout.

use crate::types::MirrorError;
use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level directive for a `-v` count (0=warn, 1=info, 2=debug, 3+=trace)
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize the global subscriber
///
/// `RUST_LOG` overrides the level derived from `verbosity`. Fails if a
/// subscriber is already installed.
pub fn init_logging(verbosity: u8) -> Result<(), MirrorError> {
    let level = level_for(verbosity);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sftp_mirror={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(verbosity >= 2)
                .with_file(verbosity >= 3)
                .with_line_number(verbosity >= 3),
        )
        .try_init()
        .map_err(|e| MirrorError::Io(io::Error::other(e.to_string())))
}
