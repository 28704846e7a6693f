//! Core type definitions for sftp-mirror

mod entry;
mod error;

pub use entry::{unix_seconds, Entry};
pub use error::MirrorError;
