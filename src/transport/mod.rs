//! File system capabilities used by the mirror engine
//!
//! The engine never talks to a disk or a network session directly. Both the
//! local tree and the remote tree are reached through [`FileSystem`], which is
//! implemented by [`LocalFs`] and [`SftpFs`].

pub mod local;
pub mod path;
pub mod sftp;

pub use local::LocalFs;
pub use sftp::SftpFs;

use crate::types::MirrorError;
use std::io::{Read, Write};
use std::time::SystemTime;

/// Metadata reported for a single path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    pub is_dir: bool,
    pub size: u64,
    pub modified: SystemTime,
}

/// One object found while walking a tree
///
/// `path` is the full path as the file system reports it, including the
/// walked root as a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: String,
    pub metadata: Metadata,
}

/// Blocking file system operations for one side of a mirror
pub trait FileSystem {
    /// Metadata for `path`, following symbolic links
    ///
    /// Only used to check the roots, so a root may be a link to a directory.
    fn stat(&self, path: &str) -> Result<Metadata, MirrorError>;

    /// All descendants of `root`, each directory reported before its contents
    ///
    /// The root itself is included or not at the implementation's choice;
    /// the lister discards it either way.
    fn walk(&self, root: &str) -> Result<Vec<DirEntry>, MirrorError>;

    /// Open a file for reading
    fn open(&self, path: &str) -> Result<Box<dyn Read + '_>, MirrorError>;

    /// Create or truncate a file for writing
    fn create(&self, path: &str) -> Result<Box<dyn Write + '_>, MirrorError>;

    /// Create a single directory; parents must already exist
    fn mkdir(&self, path: &str) -> Result<(), MirrorError>;

    /// Remove a file, or an empty directory; a symbolic link itself is removed
    fn remove(&self, path: &str) -> Result<(), MirrorError>;

    /// Set the modification time of `path`
    fn set_modified_time(&self, path: &str, modified: SystemTime) -> Result<(), MirrorError>;

    /// Join a root with a `/`-separated relative path
    fn join(&self, root: &str, relative: &str) -> String;
}
