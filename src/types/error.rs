//! Error types for sftp-mirror

use thiserror::Error;

/// Error types for mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or command line
    #[error("{0}")]
    Config(String),

    /// A sync root could not be found
    #[error("{path} does not exist")]
    RootMissing { path: String },

    /// A sync root exists but is not a directory
    #[error("{path} is not a directory")]
    NotADirectory { path: String },

    /// The destination accepted fewer bytes than it was handed
    #[error("Short write: {written} of {expected} bytes accepted")]
    ShortWrite { written: u64, expected: u64 },

    /// The source ended at a different length than listed
    #[error("Length mismatch for {path}: expected {expected} bytes, copied {actual}")]
    LengthMismatch {
        path: String,
        expected: u64,
        actual: u64,
    },

    /// SSH session or SFTP subsystem failure
    #[error("SSH error: {0}")]
    Ssh(String),

    /// Every authentication method was rejected
    #[error("Authentication failed for {user}@{host}")]
    Auth { user: String, host: String },
}

impl MirrorError {
    /// Faults that abort the whole run before any plan executes
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            MirrorError::Config(_)
                | MirrorError::RootMissing { .. }
                | MirrorError::NotADirectory { .. }
                | MirrorError::Ssh(_)
                | MirrorError::Auth { .. }
        )
    }

    /// Faults confined to a single plan item
    pub fn is_transfer_fault(&self) -> bool {
        matches!(
            self,
            MirrorError::Io(_) | MirrorError::ShortWrite { .. } | MirrorError::LengthMismatch { .. }
        )
    }
}

impl From<ssh2::Error> for MirrorError {
    fn from(err: ssh2::Error) -> Self {
        MirrorError::Ssh(err.to_string())
    }
}
