//! SFTP access over an `ssh2` session

use super::{path, DirEntry, FileSystem, Metadata};
use crate::types::{unix_seconds, MirrorError};
use ssh2::{FileStat, Session, Sftp};
use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

const DEFAULT_DIR_MODE: i32 = 0o755;

/// A remote tree reached over SFTP
pub struct SftpFs {
    // Owns the session so the SFTP channel outlives every call
    _session: Session,
    sftp: Sftp,
}

impl SftpFs {
    /// Open a TCP connection, authenticate, and start the SFTP subsystem
    ///
    /// With a known password only password authentication is tried. Without
    /// one, the ssh-agent is asked first and `prompt` is called for a
    /// password only if the agent cannot authenticate.
    pub fn connect<F>(
        host: &str,
        port: u16,
        user: &str,
        password: Option<&str>,
        prompt: F,
    ) -> Result<Self, MirrorError>
    where
        F: FnOnce() -> io::Result<String>,
    {
        let addr = format!("{}:{}", host, port);
        let tcp = TcpStream::connect(&addr)
            .map_err(|e| MirrorError::Ssh(format!("Cannot connect to {} ({})", addr, e)))?;

        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| MirrorError::Ssh(format!("Handshake with {} failed ({})", addr, e)))?;

        authenticate(&session, host, user, password, prompt)?;

        let sftp = session.sftp()?;
        info!(%addr, user, "SFTP session established");
        Ok(Self {
            _session: session,
            sftp,
        })
    }

    fn walk_into(&self, dir: &str, out: &mut Vec<DirEntry>) -> Result<(), MirrorError> {
        debug!(dir, "readdir");
        let mut listing = self.sftp.readdir(Path::new(dir)).map_err(io_error)?;
        listing.sort_by(|a, b| a.0.cmp(&b.0));

        for (child, stat) in listing {
            let Some(name) = child.file_name().and_then(|n| n.to_str()) else {
                warn!(path = %child.display(), "skipping non UTF-8 remote path");
                continue;
            };
            if name == "." || name == ".." {
                continue;
            }

            let full = path::join(dir, name);
            let metadata = to_metadata(&stat);
            out.push(DirEntry {
                path: full.clone(),
                metadata,
            });

            if metadata.is_dir {
                if let Err(e) = self.walk_into(&full, out) {
                    warn!(dir = %full, error = %e, "cannot read remote directory, skipping");
                }
            }
        }
        Ok(())
    }
}

fn authenticate<F>(
    session: &Session,
    host: &str,
    user: &str,
    password: Option<&str>,
    prompt: F,
) -> Result<(), MirrorError>
where
    F: FnOnce() -> io::Result<String>,
{
    let auth_failed = || MirrorError::Auth {
        user: user.to_string(),
        host: host.to_string(),
    };

    match password {
        Some(password) => {
            if let Err(e) = session.userauth_password(user, password) {
                debug!(error = %e, "password authentication rejected");
            }
        }
        None => {
            if let Err(e) = session.userauth_agent(user) {
                debug!(error = %e, "agent authentication failed");
            }
            if !session.authenticated() {
                let password = prompt()?;
                if let Err(e) = session.userauth_password(user, &password) {
                    debug!(error = %e, "password authentication rejected");
                }
            }
        }
    }

    if session.authenticated() {
        Ok(())
    } else {
        Err(auth_failed())
    }
}

fn io_error(err: ssh2::Error) -> MirrorError {
    MirrorError::Io(io::Error::from(err))
}

fn to_metadata(stat: &FileStat) -> Metadata {
    Metadata {
        is_dir: stat.is_dir(),
        size: stat.size.unwrap_or(0),
        modified: UNIX_EPOCH + Duration::from_secs(stat.mtime.unwrap_or(0)),
    }
}

/// Makes every `write` consume the whole buffer
///
/// SFTP writes are split into protocol packets, so a single call on the
/// underlying file may accept only part of a chunk.
struct FullWriter<W>(W);

impl<W: Write> Write for FullWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl FileSystem for SftpFs {
    fn stat(&self, path: &str) -> Result<Metadata, MirrorError> {
        debug!(path, "stat");
        // SSH_FXP_STAT resolves links on the server
        let stat = self.sftp.stat(Path::new(path)).map_err(io_error)?;
        Ok(to_metadata(&stat))
    }

    fn walk(&self, root: &str) -> Result<Vec<DirEntry>, MirrorError> {
        let mut entries = Vec::new();
        self.walk_into(root, &mut entries)?;
        debug!(root, count = entries.len(), "walked remote tree");
        Ok(entries)
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + '_>, MirrorError> {
        debug!(path, "open");
        let file = self.sftp.open(Path::new(path)).map_err(io_error)?;
        Ok(Box::new(file))
    }

    fn create(&self, path: &str) -> Result<Box<dyn Write + '_>, MirrorError> {
        debug!(path, "create");
        let file = self.sftp.create(Path::new(path)).map_err(io_error)?;
        Ok(Box::new(FullWriter(file)))
    }

    fn mkdir(&self, path: &str) -> Result<(), MirrorError> {
        debug!(path, "mkdir");
        self.sftp
            .mkdir(Path::new(path), DEFAULT_DIR_MODE)
            .map_err(io_error)
    }

    fn remove(&self, path: &str) -> Result<(), MirrorError> {
        debug!(path, "remove");
        let target = Path::new(path);
        let stat = self.sftp.lstat(target).map_err(io_error)?;
        if stat.is_dir() {
            self.sftp.rmdir(target).map_err(io_error)
        } else {
            self.sftp.unlink(target).map_err(io_error)
        }
    }

    fn set_modified_time(&self, path: &str, modified: SystemTime) -> Result<(), MirrorError> {
        debug!(path, "setstat");
        let secs = unix_seconds(modified).max(0) as u64;
        let stat = FileStat {
            size: None,
            uid: None,
            gid: None,
            perm: None,
            atime: Some(secs),
            mtime: Some(secs),
        };
        self.sftp
            .setstat(Path::new(path), stat)
            .map_err(io_error)
    }

    fn join(&self, root: &str, relative: &str) -> String {
        path::join(root, relative)
    }
}
