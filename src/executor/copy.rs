//! Chunked stream copy with strict write accounting

use crate::types::MirrorError;
use crate::ui::ProgressSink;
use std::io::{ErrorKind, Read, Write};

/// Bytes moved per read/write step
pub const CHUNK_SIZE: usize = 32 * 1024;

/// Percentage of `expected` covered by `written`, rounded to nearest
///
/// An empty expected length counts as complete.
pub fn percent_complete(written: u64, expected: u64) -> u32 {
    if expected == 0 {
        return 100;
    }
    let expected = u128::from(expected);
    let pct = (u128::from(written) * 100 + expected / 2) / expected;
    u32::try_from(pct).unwrap_or(u32::MAX)
}

/// Copy `source` to `destination` in [`CHUNK_SIZE`] steps
///
/// Every chunk is handed to a single `write` call; a destination that
/// accepts fewer bytes than offered fails with [`MirrorError::ShortWrite`].
/// Wrap sinks that legitimately accept partial writes before passing them in.
///
/// When `expected_len` exceeds one chunk, a percentage is reported after
/// each chunk and cleared once the copy ends, successfully or not.
///
/// Returns the number of bytes written.
///
/// # Example
/// ```
/// use sftp_mirror::executor::copy_chunked;
/// use sftp_mirror::ui::NoProgress;
///
/// let data = vec![7u8; 100_000];
/// let mut out = Vec::new();
/// let n = copy_chunked(&mut data.as_slice(), &mut out, 100_000, &mut NoProgress)?;
/// assert_eq!(n, 100_000);
/// assert_eq!(out, data);
/// # Ok::<(), sftp_mirror::types::MirrorError>(())
/// ```
pub fn copy_chunked<R, W, P>(
    source: &mut R,
    destination: &mut W,
    expected_len: u64,
    progress: &mut P,
) -> Result<u64, MirrorError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    P: ProgressSink + ?Sized,
{
    let show_progress = expected_len > CHUNK_SIZE as u64;
    let result = copy_loop(source, destination, expected_len, show_progress, progress);
    if show_progress {
        progress.clear();
    }
    result
}

fn copy_loop<R, W, P>(
    source: &mut R,
    destination: &mut W,
    expected_len: u64,
    show_progress: bool,
    progress: &mut P,
) -> Result<u64, MirrorError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    P: ProgressSink + ?Sized,
{
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let read = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(MirrorError::Io(e)),
        };

        let written = write_once(destination, &buffer[..read])?;
        if written < read {
            return Err(MirrorError::ShortWrite {
                written: written as u64,
                expected: read as u64,
            });
        }
        total += written as u64;

        if show_progress {
            progress.update(percent_complete(total, expected_len));
        }
    }

    Ok(total)
}

fn write_once<W: Write + ?Sized>(destination: &mut W, chunk: &[u8]) -> Result<usize, MirrorError> {
    loop {
        match destination.write(chunk) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            other => return other.map_err(MirrorError::Io),
        }
    }
}
