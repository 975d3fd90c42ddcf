//! File split and combine.
//!
//! `split_file` writes `ceil(len / chunk_size)` part files named
//! `<stem>.part<N>` (zero-based ordinal) into a `split/` directory next to
//! the source. `combine_files` concatenates parts in the given order through
//! a bounded buffer. Combining the parts of a split in ordinal order
//! reproduces the source byte-for-byte.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::{COPY_BUFFER_SIZE, TransferError};

/// Result of a completed split.
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    /// Part files in ordinal order.
    pub parts: Vec<PathBuf>,
    pub output_dir: PathBuf,
}

/// Splits `path` into `chunk_size`-byte part files.
///
/// Every part except the last is exactly `chunk_size` bytes; the last
/// carries the remainder. `on_progress` is called with
/// `(parts_completed, total_parts)` after each part is written.
///
/// Fails with [`TransferError::InvalidChunkSize`] when `chunk_size == 0`,
/// before any file is touched. An empty source yields zero parts.
pub fn split_file(
    path: &Path,
    chunk_size: u64,
    mut on_progress: impl FnMut(u64, u64),
) -> Result<SplitOutcome, TransferError> {
    if chunk_size == 0 {
        return Err(TransferError::InvalidChunkSize(chunk_size));
    }

    let file_size = std::fs::metadata(path)?.len();
    let num_chunks = file_size.div_ceil(chunk_size);

    let output_dir = path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("split");
    std::fs::create_dir_all(&output_dir)?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".into());

    let mut source = File::open(path)?;
    let mut buf = vec![0u8; COPY_BUFFER_SIZE.min(chunk_size as usize)];
    let mut parts = Vec::with_capacity(num_chunks as usize);

    for ordinal in 0..num_chunks {
        let part_path = output_dir.join(format!("{stem}.part{ordinal}"));
        let mut part = File::create(&part_path)?;

        let mut remaining = chunk_size.min(file_size - ordinal * chunk_size);
        while remaining > 0 {
            let want = buf.len().min(remaining as usize);
            let n = source.read(&mut buf[..want])?;
            if n == 0 {
                break;
            }
            part.write_all(&buf[..n])?;
            remaining -= n as u64;
        }
        part.flush()?;

        parts.push(part_path);
        on_progress(ordinal + 1, num_chunks);
    }

    Ok(SplitOutcome { parts, output_dir })
}

/// Concatenates `parts` into `output_path`, in the exact order given.
///
/// Each part is streamed through a bounded buffer, never loaded whole.
/// `on_progress` is called with `(bytes_written, total_bytes)` after each
/// buffer flush. Returns the total number of bytes written.
pub fn combine_files(
    parts: &[PathBuf],
    output_path: &Path,
    mut on_progress: impl FnMut(u64, u64),
) -> Result<u64, TransferError> {
    if parts.is_empty() {
        return Err(TransferError::NoParts);
    }

    let mut total: u64 = 0;
    for part in parts {
        total += std::fs::metadata(part)?.len();
    }

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut out = File::create(output_path)?;
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut written: u64 = 0;

    for part in parts {
        let mut file = File::open(part)?;
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            out.write_all(&buf[..n])?;
            written += n as u64;
            on_progress(written, total);
        }
    }
    out.flush()?;

    Ok(written)
}

/// Default output filename for a combine: the first part's stem, which for
/// `<name>.part0` recovers `<name>`.
pub fn default_combine_name(parts: &[PathBuf]) -> Option<String> {
    parts
        .first()
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
}
