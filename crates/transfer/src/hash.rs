//! Streaming file hashing.
//!
//! One read pass feeds every requested digest, so hashing a large file with
//! several algorithms costs the same I/O as hashing it with one.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::{COPY_BUFFER_SIZE, TransferError};

/// Digest algorithms supported by [`hash_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// Cryptographic digest, 64 hex chars.
    Sha256,
    /// Legacy checksum, 8 hex chars.
    Crc32,
}

impl HashAlgorithm {
    /// Stable key used in the result map.
    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Crc32 => "crc32",
        }
    }
}

/// Hashes `path` with every algorithm in `algorithms`, in a single pass
/// through a bounded buffer.
///
/// `on_progress` is called with `(bytes_read, file_size)` after each buffer.
/// Returns hex digests keyed by [`HashAlgorithm::name`]. Duplicate entries
/// in `algorithms` are computed once.
pub fn hash_file(
    path: &Path,
    algorithms: &[HashAlgorithm],
    mut on_progress: impl FnMut(u64, u64),
) -> Result<BTreeMap<&'static str, String>, TransferError> {
    let want_sha256 = algorithms.contains(&HashAlgorithm::Sha256);
    let want_crc32 = algorithms.contains(&HashAlgorithm::Crc32);

    let file_size = std::fs::metadata(path)?.len();
    let mut file = File::open(path)?;
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut bytes_read: u64 = 0;

    let mut sha256 = Sha256::new();
    let mut crc32 = crc32fast::Hasher::new();

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        if want_sha256 {
            sha256.update(&buf[..n]);
        }
        if want_crc32 {
            crc32.update(&buf[..n]);
        }
        bytes_read += n as u64;
        on_progress(bytes_read, file_size);
    }

    let mut digests = BTreeMap::new();
    if want_sha256 {
        digests.insert(HashAlgorithm::Sha256.name(), hex::encode(sha256.finalize()));
    }
    if want_crc32 {
        digests.insert(
            HashAlgorithm::Crc32.name(),
            format!("{:08x}", crc32.finalize()),
        );
    }
    Ok(digests)
}
