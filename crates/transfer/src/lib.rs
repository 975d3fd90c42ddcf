//! Deterministic transfer utilities: chunked split/combine of files,
//! single-pass multi-digest hashing, and progress estimation.
//!
//! Nothing here touches the network. The split/combine pair guarantees
//! byte-exact reconstruction: for any file `F` and chunk size `s > 0`,
//! combining the parts produced by `split_file(F, s)` in ordinal order
//! reproduces `F` exactly.

mod chunk;
mod hash;
mod progress;

pub use chunk::{SplitOutcome, combine_files, default_combine_name, split_file};
pub use hash::{HashAlgorithm, hash_file};
pub use progress::{TransferEstimate, estimate, format_eta, format_speed};

/// Bounded buffer size for streaming copies, so arbitrarily large files
/// never load whole into memory.
pub const COPY_BUFFER_SIZE: usize = 1024 * 1024;

/// Errors produced by the transfer utilities.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chunk size must be greater than 0, got {0}")]
    InvalidChunkSize(u64),

    #[error("no part files given")]
    NoParts,
}
