//! Single-flight operation worker.
//!
//! One [`OperationWorker`] owns the remote client for the lifetime of the
//! application and consumes commands from a FIFO channel, executing each to
//! completion before pulling the next. The producer side talks to it only
//! through a [`CommandDispatcher`]: submit commands, poll outcomes, read
//! the latest progress sample. The client is never touched from two logical
//! operations at once.

pub mod batch;
pub mod dispatcher;
pub mod event;
pub mod scan;
pub mod worker;

pub use batch::BatchQueue;
pub use dispatcher::{CommandDispatcher, pair};
pub use event::{ProgressEvent, TransferDirection};
pub use scan::enumerate_files;
pub use worker::{OperationWorker, WorkerState};

/// Errors raised inside command handlers.
///
/// These never escape the command loop; each handler converts them into a
/// failure outcome on the result channel.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("not connected")]
    NotConnected,

    #[error(transparent)]
    Client(#[from] tgup_client::ClientError),

    #[error("source has no file name: {0}")]
    NoFileName(String),

    #[error("worker is shut down")]
    Cancelled,

    #[error("worker channel closed")]
    ChannelClosed,
}
