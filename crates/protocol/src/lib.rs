//! Shared types for tgup worker ↔ producer communication.
//!
//! Everything here is plain data: the command messages a producer enqueues,
//! the outcome messages the worker reports back, the profile record the
//! connect flow consumes, and the share-link parser. No I/O happens in this
//! crate.

pub mod command;
pub mod link;
pub mod types;

pub use command::{
    Command, CommandOutcome, DownloadMode, DownloadRequest, ItemOutcome, OutcomeValue,
    SendOptions, UploadTask,
};
pub use link::{LinkError, MessageLocator, parse_share_link};
pub use types::{ChatTarget, Identity, MediaKind, Profile, ProxyConfig};
