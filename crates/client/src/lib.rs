//! Remote-service client boundary.
//!
//! The actual wire protocol and authentication flow live behind
//! [`RemoteClient`]; this crate only defines the trait surface the worker
//! calls, the configuration a session is built from, and the message/media
//! model downloads operate on. The application provides the real
//! implementation; tests provide mocks.

pub mod adapter;
pub mod config;
pub mod message;

pub use adapter::{BoxFuture, ProgressFn, RemoteClient, RemoteClientFactory};
pub use config::{ClientConfig, Credentials};
pub use message::{MediaAttachment, RemoteMessage};

/// Errors surfaced by a remote client implementation or by session
/// construction.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid credentials: {0}")]
    Credentials(String),

    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("message has no downloadable media")]
    NoMedia,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
