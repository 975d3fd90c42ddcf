//! Remote client trait bridging transfer logic to the actual service
//! transport.
//!
//! `RemoteClient` is implemented by the app on top of a real messaging
//! backend. Using a trait keeps upload/download logic decoupled from the
//! wire protocol and testable with mocks.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tgup_protocol::{ChatTarget, Identity, MediaKind, SendOptions};

use crate::config::ClientConfig;
use crate::message::RemoteMessage;
use crate::ClientError;

/// Boxed future returned by `RemoteClient` methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Byte-level progress callback: `(bytes_done, bytes_total)`.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Abstract connection to the remote messaging service.
///
/// One instance maps to one authorized session. Methods that transfer
/// bytes take a [`ProgressFn`] invoked from the transport as data moves.
pub trait RemoteClient: Send + Sync {
    /// Signs in and returns the account identity.
    fn connect(&mut self) -> BoxFuture<'_, Result<Identity, ClientError>>;

    /// Ends the session. Safe to call when never connected.
    fn disconnect(&mut self) -> BoxFuture<'_, Result<(), ClientError>>;

    /// Uploads one local file to `chat` as the given media kind.
    ///
    /// `file_name` is the name the remote side will see, which may differ
    /// from the local path when a prefix is applied.
    #[allow(clippy::too_many_arguments)]
    fn send_media<'a>(
        &'a self,
        chat: &'a ChatTarget,
        path: &'a Path,
        kind: MediaKind,
        caption: Option<&'a str>,
        file_name: &'a str,
        options: &'a SendOptions,
        progress: ProgressFn,
    ) -> BoxFuture<'a, Result<(), ClientError>>;

    /// Fetches one message so its media can be inspected and downloaded.
    fn get_message<'a>(
        &'a self,
        chat: &'a ChatTarget,
        message_id: i64,
    ) -> BoxFuture<'a, Result<RemoteMessage, ClientError>>;

    /// Downloads the media of a fetched message into `dest_dir` under
    /// `file_name`, returning the written path.
    fn download_media<'a>(
        &'a self,
        message: &'a RemoteMessage,
        dest_dir: &'a Path,
        file_name: &'a str,
        progress: ProgressFn,
    ) -> BoxFuture<'a, Result<PathBuf, ClientError>>;
}

/// Builds a [`RemoteClient`] from a validated configuration.
///
/// Injected into the worker so tests can substitute mock clients.
pub trait RemoteClientFactory: Send + Sync {
    fn create(&self, config: ClientConfig) -> Result<Box<dyn RemoteClient>, ClientError>;
}

impl<T: RemoteClientFactory + ?Sized> RemoteClientFactory for std::sync::Arc<T> {
    fn create(&self, config: ClientConfig) -> Result<Box<dyn RemoteClient>, ClientError> {
        (**self).create(config)
    }
}
