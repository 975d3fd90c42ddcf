//! The command loop.
//!
//! `OperationWorker` owns the remote client and executes one command at a
//! time, in submission order, reporting exactly one outcome per command.
//! Errors from handlers never escape the loop; they become failure
//! outcomes on the result channel.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tgup_client::{ClientConfig, ClientError, ProgressFn, RemoteClient, RemoteClientFactory};
use tgup_protocol::{
    ChatTarget, Command, CommandOutcome, DownloadMode, DownloadRequest, ItemOutcome, MediaKind,
    OutcomeValue, Profile, UploadTask, parse_share_link,
};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::WorkerError;
use crate::event::{ProgressEvent, TransferDirection};
use crate::scan::enumerate_files;

/// Session lifecycle of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Connecting,
    Connected,
    Disconnecting,
}

/// Single-flight executor for remote operations.
///
/// Built via [`crate::pair`] together with its dispatcher, then moved into
/// its own task where [`run`](Self::run) loops until a `Stop` command, a
/// closed command channel, or cancellation of the shutdown token. The
/// client reference never leaves this struct.
pub struct OperationWorker {
    commands: mpsc::UnboundedReceiver<Command>,
    results: mpsc::UnboundedSender<CommandOutcome>,
    progress: Arc<watch::Sender<Option<ProgressEvent>>>,
    shutdown: CancellationToken,
    factory: Box<dyn RemoteClientFactory>,
    client: Option<Box<dyn RemoteClient>>,
    state: WorkerState,
}

impl OperationWorker {
    pub(crate) fn new(
        commands: mpsc::UnboundedReceiver<Command>,
        results: mpsc::UnboundedSender<CommandOutcome>,
        progress: Arc<watch::Sender<Option<ProgressEvent>>>,
        shutdown: CancellationToken,
        factory: Box<dyn RemoteClientFactory>,
    ) -> Self {
        Self {
            commands,
            results,
            progress,
            shutdown,
            factory,
            client: None,
            state: WorkerState::Idle,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Runs the command loop to completion.
    ///
    /// Each command is handled fully, network awaits included, before the
    /// next one is pulled. The shutdown token is only checked between
    /// commands, so an in-flight handler always runs to its outcome.
    pub async fn run(mut self) {
        info!("operation worker started");
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    debug!("shutdown token cancelled");
                    break;
                }
                cmd = self.commands.recv() => {
                    let Some(cmd) = cmd else {
                        debug!("command channel closed");
                        break;
                    };
                    let stop = matches!(cmd, Command::Stop);
                    let outcome = self.handle(cmd).await;
                    if self.results.send(outcome).is_err() {
                        warn!("result channel closed, dropping outcome");
                    }
                    if stop {
                        break;
                    }
                }
            }
        }
        let _ = self.teardown().await;
        info!("operation worker stopped");
    }

    async fn handle(&mut self, cmd: Command) -> CommandOutcome {
        match cmd {
            Command::Connect {
                profile_name,
                profile,
            } => self.handle_connect(&profile_name, &profile).await,
            Command::Disconnect => self.handle_disconnect().await,
            Command::Upload { task } => self.handle_upload(&task).await,
            Command::BatchUpload { tasks } => self.handle_batch(&tasks).await,
            Command::Download { request } => self.handle_download(&request).await,
            Command::Stop => self.handle_stop().await,
        }
    }

    /// Tears down the current session, if any. Teardown failures are
    /// logged and swallowed; the client reference is always cleared.
    async fn teardown(&mut self) -> Option<String> {
        let mut client = self.client.take()?;
        match client.disconnect().await {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "session teardown failed");
                Some(e.to_string())
            }
        }
    }

    async fn handle_connect(&mut self, profile_name: &str, profile: &Profile) -> CommandOutcome {
        self.state = WorkerState::Connecting;
        let _ = self.teardown().await;

        // Credential validation happens before the factory sees anything,
        // so a malformed profile never reaches the network layer.
        let config = match ClientConfig::from_profile(profile_name, profile) {
            Ok(config) => config,
            Err(e) => {
                self.state = WorkerState::Idle;
                error!(profile = %profile_name, error = %e, "connect rejected");
                return CommandOutcome::failed(e.to_string());
            }
        };

        let connected = async {
            let mut client = self.factory.create(config)?;
            let identity = client.connect().await?;
            Ok::<_, ClientError>((client, identity))
        }
        .await;

        match connected {
            Ok((client, identity)) => {
                info!(
                    profile = %profile_name,
                    account = %identity.first_name,
                    id = identity.id,
                    "connected"
                );
                self.client = Some(client);
                self.state = WorkerState::Connected;
                CommandOutcome::ok(Some(OutcomeValue::Connected(identity)))
            }
            Err(e) => {
                self.client = None;
                self.state = WorkerState::Idle;
                error!(profile = %profile_name, error = %e, "connect failed");
                CommandOutcome::failed(e.to_string())
            }
        }
    }

    async fn handle_disconnect(&mut self) -> CommandOutcome {
        self.state = WorkerState::Disconnecting;
        let teardown_error = self.teardown().await;
        self.state = WorkerState::Idle;
        match teardown_error {
            None => {
                info!("disconnected");
                CommandOutcome::ok(None)
            }
            Some(e) => CommandOutcome::failed(e),
        }
    }

    async fn handle_upload(&mut self, task: &UploadTask) -> CommandOutcome {
        if self.client.is_none() {
            return CommandOutcome::failed("not connected");
        }

        if task.path.is_dir() {
            let files = match enumerate_files(&task.path, task.recursive) {
                Ok(files) => files,
                Err(e) => {
                    return CommandOutcome::failed(format!(
                        "cannot list {}: {e}",
                        task.path.display()
                    ));
                }
            };
            info!(
                folder = %task.path.display(),
                files = files.len(),
                recursive = task.recursive,
                "folder upload started"
            );
            let mut items = Vec::with_capacity(files.len());
            for file in &files {
                items.push(self.upload_item(task, file).await);
            }
            CommandOutcome::ok(Some(OutcomeValue::Items(items)))
        } else {
            match self.upload_one(task, &task.path).await {
                Ok(()) => CommandOutcome::ok(None),
                Err(e) => {
                    error!(file = %task.path.display(), error = %e, "upload failed");
                    CommandOutcome::failed(e.to_string())
                }
            }
        }
    }

    async fn handle_batch(&mut self, tasks: &[UploadTask]) -> CommandOutcome {
        if self.client.is_none() {
            return CommandOutcome::failed("not connected");
        }

        let mut items = Vec::new();
        for task in tasks {
            if task.path.is_dir() {
                match enumerate_files(&task.path, task.recursive) {
                    Ok(files) => {
                        for file in &files {
                            items.push(self.upload_item(task, file).await);
                        }
                    }
                    Err(e) => {
                        warn!(folder = %task.path.display(), error = %e, "cannot list folder, skipping");
                        items.push(ItemOutcome::failed(
                            task.path.display().to_string(),
                            e.to_string(),
                        ));
                    }
                }
            } else {
                items.push(self.upload_item(task, &task.path).await);
            }
        }

        let failed = items.iter().filter(|i| !i.success).count();
        info!(items = items.len(), failed, "batch upload finished");
        CommandOutcome::ok(Some(OutcomeValue::Items(items)))
    }

    /// One file inside a folder or batch loop: failures are logged and
    /// folded into the per-item list, never abort the remaining items.
    async fn upload_item(&self, task: &UploadTask, file: &Path) -> ItemOutcome {
        match self.upload_one(task, file).await {
            Ok(()) => ItemOutcome::ok(file.display().to_string()),
            Err(e) => {
                warn!(file = %file.display(), error = %e, "item failed, continuing");
                ItemOutcome::failed(file.display().to_string(), e.to_string())
            }
        }
    }

    async fn upload_one(&self, task: &UploadTask, path: &Path) -> Result<(), WorkerError> {
        let client = self.client.as_ref().ok_or(WorkerError::NotConnected)?;

        let base_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| WorkerError::NoFileName(path.display().to_string()))?;
        let file_name = match task.prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}{base_name}"),
            _ => base_name.to_string(),
        };

        let kind = task
            .kind
            .unwrap_or_else(|| MediaKind::from_extension(path));

        let caption = if task.use_filename_caption {
            path.file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        } else if task.caption.is_empty() {
            None
        } else {
            Some(task.caption.clone())
        };

        info!(file = %path.display(), kind = ?kind, chat = %task.chat, "uploading");
        let progress = self.progress_fn(TransferDirection::Upload, file_name.clone());
        client
            .send_media(
                &task.chat,
                path,
                kind,
                caption.as_deref(),
                &file_name,
                &task.options,
                progress,
            )
            .await?;

        // Source removal is sequenced strictly after remote success.
        if task.delete_original {
            match std::fs::remove_file(path) {
                Ok(()) => debug!(file = %path.display(), "deleted source after upload"),
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "could not delete source after upload")
                }
            }
        }
        Ok(())
    }

    async fn handle_download(&mut self, request: &DownloadRequest) -> CommandOutcome {
        if self.client.is_none() {
            return CommandOutcome::failed("not connected");
        }
        if let Err(e) = std::fs::create_dir_all(&request.dest_dir) {
            return CommandOutcome::failed(format!(
                "cannot create {}: {e}",
                request.dest_dir.display()
            ));
        }

        let mut items = Vec::new();
        match &request.mode {
            DownloadMode::Links { links } => {
                for link in links {
                    match parse_share_link(link) {
                        Ok(locator) => {
                            items.push(
                                self.download_item(
                                    &locator.chat,
                                    locator.message_id,
                                    &request.dest_dir,
                                    link,
                                )
                                .await,
                            );
                        }
                        Err(e) => {
                            warn!(link = %link, error = %e, "invalid share link, skipping");
                            items.push(ItemOutcome::failed(link.as_str(), e.to_string()));
                        }
                    }
                }
            }
            DownloadMode::Messages { chat, ids } => {
                for &id in ids {
                    let label = format!("{chat}/{id}");
                    items.push(self.download_item(chat, id, &request.dest_dir, &label).await);
                }
            }
        }

        let failed = items.iter().filter(|i| !i.success).count();
        info!(items = items.len(), failed, "download finished");
        CommandOutcome::ok(Some(OutcomeValue::Items(items)))
    }

    async fn download_item(
        &self,
        chat: &ChatTarget,
        message_id: i64,
        dest_dir: &Path,
        label: &str,
    ) -> ItemOutcome {
        match self.download_one(chat, message_id, dest_dir).await {
            Ok(path) => {
                info!(item = %label, path = %path.display(), "downloaded");
                ItemOutcome::ok(label)
            }
            Err(e) => {
                warn!(item = %label, error = %e, "download failed, continuing");
                ItemOutcome::failed(label, e.to_string())
            }
        }
    }

    async fn download_one(
        &self,
        chat: &ChatTarget,
        message_id: i64,
        dest_dir: &Path,
    ) -> Result<PathBuf, WorkerError> {
        let client = self.client.as_ref().ok_or(WorkerError::NotConnected)?;
        let message = client.get_message(chat, message_id).await?;
        if message.media.is_none() {
            return Err(ClientError::NoMedia.into());
        }
        let file_name = message.suggested_file_name();
        let progress = self.progress_fn(TransferDirection::Download, file_name.clone());
        let path = client
            .download_media(&message, dest_dir, &file_name, progress)
            .await?;
        Ok(path)
    }

    async fn handle_stop(&mut self) -> CommandOutcome {
        info!("stop requested");
        let _ = self.teardown().await;
        self.state = WorkerState::Idle;
        CommandOutcome::ok(None)
    }

    /// Progress callback for one transfer. Each tick overwrites the
    /// latest-value channel; throttling is the reader's concern.
    fn progress_fn(&self, direction: TransferDirection, file_name: String) -> ProgressFn {
        let publish = Arc::clone(&self.progress);
        let started = Instant::now();
        Box::new(move |bytes_done, bytes_total| {
            let _ = publish.send(Some(ProgressEvent {
                direction,
                file_name: file_name.clone(),
                bytes_done,
                bytes_total,
                elapsed_secs: started.elapsed().as_secs_f64(),
            }));
        })
    }
}
