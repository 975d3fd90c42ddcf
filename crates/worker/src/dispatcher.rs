//! Producer-side handle to the worker.
//!
//! The dispatcher owns the sending half of the command channel and the
//! receiving halves of the result and progress channels. It never touches
//! the remote client or any worker-internal state.

use std::sync::Arc;

use tgup_client::RemoteClientFactory;
use tgup_protocol::{Command, CommandOutcome};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::WorkerError;
use crate::event::ProgressEvent;
use crate::worker::OperationWorker;

/// Builds a connected dispatcher/worker pair.
///
/// The worker is moved into its own task (`tokio::spawn(worker.run())`);
/// the dispatcher stays with the producer.
pub fn pair(factory: Box<dyn RemoteClientFactory>) -> (CommandDispatcher, OperationWorker) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (result_tx, result_rx) = mpsc::unbounded_channel();
    let (progress_tx, progress_rx) = watch::channel(None);
    let shutdown = CancellationToken::new();

    let worker = OperationWorker::new(
        command_rx,
        result_tx,
        Arc::new(progress_tx),
        shutdown.clone(),
        factory,
    );
    let dispatcher = CommandDispatcher {
        commands: command_tx,
        results: result_rx,
        progress: progress_rx,
        shutdown,
        closed: false,
    };
    (dispatcher, worker)
}

/// Submits commands and polls outcomes without ever blocking the
/// producer's thread.
pub struct CommandDispatcher {
    commands: mpsc::UnboundedSender<Command>,
    results: mpsc::UnboundedReceiver<CommandOutcome>,
    progress: watch::Receiver<Option<ProgressEvent>>,
    shutdown: CancellationToken,
    closed: bool,
}

impl CommandDispatcher {
    /// Enqueues a command. Commands reach the worker in submission order
    /// and each produces exactly one outcome, in the same order.
    pub fn submit(&self, cmd: Command) -> Result<(), WorkerError> {
        if self.closed {
            return Err(WorkerError::Cancelled);
        }
        self.commands
            .send(cmd)
            .map_err(|_| WorkerError::ChannelClosed)
    }

    /// Non-blocking poll of the result channel. Meant to be called from
    /// the producer's own tick; returns `None` when no outcome is ready.
    pub fn try_take(&mut self) -> Option<CommandOutcome> {
        self.results.try_recv().ok()
    }

    /// The most recent progress sample, if any transfer has ticked yet.
    pub fn latest_progress(&self) -> Option<ProgressEvent> {
        self.progress.borrow().clone()
    }

    /// Stops accepting further submissions. Commands already queued run
    /// to completion on the worker side; their outcomes stay drainable
    /// through [`try_take`](Self::try_take).
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Asks the worker to tear down its session and end its loop, then
    /// closes this side for further submissions.
    pub fn shutdown(&mut self) {
        if self.submit(Command::Stop).is_err() {
            debug!("worker already gone at shutdown");
        }
        self.close();
    }

    /// Hard-aborts the worker loop between commands. The in-flight
    /// command, if any, still runs to completion first.
    pub fn abort(&mut self) {
        self.shutdown.cancel();
        self.close();
    }
}
