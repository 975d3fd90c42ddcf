//! Command and outcome messages for the worker channels.
//!
//! A producer enqueues [`Command`]s; the worker consumes them strictly in
//! FIFO order and reports exactly one [`CommandOutcome`] per command, batch
//! commands included.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{ChatTarget, Identity, MediaKind, Profile};

/// Per-send flags forwarded to the remote service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOptions {
    /// Deliver without a notification sound on the receiving side.
    #[serde(default)]
    pub silent: bool,
    /// Mark photos/videos as spoilers.
    #[serde(default)]
    pub spoiler: bool,
    /// Disallow forwarding and saving of the sent media.
    #[serde(default)]
    pub protect: bool,
}

/// One logical upload: a file, or a folder to expand in filesystem order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadTask {
    pub path: PathBuf,
    pub chat: ChatTarget,
    /// Explicit media kind; `None` means infer from the file extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub caption: String,
    /// Replace the caption with the filename (extension stripped).
    #[serde(default)]
    pub use_filename_caption: bool,
    /// Prepended to the filename before upload naming.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Descend into subdirectories when `path` is a folder.
    #[serde(default)]
    pub recursive: bool,
    /// Remove the local source file, only after the remote call succeeded.
    #[serde(default)]
    pub delete_original: bool,
    #[serde(default)]
    pub options: SendOptions,
}

impl UploadTask {
    /// A task with defaults for everything but the path and destination.
    pub fn new(path: impl Into<PathBuf>, chat: ChatTarget) -> Self {
        Self {
            path: path.into(),
            chat,
            kind: None,
            caption: String::new(),
            use_filename_caption: false,
            prefix: None,
            recursive: false,
            delete_original: false,
            options: SendOptions::default(),
        }
    }

    /// Same settings, different source path. Used when a folder or batch
    /// queue expands into per-file tasks.
    pub fn with_path(&self, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }
}

/// What to download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DownloadMode {
    /// Share links, one message each, processed in list order.
    Links { links: Vec<String> },
    /// Explicit chat plus message identifiers, processed in list order.
    Messages { chat: ChatTarget, ids: Vec<i64> },
}

/// A download command payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub dest_dir: PathBuf,
    #[serde(flatten)]
    pub mode: DownloadMode,
}

/// A message on the producer→worker command channel. Immutable once
/// enqueued; consumed exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    Connect {
        profile_name: String,
        profile: Profile,
    },
    Disconnect,
    Upload {
        task: UploadTask,
    },
    Download {
        request: DownloadRequest,
    },
    BatchUpload {
        tasks: Vec<UploadTask>,
    },
    Stop,
}

/// Outcome of one item inside a folder, batch or multi-link operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemOutcome {
    /// Path or link the item refers to.
    pub label: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemOutcome {
    pub fn ok(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(label: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Payload of a successful outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeValue {
    /// Connect succeeded; the authenticated account.
    Connected(Identity),
    /// Per-item results of a folder, batch or download operation, in
    /// processing order.
    Items(Vec<ItemOutcome>),
}

/// A message on the worker→producer result channel. Exactly one per
/// consumed [`Command`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<OutcomeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandOutcome {
    pub fn ok(value: Option<OutcomeValue>) -> Self {
        Self {
            success: true,
            value,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            value: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tagged_by_kind() {
        let json = serde_json::to_string(&Command::Disconnect).unwrap();
        assert_eq!(json, r#"{"kind":"disconnect"}"#);

        let cmd = Command::Upload {
            task: UploadTask::new("/tmp/a.bin", ChatTarget::own()),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains(r#""kind":"upload""#));
        let parsed: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, parsed);
    }

    #[test]
    fn download_request_flattens_mode() {
        let req = DownloadRequest {
            dest_dir: "/downloads".into(),
            mode: DownloadMode::Links {
                links: vec!["https://t.me/chat/1".into()],
            },
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""mode":"links""#));
        let parsed: DownloadRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req, parsed);
    }

    #[test]
    fn outcome_success_omits_error() {
        let outcome = CommandOutcome::ok(None);
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn outcome_failure_carries_message() {
        let outcome = CommandOutcome::failed("not connected");
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("not connected"));
        assert!(outcome.value.is_none());
    }

    #[test]
    fn with_path_keeps_settings() {
        let mut template = UploadTask::new("/ignored", ChatTarget::Id(7));
        template.caption = "hello".into();
        template.delete_original = true;

        let task = template.with_path("/data/b.txt");
        assert_eq!(task.path, PathBuf::from("/data/b.txt"));
        assert_eq!(task.caption, "hello");
        assert!(task.delete_original);
    }
}
