use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// How a file is presented to the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
    Audio,
    Voice,
    VideoNote,
    Document,
}

impl MediaKind {
    /// Infers the media kind from a file extension.
    ///
    /// Unknown or missing extensions fall back to [`MediaKind::Document`],
    /// which the service accepts for any payload.
    pub fn from_extension(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "bmp" => MediaKind::Photo,
            "mp4" | "mkv" | "avi" | "mov" | "webm" => MediaKind::Video,
            "mp3" | "wav" | "ogg" | "flac" | "m4a" => MediaKind::Audio,
            _ => MediaKind::Document,
        }
    }
}

/// Destination or source chat for a transfer.
///
/// Public chats are addressed by username (`"me"` is the saved-messages
/// shorthand); private channels resolve to a numeric identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatTarget {
    Id(i64),
    Username(String),
}

impl ChatTarget {
    /// The user's own saved-messages chat.
    pub fn own() -> Self {
        ChatTarget::Username("me".into())
    }
}

impl fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatTarget::Id(id) => write!(f, "{id}"),
            ChatTarget::Username(name) => write!(f, "{name}"),
        }
    }
}

/// The authenticated account identity returned by a successful connect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: i64,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Proxy settings carried on a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub scheme: String,
    pub hostname: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
}

/// A stored account profile, persisted by the profile editor and consumed
/// read-only by the connect flow.
///
/// Exactly one of `phone`, `bot_token`, `session_string` must be set; the
/// editor enforces this and the worker re-checks it as a fail-fast before
/// any network call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub api_id: String,
    pub api_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
    #[serde(default)]
    pub hide_password: bool,
}
