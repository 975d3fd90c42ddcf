//! Remote message and media model consumed by downloads.

use serde::{Deserialize, Serialize};

use tgup_protocol::MediaKind;

/// Media attached to a remote message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub kind: MediaKind,
    /// Filename advertised by the sender, when the service carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default)]
    pub size: u64,
}

/// One fetched remote message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteMessage {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaAttachment>,
}

impl RemoteMessage {
    /// Local filename to save this message's media under.
    ///
    /// Uses the advertised name when present, otherwise a kind-specific
    /// default: `"video"`/`"audio"` for those kinds, `"photo.jpg"` for
    /// photos (the service strips photo filenames), `"file"` for anything
    /// else or when there is no media at all.
    pub fn suggested_file_name(&self) -> String {
        let Some(media) = &self.media else {
            return "file".into();
        };
        if let Some(name) = media.file_name.as_ref().filter(|n| !n.is_empty()) {
            return name.clone();
        }
        match media.kind {
            MediaKind::Video | MediaKind::VideoNote => "video".into(),
            MediaKind::Audio | MediaKind::Voice => "audio".into(),
            MediaKind::Photo => "photo.jpg".into(),
            MediaKind::Document => "file".into(),
        }
    }
}
