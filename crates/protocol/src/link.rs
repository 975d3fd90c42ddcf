//! Share-link parsing.
//!
//! Links have the shape `.../t.me/[c/]<chat>/<messageId>`. The `c` segment
//! marks a private channel whose numeric identifier is remapped to the
//! internal `-100`-prefixed form.

use serde::{Deserialize, Serialize};

use crate::types::ChatTarget;

/// Errors produced while parsing a share link. Fail fast, before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("not a t.me link: {0}")]
    MissingAnchor(String),

    #[error("link has no chat segment: {0}")]
    MissingChat(String),

    #[error("invalid private channel id in link: {0}")]
    InvalidChannelId(String),

    #[error("invalid message id in link: {0}")]
    InvalidMessageId(String),
}

/// A fully resolved reference to one remote message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageLocator {
    pub chat: ChatTarget,
    pub message_id: i64,
}

/// Parses a share link into a [`MessageLocator`].
///
/// Whitespace anywhere in the link is ignored. A private-channel link
/// `t.me/c/123456789/42` resolves to chat id `-100123456789`, message `42`;
/// a public link `t.me/somechat/42` resolves to the username `somechat`.
pub fn parse_share_link(link: &str) -> Result<MessageLocator, LinkError> {
    let cleaned: String = link.chars().filter(|c| !c.is_whitespace()).collect();
    let parts: Vec<&str> = cleaned.split('/').collect();

    let anchor = parts
        .iter()
        .position(|p| *p == "t.me")
        .ok_or_else(|| LinkError::MissingAnchor(link.into()))?;
    let rest = &parts[anchor + 1..];

    let (chat, message_part) = if rest.first().copied() == Some("c") {
        let raw = rest
            .get(1)
            .copied()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| LinkError::MissingChat(link.into()))?;
        let numeric: u64 = raw
            .parse()
            .map_err(|_| LinkError::InvalidChannelId(raw.into()))?;
        let id: i64 = format!("-100{numeric}")
            .parse()
            .map_err(|_| LinkError::InvalidChannelId(raw.into()))?;
        (ChatTarget::Id(id), rest.get(2..).and_then(|r| r.last()))
    } else {
        let raw = rest
            .first()
            .copied()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| LinkError::MissingChat(link.into()))?;
        (
            ChatTarget::Username(raw.into()),
            rest.get(1..).and_then(|r| r.last()),
        )
    };

    let message_part = message_part
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LinkError::InvalidMessageId(link.into()))?;
    let message_id: i64 = message_part
        .parse()
        .map_err(|_| LinkError::InvalidMessageId((*message_part).into()))?;

    Ok(MessageLocator { chat, message_id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_link() {
        let loc = parse_share_link("https://t.me/somechat/42").unwrap();
        assert_eq!(loc.chat, ChatTarget::Username("somechat".into()));
        assert_eq!(loc.message_id, 42);
    }

    #[test]
    fn private_channel_link_remaps_chat_id() {
        let loc = parse_share_link("https://t.me/c/123456789/42").unwrap();
        assert_eq!(loc.chat, ChatTarget::Id(-100123456789));
        assert_eq!(loc.message_id, 42);
    }

    #[test]
    fn schemeless_link() {
        let loc = parse_share_link("t.me/c/555/7").unwrap();
        assert_eq!(loc.chat, ChatTarget::Id(-100555));
        assert_eq!(loc.message_id, 7);
    }

    #[test]
    fn whitespace_is_stripped() {
        let loc = parse_share_link(" https://t.me/some chat/1 2 ").unwrap();
        assert_eq!(loc.chat, ChatTarget::Username("somechat".into()));
        assert_eq!(loc.message_id, 12);
    }

    #[test]
    fn missing_anchor_rejected() {
        let err = parse_share_link("https://example.com/chat/42").unwrap_err();
        assert!(matches!(err, LinkError::MissingAnchor(_)));
    }

    #[test]
    fn missing_message_id_rejected() {
        assert!(matches!(
            parse_share_link("https://t.me/somechat").unwrap_err(),
            LinkError::InvalidMessageId(_)
        ));
        assert!(matches!(
            parse_share_link("https://t.me/somechat/").unwrap_err(),
            LinkError::InvalidMessageId(_)
        ));
    }

    #[test]
    fn non_numeric_message_id_rejected() {
        let err = parse_share_link("https://t.me/somechat/abc").unwrap_err();
        assert!(matches!(err, LinkError::InvalidMessageId(_)));
    }

    #[test]
    fn non_numeric_private_channel_rejected() {
        let err = parse_share_link("https://t.me/c/notanumber/42").unwrap_err();
        assert!(matches!(err, LinkError::InvalidChannelId(_)));
    }

    #[test]
    fn bare_anchor_rejected() {
        let err = parse_share_link("https://t.me").unwrap_err();
        assert!(matches!(err, LinkError::MissingChat(_)));
    }
}
