//! Outbound message types
//!
//! Every platform shares the `{"msgtype": <kind>, <kind>: {...}}` shape, so the
//! message is an internally tagged enum whose single field is named after
//! the tag.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A message to be posted to a webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msgtype", rename_all = "lowercase")]
pub enum OutboundMessage {
    /// Plain text message
    Text { text: TextContent },
    /// Markdown message with a title
    Markdown { markdown: MarkdownContent },
}

/// Body of a text message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
}

/// Body of a markdown message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownContent {
    pub title: String,
    pub text: String,
}

impl OutboundMessage {
    /// Create a text message
    pub fn text(content: impl Into<String>) -> Self {
        OutboundMessage::Text {
            text: TextContent {
                content: content.into(),
            },
        }
    }

    /// Create a markdown message
    pub fn markdown(title: impl Into<String>, text: impl Into<String>) -> Self {
        OutboundMessage::Markdown {
            markdown: MarkdownContent {
                title: title.into(),
                text: text.into(),
            },
        }
    }

    /// The `msgtype` tag this message serializes with
    pub fn msgtype(&self) -> &'static str {
        match self {
            OutboundMessage::Text { .. } => "text",
            OutboundMessage::Markdown { .. } => "markdown",
        }
    }

    /// Serialize into a JSON request body
    pub fn to_body(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(Error::encode_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_text_wire_format() {
        let body = OutboundMessage::text("test").to_body().unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            r#"{"msgtype":"text","text":{"content":"test"}}"#
        );
    }

    #[test]
    fn test_markdown_wire_format() {
        let body = OutboundMessage::markdown("title", "text").to_body().unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            json!({"markdown": {"title": "title", "text": "text"}, "msgtype": "markdown"})
        );
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let body = OutboundMessage::text("line1\n\"quoted\"").to_body().unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["text"]["content"], "line1\n\"quoted\"");
    }

    #[test]
    fn test_msgtype() {
        assert_eq!(OutboundMessage::text("a").msgtype(), "text");
        assert_eq!(OutboundMessage::markdown("a", "b").msgtype(), "markdown");
    }
}
