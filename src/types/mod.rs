//! Core types for librobot
//!
//! Platform-agnostic message and response types shared by all platforms.

pub mod message;
pub mod response;

// Re-export for convenience
pub use message::{MarkdownContent, OutboundMessage, TextContent};
pub use response::{
    parse_envelope, DingTalkEnvelope, Envelope, Outcome, WeChatWorkEnvelope, WebhookEnvelope,
};
