//! Platform registry
//!
//! Each supported chat platform is described by a static [`PlatformDescriptor`]:
//! how to turn a token into a webhook URL, and the three strategy functions the
//! [`Robot`](crate::Robot) runs when sending. The table is built at compile
//! time and never mutated, so lookups need no locking.

pub mod dingtalk;
pub mod webhook;
pub mod wechatwork;

use url::Url;

use crate::error::{Error, Result};
use crate::types::OutboundMessage;

/// Serializes a text message into a request body
pub type TextBodyBuilder = fn(&str) -> Result<Vec<u8>>;

/// Serializes a markdown message (title, text) into a request body
pub type MarkdownBodyBuilder = fn(&str, &str) -> Result<Vec<u8>>;

/// Classifies a raw response body: `Ok(())` means delivered
pub type ResponseErrorParser = fn(&[u8]) -> Result<()>;

/// Turns the caller's token into a validated webhook URL
pub type WebhookResolver = fn(&str) -> Result<Url>;

/// The per-platform functions used by the send pipeline
#[derive(Debug, Clone, Copy)]
pub struct Strategies {
    pub build_text: TextBodyBuilder,
    pub build_markdown: MarkdownBodyBuilder,
    pub parse_error: ResponseErrorParser,
}

/// Static description of one platform's wire conventions
#[derive(Debug)]
pub struct PlatformDescriptor {
    /// Canonical identifier
    pub name: &'static str,
    /// Other identifiers accepted for this platform
    pub aliases: &'static [&'static str],
    /// Human-readable shape of the webhook URL
    pub url_template: &'static str,
    pub resolve: WebhookResolver,
    pub strategies: Strategies,
}

impl PlatformDescriptor {
    fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

static PLATFORMS: &[&PlatformDescriptor] = &[
    &webhook::DESCRIPTOR,
    &dingtalk::DESCRIPTOR,
    &wechatwork::DESCRIPTOR,
];

/// Look up a platform by identifier or alias (case-insensitive)
pub fn descriptor(platform_name: &str) -> Option<&'static PlatformDescriptor> {
    let name = platform_name.trim();
    PLATFORMS.iter().copied().find(|d| d.matches(name))
}

/// Canonical identifiers of every supported platform
pub fn supported_platforms() -> impl Iterator<Item = &'static str> {
    PLATFORMS.iter().map(|d| d.name)
}

/// Resolve a platform and validate the token against its rules
///
/// Performs no I/O. Fails with `UnsupportedPlatform` for an unknown
/// identifier, or with the platform's own validation error.
pub fn resolve(platform_name: &str, token: &str) -> Result<(&'static PlatformDescriptor, Url)> {
    let descriptor =
        descriptor(platform_name).ok_or_else(|| Error::unsupported_platform(platform_name))?;
    let url = (descriptor.resolve)(token)?;
    Ok((descriptor, url))
}

/// Text body in the shared `{"msgtype":"text",...}` shape
pub fn build_text_body(content: &str) -> Result<Vec<u8>> {
    OutboundMessage::text(content).to_body()
}

/// Markdown body in the shared `{"msgtype":"markdown",...}` shape
pub fn build_markdown_body(title: &str, text: &str) -> Result<Vec<u8>> {
    OutboundMessage::markdown(title, text).to_body()
}

/// True when `token` was pasted as a full URL rather than a bare token
pub(crate) fn is_url_like(token: &str) -> bool {
    token.starts_with("http://") || token.starts_with("https://")
}

/// First value of query parameter `key`
pub(crate) fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// `base` with `key=value` appended to its query string
pub(crate) fn with_query(base: &str, key: &str, value: &str) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| Error::invalid_webhook_url(format!("invalid webhook url: {e}")))?;
    url.query_pairs_mut().append_pair(key, value);
    Ok(url)
}
