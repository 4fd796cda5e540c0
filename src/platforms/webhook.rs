//! Generic webhook platform
//!
//! The caller passes the complete webhook URL as the token; it is used as-is.
//! Responses follow the `{"errmsg": ..., "errcode": ...}` convention.

use url::Url;

use super::{build_markdown_body, build_text_body, PlatformDescriptor, Strategies};
use crate::error::{Error, Result};
use crate::types::{parse_envelope, WebhookEnvelope};

pub static DESCRIPTOR: PlatformDescriptor = PlatformDescriptor {
    name: "webhook",
    aliases: &["default", "generic"],
    url_template: "<webhook url>",
    resolve,
    strategies: STRATEGIES,
};

pub const STRATEGIES: Strategies = Strategies {
    build_text: build_text_body,
    build_markdown: build_markdown_body,
    parse_error: parse_response,
};

fn resolve(token: &str) -> Result<Url> {
    let url = Url::parse(token.trim())
        .map_err(|e| Error::invalid_webhook_url(format!("invalid webhook url: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(Error::invalid_webhook_url(format!(
            "invalid webhook url: unsupported scheme or missing host in '{}'",
            url.scheme()
        )));
    }

    Ok(url)
}

/// Success when `errmsg == "ok"`
pub fn parse_response(body: &[u8]) -> Result<()> {
    parse_envelope::<WebhookEnvelope>(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_url_used_as_is() {
        let url = resolve("http://127.0.0.1:8080/send?token=token").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/send?token=token");
    }

    #[test]
    fn test_rejects_relative_url() {
        let err = resolve("send?token=token").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidWebhookUrl);
        assert!(err.message.contains("invalid webhook url"));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = resolve("ftp://example.com/send").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidWebhookUrl);
    }

    #[test]
    fn test_rejects_empty() {
        assert!(resolve("").is_err());
    }
}
