//! DingTalk custom robot
//!
//! Webhook: `https://oapi.dingtalk.com/robot/send?access_token=<token>`.
//!
//! The access token check is local and syntactic only: DingTalk tokens are 64
//! hex digits. A well-formed token can still be rejected by DingTalk, which
//! then surfaces as `SendMessageFailed` at send time.

use url::Url;

use super::{
    build_markdown_body, build_text_body, is_url_like, query_param, with_query,
    PlatformDescriptor, Strategies,
};
use crate::error::{Error, Result};
use crate::types::{parse_envelope, DingTalkEnvelope};

const BASE_URL: &str = "https://oapi.dingtalk.com/robot/send";
const HOST: &str = "oapi.dingtalk.com";
const PATH: &str = "/robot/send";
const TOKEN_PARAM: &str = "access_token";
const TOKEN_LEN: usize = 64;

/// Same wording DingTalk itself answers with for an unknown token
pub const TOKEN_NOT_EXIST: &str = "token is not exist";

pub static DESCRIPTOR: PlatformDescriptor = PlatformDescriptor {
    name: "dingtalk",
    aliases: &["ding"],
    url_template: "https://oapi.dingtalk.com/robot/send?access_token=<token>",
    resolve,
    strategies: STRATEGIES,
};

pub const STRATEGIES: Strategies = Strategies {
    build_text: build_text_body,
    build_markdown: build_markdown_body,
    parse_error: parse_response,
};

fn resolve(token: &str) -> Result<Url> {
    let token = token.trim();

    if !is_url_like(token) {
        if !is_access_token(token) {
            return Err(Error::invalid_credential(TOKEN_NOT_EXIST));
        }
        return with_query(BASE_URL, TOKEN_PARAM, token);
    }

    // A webhook URL copied from the DingTalk console is kept as-is, including
    // signing parameters such as `timestamp` and `sign`
    let url = Url::parse(token).map_err(|_| Error::invalid_credential(TOKEN_NOT_EXIST))?;
    let well_formed = url.scheme() == "https"
        && url.host_str() == Some(HOST)
        && url.path() == PATH
        && query_param(&url, TOKEN_PARAM).is_some_and(|t| is_access_token(&t));

    if well_formed {
        Ok(url)
    } else {
        Err(Error::invalid_credential(TOKEN_NOT_EXIST))
    }
}

fn is_access_token(token: &str) -> bool {
    token.len() == TOKEN_LEN && token.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Success when `errcode == 0`
pub fn parse_response(body: &[u8]) -> Result<()> {
    parse_envelope::<DingTalkEnvelope>(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    const TOKEN: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn test_builds_url_from_token() {
        let url = resolve(TOKEN).unwrap();
        assert_eq!(url.host_str(), Some(HOST));
        assert_eq!(url.path(), "/robot/send");
        assert_eq!(query_param(&url, "access_token").as_deref(), Some(TOKEN));
    }

    #[test]
    fn test_accepts_console_url() {
        let pasted = format!("https://oapi.dingtalk.com/robot/send?access_token={TOKEN}");
        let url = resolve(&pasted).unwrap();
        assert_eq!(url.as_str(), pasted);
    }

    #[test]
    fn test_console_url_keeps_signing_params() {
        let pasted = format!(
            "https://oapi.dingtalk.com/robot/send?access_token={TOKEN}&timestamp=1700000000000&sign=abc%2B%3D"
        );
        let url = resolve(&pasted).unwrap();
        assert_eq!(url.as_str(), pasted);
        assert_eq!(query_param(&url, "timestamp").as_deref(), Some("1700000000000"));
        assert_eq!(query_param(&url, "sign").as_deref(), Some("abc+="));
    }

    #[test]
    fn test_console_url_wrong_path() {
        let pasted = format!("https://oapi.dingtalk.com/other?access_token={TOKEN}");
        assert_eq!(resolve(&pasted).unwrap_err().code, ErrorCode::InvalidCredential);
    }

    #[test]
    fn test_rejects_placeholder_token() {
        let err = resolve("token").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredential);
        assert!(err.to_string().contains("token is not exist"));
    }

    #[test]
    fn test_rejects_empty_token() {
        let err = resolve("").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredential);
    }

    #[test]
    fn test_rejects_non_hex_token() {
        let token = "z".repeat(TOKEN_LEN);
        assert!(resolve(&token).is_err());
    }

    #[test]
    fn test_rejects_foreign_host() {
        let pasted = format!("https://example.com/robot/send?access_token={TOKEN}");
        let err = resolve(&pasted).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredential);
    }

    #[test]
    fn test_console_url_without_token() {
        assert!(resolve("https://oapi.dingtalk.com/robot/send").is_err());
    }
}
