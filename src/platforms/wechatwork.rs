//! WeChat Work (WeCom) group robot
//!
//! Webhook: `https://qyapi.weixin.qq.com/cgi-bin/webhook/send?key=<key>`,
//! where the key is a UUID. Markdown messages have no title field, so the
//! title is rendered as a heading above the text.

use url::Url;

use super::{
    build_text_body, is_url_like, query_param, with_query, PlatformDescriptor, Strategies,
};
use crate::error::{Error, Result};
use crate::types::{parse_envelope, WeChatWorkEnvelope};

const BASE_URL: &str = "https://qyapi.weixin.qq.com/cgi-bin/webhook/send";
const HOST: &str = "qyapi.weixin.qq.com";
const PATH: &str = "/cgi-bin/webhook/send";
const KEY_PARAM: &str = "key";

pub const INVALID_WEBHOOK_URL: &str = "invalid webhook url";

pub static DESCRIPTOR: PlatformDescriptor = PlatformDescriptor {
    name: "wechatwork",
    aliases: &["wecom", "wxwork"],
    url_template: "https://qyapi.weixin.qq.com/cgi-bin/webhook/send?key=<key>",
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

    let url = if is_url_like(token) {
        Url::parse(token).map_err(|_| Error::invalid_webhook_url(INVALID_WEBHOOK_URL))?
    } else {
        with_query(BASE_URL, KEY_PARAM, token)?
    };

    if is_well_formed(&url) {
        Ok(url)
    } else {
        Err(Error::invalid_webhook_url(INVALID_WEBHOOK_URL))
    }
}

fn is_well_formed(url: &Url) -> bool {
    url.scheme() == "https"
        && url.host_str() == Some(HOST)
        && url.path() == PATH
        && query_param(url, KEY_PARAM).is_some_and(|key| is_key(&key))
}

/// 8-4-4-4-12 hex groups
fn is_key(key: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

    let parts: Vec<&str> = key.split('-').collect();
    parts.len() == GROUPS.len()
        && parts
            .iter()
            .zip(GROUPS)
            .all(|(part, len)| part.len() == len && part.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// `{"msgtype":"markdown","markdown":{"content":...}}`
pub fn build_markdown_body(title: &str, text: &str) -> Result<Vec<u8>> {
    let content = if title.is_empty() {
        text.to_string()
    } else {
        format!("## {title}\n\n{text}")
    };

    let body = serde_json::json!({
        "msgtype": "markdown",
        "markdown": { "content": content },
    });
    serde_json::to_vec(&body).map_err(Error::encode_failed)
}

/// Success when `errcode == 0`
pub fn parse_response(body: &[u8]) -> Result<()> {
    parse_envelope::<WeChatWorkEnvelope>(body)
}
