//! Inbound response envelopes
//!
//! Each platform answers a webhook call with a small JSON envelope. Whatever
//! its shape, it reduces to an [`Outcome`]: delivered, or rejected with the
//! platform's own message.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};

/// What an envelope says about a delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Delivered,
    Rejected(String),
}

/// An envelope that can be reduced to an [`Outcome`]
pub trait Envelope: DeserializeOwned {
    fn outcome(self) -> Outcome;
}

/// Decode `body` as `E` and classify it
///
/// Shared by every platform parser; only the envelope type differs. Only the
/// first JSON value is read and anything after it is ignored. Missing
/// fields marked `#[serde(default)]` decode as empty.
pub fn parse_envelope<E: Envelope>(body: &[u8]) -> Result<()> {
    let envelope: E = serde_json::Deserializer::from_slice(body)
        .into_iter::<E>()
        .next()
        .ok_or_else(|| Error::decode_failed("EOF"))?
        .map_err(Error::decode_failed)?;
    match envelope.outcome() {
        Outcome::Delivered => Ok(()),
        Outcome::Rejected(message) => Err(Error::send_failed(message)),
    }
}

/// Generic webhook convention: success when `errmsg` is `"ok"`
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub errmsg: String,
    #[serde(default)]
    pub errcode: i64,
}

impl Envelope for WebhookEnvelope {
    fn outcome(self) -> Outcome {
        if self.errmsg == "ok" {
            Outcome::Delivered
        } else {
            Outcome::Rejected(self.errmsg)
        }
    }
}

/// DingTalk robot response
#[derive(Debug, Clone, Deserialize)]
pub struct DingTalkEnvelope {
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
}

impl Envelope for DingTalkEnvelope {
    fn outcome(self) -> Outcome {
        if self.errcode == 0 {
            Outcome::Delivered
        } else {
            Outcome::Rejected(self.errmsg)
        }
    }
}

/// WeChat Work group robot response
#[derive(Debug, Clone, Deserialize)]
pub struct WeChatWorkEnvelope {
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
}

impl Envelope for WeChatWorkEnvelope {
    fn outcome(self) -> Outcome {
        if self.errcode == 0 {
            Outcome::Delivered
        } else {
            Outcome::Rejected(self.errmsg)
        }
    }
}
