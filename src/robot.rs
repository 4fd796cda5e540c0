//! Webhook robot: the generic send pipeline
//!
//! A [`Robot`] is bound to one webhook and one set of platform
//! [`Strategies`] when it is built. Every send runs the same steps: build
//! the body, POST it once, hand the response body to the platform parser.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::platforms::{self, Strategies};
use crate::types::OutboundMessage;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport options for a [`Robot`]
#[derive(Debug, Clone)]
pub struct RobotOptions {
    /// Per-request timeout covering connect, send and reading the body
    pub timeout: Duration,
    /// Overrides reqwest's default `User-Agent`
    pub user_agent: Option<String>,
}

impl Default for RobotOptions {
    fn default() -> Self {
        RobotOptions {
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }
}

impl RobotOptions {
    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the `User-Agent` header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Sends text and markdown messages to a single chat webhook
///
/// Immutable once built; clone it or share it by reference across tasks.
#[derive(Debug, Clone)]
pub struct Robot {
    platform: &'static str,
    webhook: Url,
    strategies: Strategies,
    client: Client,
}

impl Robot {
    /// Create a robot for a registered platform
    ///
    /// # Arguments
    /// * `platform` - Platform identifier (e.g., "webhook", "dingtalk", "wechatwork")
    /// * `token` - Platform token, or the full webhook URL
    ///
    /// # Returns
    /// A Result containing the Robot, or the platform's validation error.
    /// No request is made either way.
    pub fn new(platform: &str, token: &str) -> Result<Self> {
        Self::with_options(platform, token, RobotOptions::default())
    }

    /// Create a robot for a registered platform with custom transport options
    pub fn with_options(platform: &str, token: &str, options: RobotOptions) -> Result<Self> {
        let (descriptor, webhook) = platforms::resolve(platform, token)?;
        Self::build(descriptor.name, webhook, descriptor.strategies, &options)
    }

    /// Create a robot from caller-supplied strategies
    ///
    /// Useful for webhooks that speak a convention not in the registry.
    pub fn from_strategies(webhook: &str, strategies: Strategies, options: RobotOptions) -> Result<Self> {
        let webhook = Url::parse(webhook)
            .map_err(|e| Error::invalid_webhook_url(format!("invalid webhook url: {e}")))?;
        Self::build("custom", webhook, strategies, &options)
    }

    fn build(
        platform: &'static str,
        webhook: Url,
        strategies: Strategies,
        options: &RobotOptions,
    ) -> Result<Self> {
        let mut builder = Client::builder().timeout(options.timeout);
        if let Some(user_agent) = &options.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        let client = builder
            .build()
            .map_err(|e| Error::request_failed(format!("failed to create HTTP client: {e}")))?;

        debug!(
            platform,
            host = webhook.host_str().unwrap_or_default(),
            timeout_ms = options.timeout.as_millis() as u64,
            "robot configured"
        );

        Ok(Robot {
            platform,
            webhook,
            strategies,
            client,
        })
    }

    /// Platform identifier this robot was built for
    pub fn platform(&self) -> &'static str {
        self.platform
    }

    /// The resolved webhook URL
    pub fn webhook(&self) -> &Url {
        &self.webhook
    }

    /// Send a plain text message
    pub async fn send_text_message(&self, content: &str) -> Result<()> {
        let body = (self.strategies.build_text)(content)?;
        self.post(body).await
    }

    /// Send a markdown message
    pub async fn send_markdown_message(&self, title: &str, text: &str) -> Result<()> {
        let body = (self.strategies.build_markdown)(title, text)?;
        self.post(body).await
    }

    /// Send either kind of message
    pub async fn send(&self, message: &OutboundMessage) -> Result<()> {
        match message {
            OutboundMessage::Text { text } => self.send_text_message(&text.content).await,
            OutboundMessage::Markdown { markdown } => {
                self.send_markdown_message(&markdown.title, &markdown.text)
                    .await
            }
        }
    }

    /// POST the body and classify the response
    ///
    /// The status code is not inspected: platforms report rejections in the
    /// envelope, usually with a 200.
    async fn post(&self, body: Vec<u8>) -> Result<()> {
        debug!(platform = self.platform, bytes = body.len(), "posting webhook message");

        // without_url keeps the token out of error messages
        let response = self
            .client
            .post(self.webhook.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::request_failed(e.without_url()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::request_failed(e.without_url()))?;

        debug!(platform = self.platform, %status, bytes = bytes.len(), "webhook responded");

        (self.strategies.parse_error)(&bytes)
    }
}
