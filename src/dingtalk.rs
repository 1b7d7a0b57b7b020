use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("dingtalk {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Serialize)]
struct MarkdownPayload<'a> {
    msgtype: &'static str,
    markdown: MarkdownBody<'a>,
}

#[derive(Serialize)]
struct MarkdownBody<'a> {
    title: &'a str,
    text: &'a str,
}

/// DingTalk robot signature: HMAC-SHA256 keyed by the secret over
/// `"<timestamp_ms>\n<secret>"`, standard padded base64.
pub fn sign(secret: &str, timestamp_ms: i64) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(format!("{timestamp_ms}\n{secret}").as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Final request URL with `timestamp` and percent-encoded `sign` appended.
/// The timestamp in the query is the exact value the signature was computed
/// over; DingTalk rejects the request if they diverge.
pub fn signed_url(webhook: &str, secret: &str, timestamp_ms: i64) -> String {
    let signature = sign(secret, timestamp_ms);
    let escaped = utf8_percent_encode(&signature, NON_ALPHANUMERIC);
    format!("{webhook}&timestamp={timestamp_ms}&sign={escaped}")
}

pub struct Notifier {
    client: Client,
    webhook: String,
    secret: Option<String>,
}

impl Notifier {
    pub fn new(webhook: String, secret: Option<String>) -> Self {
        let client = Client::builder()
            .user_agent(concat!("dingstatus/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            webhook,
            secret,
        }
    }

    /// One POST, no retries. Anything other than HTTP 200 is a failure
    /// carrying the response body for diagnostics.
    pub async fn send_markdown(&self, title: &str, text: &str) -> Result<(), NotifyError> {
        let url = match &self.secret {
            Some(secret) => signed_url(&self.webhook, secret, now_millis()),
            None => self.webhook.clone(),
        };
        let payload = MarkdownPayload {
            msgtype: "markdown",
            markdown: MarkdownBody { title, text },
        };

        let response = self.client.post(&url).json(&payload).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
