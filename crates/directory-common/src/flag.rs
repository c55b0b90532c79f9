/// Outbound client for flagging a resource for review.
///
/// The receiving end is a no-code automation webhook: it is invoked with a plain GET
/// carrying the resource identifier as `?Resource=[<id>]` (brackets literal, the
/// format the automation's record-matching expects) and answers with a JSON body.
/// Nothing in the body is consumed beyond it parsing as JSON.
///
/// Flagging is fire-and-forget from the user's perspective: one attempt, bounded by
/// a timeout, no retry. The caller decides what to do with the outcome.
use std::time::Duration;

use reqwest::StatusCode;
use tracing::warn;

const MAX_ERROR_BODY_BYTES: usize = 8 * 1024;

#[derive(Clone, Debug)]
pub struct FlagClientConfig {
    /// Full URL of the flag webhook, without a query string.
    pub webhook_url: String,
    pub timeout: Duration,
}

impl FlagClientConfig {
    /// Load from environment variables. Returns `None` when `FLAG_WEBHOOK_URL` is
    /// unset, in which case flagging is disabled.
    ///
    /// Optional:
    /// - `FLAG_TIMEOUT_SECS`: request timeout (default 10)
    pub fn from_env() -> Option<Self> {
        let webhook_url = std::env::var("FLAG_WEBHOOK_URL").ok()?;

        let timeout = std::env::var("FLAG_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(10));

        Some(Self {
            webhook_url,
            timeout,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FlagError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("webhook returned error: status={status} body={body}")]
    Webhook { status: StatusCode, body: String },
}

#[derive(Clone)]
pub struct FlagClient {
    config: FlagClientConfig,
    http: reqwest::Client,
}

impl FlagClient {
    pub fn new(config: FlagClientConfig) -> Result<Self, FlagError> {
        let http = reqwest::Client::builder()
            .user_agent("resource-directory/flag-client")
            .build()?;
        Ok(Self { config, http })
    }

    /// Build a client around an existing `reqwest::Client` (used by tests).
    pub fn with_client(http: reqwest::Client, config: FlagClientConfig) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &FlagClientConfig {
        &self.config
    }

    /// Report a resource. Succeeds when the webhook answers 2xx with a JSON body.
    pub async fn flag_resource(&self, resource_id: &str) -> Result<(), FlagError> {
        // Brackets stay literal in the query string; percent-encoding them breaks
        // the automation's record match.
        let url = format!("{}?Resource=[{}]", self.config.webhook_url, resource_id);
        let resp = self
            .http
            .get(&url)
            .timeout(self.config.timeout)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = read_limited_text(resp, MAX_ERROR_BODY_BYTES).await;
            return Err(FlagError::Webhook { status, body });
        }

        let body = resp.text().await?;
        serde_json::from_str::<serde_json::Value>(&body)?;
        Ok(())
    }
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(mut b) => {
            if b.len() > max_bytes {
                b.truncate(max_bytes);
            }
            String::from_utf8_lossy(&b).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read webhook error body");
            "<failed to read error body>".to_string()
        }
    }
}
