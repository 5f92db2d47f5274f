use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, error, warn};

/// Sends one JSON payload to a backend and decodes the JSON reply.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<Value>;
}

/// reqwest-backed transport. The client is built on first use and reused
/// for the lifetime of the process.
#[derive(Debug, Default)]
pub struct HttpTransport {
    client: OnceLock<reqwest::Client>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> &reqwest::Client {
        self.client.get_or_init(|| {
            debug!("Constructing backend HTTP client");
            reqwest::Client::new()
        })
    }
}

/// Flattens an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<Value> {
        debug!("Sending request to external API: {}", url);

        let response = self
            .client()
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                let reason = error_chain(&e);
                error!(url, "URL error: {}", reason);
                Error::connection(reason)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    let reason = error_chain(&e);
                    warn!(url, "Failed to read error response body: {}", reason);
                    format!("<unreadable response body: {}>", reason)
                }
            };
            error!(url, status = status.as_u16(), "HTTP error: {} - {}", status.as_u16(), body);
            return Err(Error::UpstreamHttp {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            let reason = error_chain(&e);
            error!(url, "Failed to read response body: {}", reason);
            Error::connection(reason)
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            error!(url, "External API returned invalid JSON: {}", e);
            Error::malformed(format!("backend returned invalid JSON: {}", e))
        })
    }
}
