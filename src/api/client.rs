//! HTTP client for a running log server

use crate::api::types::{ConsumeRequest, ConsumeResponse, ProduceRequest, ProduceResponse};
use crate::common::{Error, Result};
use crate::log::Record;
use bytes::Bytes;
use reqwest::StatusCode;

#[derive(Debug, Clone)]
pub struct LogClient {
    url: String,
    http: reqwest::Client,
}

impl LogClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8080`
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies, TLS)
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            url: format!("{}/", base_url.trim_end_matches('/')),
            http,
        }
    }

    /// Append `value` to the log and return its offset
    pub async fn produce(&self, value: impl Into<Bytes>) -> Result<u64> {
        let request = ProduceRequest {
            record: Record::new(value),
        };
        let response = self.http.post(&self.url).json(&request).send().await?;
        let response = error_for_status(response).await?;

        let body: ProduceResponse = response.json().await?;
        Ok(body.offset)
    }

    /// Read the record at `offset`
    pub async fn consume(&self, offset: u64) -> Result<Record> {
        let response = self
            .http
            .get(&self.url)
            .json(&ConsumeRequest { offset })
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::OffsetNotFound(offset));
        }
        let response = error_for_status(response).await?;

        let body: ConsumeResponse = response.json().await?;
        Ok(body.record)
    }
}

/// Turn a non-2xx response into `Error::Http` carrying the server's message
async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or(text);

    Err(Error::Http(format!("{}: {}", status, message)))
}
