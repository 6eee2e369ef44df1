//! HTTP client for the ledger REST API.
//!
//! Endpoints:
//! - POST /batches (body: BatchList bytes)
//! - GET <link> (batch status query returned by POST /batches)
//! - GET /batches/<batch_id>

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;
use gitchain_types::{BatchStatusEntry, GitchainError, Result, SubmissionState};

use crate::parse_base_url;

/// Response to a batch submission. Fields besides `link` are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub link: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a batch status query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub data: Vec<BatchStatusEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Ledger REST client.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: Url,
    client: reqwest::Client,
    timeout: Duration,
}

impl RestClient {
    pub fn new(base_url: &str, timeout_ms: Option<u64>) -> Result<Self> {
        let timeout_ms = timeout_ms.unwrap_or(30_000);
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            client: reqwest::Client::builder()
                .timeout(Duration::from_millis(timeout_ms))
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Same connection pool, different API base.
    pub fn with_base_url(&self, base_url: Url) -> Self {
        Self {
            base_url,
            client: self.client.clone(),
            timeout: self.timeout,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the API base.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| GitchainError::Config(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Resolve a status link, which is usually absolute, against the API base.
    pub fn resolve_link(&self, link: &str) -> Result<Url> {
        self.base_url
            .join(link)
            .map_err(|e| GitchainError::Poll(format!("invalid status link {:?}: {}", link, e)))
    }

    /// Submit an encoded batch list.
    ///
    /// POST /batches
    pub async fn submit_batches(&self, batch_list: Vec<u8>) -> Result<SubmitResponse> {
        let url = self.endpoint(&["batches"])?;
        tracing::debug!(%url, bytes = batch_list.len(), "submitting batch list");

        let resp = self.client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(batch_list)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| GitchainError::Submission {
                // A failed connect means no bytes reached the ledger.
                state: if e.is_connect() {
                    SubmissionState::NotSubmitted
                } else {
                    SubmissionState::Unknown
                },
                message: format!("request failed: {}", e),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GitchainError::Submission {
                state: if status.is_client_error() {
                    SubmissionState::NotSubmitted
                } else {
                    SubmissionState::Unknown
                },
                message: format!("ledger returned status {}: {}", status, body),
            });
        }

        let body = resp.bytes().await.map_err(|e| GitchainError::Submission {
            state: SubmissionState::Submitted,
            message: format!("failed to read response: {}", e),
        })?;
        let response: SubmitResponse =
            serde_json::from_slice(&body).map_err(|e| GitchainError::Submission {
                state: SubmissionState::Submitted,
                message: format!("failed to parse response: {}", e),
            })?;

        tracing::info!(link = %response.link, "batch list accepted");
        Ok(response)
    }

    /// Query the status of a submitted batch and return the first entry.
    ///
    /// GET <status_url>
    pub async fn batch_status(&self, status_url: &Url) -> Result<BatchStatusEntry> {
        let body = self.get_json(status_url.clone()).await?;
        let mut response: StatusResponse = serde_json::from_value(body)
            .map_err(|e| GitchainError::Poll(format!("failed to parse status response: {}", e)))?;
        if response.data.is_empty() {
            return Err(GitchainError::Poll("status response has an empty data array".into()));
        }
        Ok(response.data.swap_remove(0))
    }

    /// Fetch a batch record, returned exactly as the ledger sent it.
    ///
    /// GET /batches/<batch_id>
    pub async fn get_batch(&self, batch_id: &str) -> Result<Value> {
        let url = self.endpoint(&["batches", batch_id])?;
        self.get_json(url).await
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        tracing::debug!(%url, "GET");

        let resp = self.client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| GitchainError::Unavailable(format!("GET {} failed: {}", url, e)))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(GitchainError::Unavailable(format!(
                "GET {} returned status {}",
                url, status
            )));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GitchainError::Poll(format!(
                "GET {} returned status {}: {}",
                url, status, body
            )));
        }

        resp.json()
            .await
            .map_err(|e| GitchainError::Poll(format!("failed to parse response from {}: {}", url, e)))
    }
}
