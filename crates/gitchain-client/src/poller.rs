//! Batch commit polling.
//!
//! Repeats the status query behind a submission link until the batch is
//! COMMITTED, the policy budget runs out, or the caller cancels.
//! - PENDING / UNKNOWN / unrecognized: keep polling
//! - INVALID: fail with `BatchInvalid`
//! - transient REST failures (transport, 429, 5xx): keep polling

use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tokio::time::Instant;
use url::Url;
use gitchain_types::{BatchStatus, GitchainError, Result};

use crate::rest_client::RestClient;
use crate::PollPolicy;

/// Polls batch statuses through a borrowed client.
pub struct BatchPoller<'a> {
    client: &'a RestClient,
    policy: PollPolicy,
    cancel: Option<watch::Receiver<bool>>,
}

impl<'a> BatchPoller<'a> {
    pub fn new(client: &'a RestClient, policy: PollPolicy) -> Self {
        Self { client, policy, cancel: None }
    }

    /// Stop polling with `Cancelled` once the channel holds `true`.
    pub fn with_cancel(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Wait until the batch behind `status_link` is committed; returns its id.
    pub async fn wait_for_commit(&self, status_link: &str) -> Result<String> {
        let url = self.client.resolve_link(status_link)?;
        match self.cancel.clone() {
            Some(mut cancel) => tokio::select! {
                biased;
                _ = cancelled(&mut cancel) => {
                    tracing::info!(%url, "batch polling cancelled");
                    Err(GitchainError::Cancelled)
                }
                result = self.poll_until_committed(&url) => result,
            },
            None => self.poll_until_committed(&url).await,
        }
    }

    /// Wait for the commit, then fetch the full batch record.
    pub async fn get_batch_data(&self, status_link: &str) -> Result<Value> {
        let batch_id = self.wait_for_commit(status_link).await?;
        self.client.get_batch(&batch_id).await
    }

    async fn poll_until_committed(&self, url: &Url) -> Result<String> {
        let deadline = self
            .policy
            .deadline_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms));
        let interval = Duration::from_millis(self.policy.interval_ms);
        let exhausted = |attempts: u32| self.policy.max_attempts.is_some_and(|max| attempts >= max);

        let mut attempts = 0u32;
        let mut last_status: Option<String> = None;

        loop {
            if exhausted(attempts) {
                return Err(GitchainError::Timeout { attempts, last_status });
            }
            attempts += 1;

            let query = self.client.batch_status(url);
            let result = match deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, query).await {
                    Ok(result) => result,
                    Err(_) => return Err(GitchainError::Timeout { attempts, last_status }),
                },
                None => query.await,
            };

            match result {
                Ok(entry) => match entry.batch_status() {
                    BatchStatus::Committed => {
                        tracing::info!(batch_id = %entry.id, attempts, "batch committed");
                        return Ok(entry.id);
                    }
                    BatchStatus::Invalid => {
                        tracing::warn!(
                            batch_id = %entry.id,
                            invalid = entry.invalid_transactions.len(),
                            "batch rejected as invalid"
                        );
                        return Err(GitchainError::BatchInvalid {
                            batch_id: entry.id,
                            invalid_transactions: entry.invalid_transactions,
                        });
                    }
                    status => {
                        tracing::debug!(batch_id = %entry.id, %status, attempts, "batch not committed yet");
                        last_status = Some(status.to_string());
                    }
                },
                Err(e) if e.is_transient() => {
                    tracing::warn!(error = %e, attempts, "status query failed, will retry");
                }
                Err(e) => return Err(e),
            }

            if exhausted(attempts) {
                return Err(GitchainError::Timeout { attempts, last_status });
            }

            let wake = Instant::now() + interval;
            if deadline.is_some_and(|deadline| wake >= deadline) {
                return Err(GitchainError::Timeout { attempts, last_status });
            }
            tokio::time::sleep_until(wake).await;
        }
    }
}

/// Resolves once cancellation is requested; never resolves if the sender is gone.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    let sender_dropped = cancel.wait_for(|cancelled| *cancelled).await.is_err();
    if sender_dropped {
        std::future::pending::<()>().await;
    }
}
