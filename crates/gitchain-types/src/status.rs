//! Batch status as reported by the ledger's `batch_statuses` resource.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Parsed batch status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    Committed,
    Pending,
    Invalid,
    Unknown,
    Other(String),
}

impl BatchStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "COMMITTED" => BatchStatus::Committed,
            "PENDING" => BatchStatus::Pending,
            "INVALID" => BatchStatus::Invalid,
            "UNKNOWN" => BatchStatus::Unknown,
            other => BatchStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BatchStatus::Committed => "COMMITTED",
            BatchStatus::Pending => "PENDING",
            BatchStatus::Invalid => "INVALID",
            BatchStatus::Unknown => "UNKNOWN",
            BatchStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction the validator rejected, reported alongside an INVALID batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidTransaction {
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_data: Option<String>,
}

/// One element of the `data` array returned by a status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStatusEntry {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub invalid_transactions: Vec<InvalidTransaction>,
}

impl BatchStatusEntry {
    pub fn batch_status(&self) -> BatchStatus {
        BatchStatus::parse(&self.status)
    }
}
