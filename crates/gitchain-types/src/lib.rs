use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod status;
pub mod transaction;

pub use status::{BatchStatus, BatchStatusEntry, InvalidTransaction};
pub use transaction::Transaction;

/// Lowercase hex string without a `0x` prefix (keys, signatures, digests).
pub type Hex = String;

/// Whether a failed call may have reached the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionState {
    /// Failed before any batch bytes left the process, or the ledger
    /// explicitly refused them.
    NotSubmitted,
    /// The POST may or may not have been received (transport failure, 5xx).
    Unknown,
    /// The ledger accepted the batch; only the confirmation is missing.
    Submitted,
}

/// Gitchain client error types.
#[derive(Debug, Error)]
pub enum GitchainError {
    #[error("payload encoding failed: {0}")]
    Encoding(String),

    #[error("invalid private key: {0}")]
    Key(String),

    #[error("preprocessing failed for transaction type {tx_type}: {message}")]
    Preprocess { tx_type: String, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("batch submission failed: {message}")]
    Submission {
        state: SubmissionState,
        message: String,
    },

    #[error("REST API unavailable: {0}")]
    Unavailable(String),

    #[error("malformed batch status response: {0}")]
    Poll(String),

    #[error("batch not committed after {attempts} status queries (last status: {})", .last_status.as_deref().unwrap_or("none"))]
    Timeout {
        attempts: u32,
        last_status: Option<String>,
    },

    #[error("batch polling cancelled")]
    Cancelled,

    #[error("batch {batch_id} is invalid ({} invalid transactions)", .invalid_transactions.len())]
    BatchInvalid {
        batch_id: String,
        invalid_transactions: Vec<InvalidTransaction>,
    },
}

impl GitchainError {
    /// Classify how far the failed call got before it failed.
    pub fn submission_state(&self) -> SubmissionState {
        match self {
            GitchainError::Encoding(_)
            | GitchainError::Key(_)
            | GitchainError::Preprocess { .. }
            | GitchainError::Config(_) => SubmissionState::NotSubmitted,
            GitchainError::Submission { state, .. } => *state,
            GitchainError::Unavailable(_)
            | GitchainError::Poll(_)
            | GitchainError::Timeout { .. }
            | GitchainError::Cancelled
            | GitchainError::BatchInvalid { .. } => SubmissionState::Submitted,
        }
    }

    /// Errors worth retrying on the next poll attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, GitchainError::Unavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, GitchainError>;

/// Decode a hex string, tolerating an optional `0x` prefix.
pub fn hex_to_bytes(hex_str: &str) -> std::result::Result<Vec<u8>, hex::FromHexError> {
    let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    hex::decode(hex_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_state_classification() {
        assert_eq!(
            GitchainError::Key("bad".into()).submission_state(),
            SubmissionState::NotSubmitted
        );
        assert_eq!(
            GitchainError::Submission {
                state: SubmissionState::Unknown,
                message: "connection reset".into(),
            }
            .submission_state(),
            SubmissionState::Unknown
        );
        assert_eq!(
            GitchainError::Timeout { attempts: 3, last_status: None }.submission_state(),
            SubmissionState::Submitted
        );
        assert_eq!(GitchainError::Cancelled.submission_state(), SubmissionState::Submitted);
    }

    #[test]
    fn test_timeout_message_names_last_status() {
        let err = GitchainError::Timeout {
            attempts: 5,
            last_status: Some("PENDING".into()),
        };
        assert_eq!(
            err.to_string(),
            "batch not committed after 5 status queries (last status: PENDING)"
        );
    }

    #[test]
    fn test_hex_to_bytes_prefix() {
        assert_eq!(hex_to_bytes("0x0aff").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(hex_to_bytes("0aff").unwrap(), vec![0x0a, 0xff]);
        assert!(hex_to_bytes("zz").is_err());
    }
}
