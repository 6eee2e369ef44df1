//! End-to-end transaction submission: preprocess, sign, submit, poll.
//!
//! Coordinates the tx, crypto and client crates. `Submitter::submit_and_poll`
//! is the entry point most callers need.

pub mod preprocess;

use serde_json::Value;
use tokio::sync::watch;
use gitchain_client::{BatchPoller, ClientConfig, RestClient, SubmitResponse};
use gitchain_crypto::Signer;
use gitchain_tx::{encode_batch_list, sign_batch, sign_transaction};
use gitchain_types::{GitchainError, Result, Transaction};

pub use preprocess::{Preprocessor, PreprocessorRegistry};

/// Per-call inputs.
#[derive(Clone)]
pub struct SubmitOptions {
    /// Hex-encoded secp256k1 private key.
    pub private_key: String,
    pub transaction: Transaction,
    /// Overrides the configured endpoint for this call.
    pub api_base: Option<String>,
    pub cancel: Option<watch::Receiver<bool>>,
}

impl SubmitOptions {
    pub fn new(private_key: &str, transaction: Transaction) -> Self {
        Self {
            private_key: private_key.to_string(),
            transaction,
            api_base: None,
            cancel: None,
        }
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = Some(api_base.to_string());
        self
    }

    pub fn with_cancel(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

impl std::fmt::Debug for SubmitOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmitOptions")
            .field("transaction", &self.transaction)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

/// Builds, signs and submits Gitchain transactions.
pub struct Submitter {
    config: ClientConfig,
    client: RestClient,
    preprocessors: PreprocessorRegistry,
}

impl Submitter {
    pub fn new(config: ClientConfig, preprocessors: PreprocessorRegistry) -> Result<Self> {
        let client = RestClient::new(&config.endpoint, Some(config.request_timeout_ms))?;
        Ok(Self { config, client, preprocessors })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn client_for(&self, api_base: Option<&str>) -> Result<RestClient> {
        let base = self.config.resolve_endpoint(api_base)?;
        Ok(self.client.with_base_url(base))
    }

    /// Preprocess, sign and submit one transaction in its own batch.
    ///
    /// Returns the ledger's response verbatim, including the status `link`.
    pub async fn send_transaction(&self, options: SubmitOptions) -> Result<SubmitResponse> {
        let signer = Signer::from_hex(&options.private_key)?;
        self.submit_batch(&signer, vec![options.transaction], options.api_base.as_deref())
            .await
    }

    /// Preprocess, sign and submit several transactions as one batch.
    /// Transaction ids in the batch header follow the order given here.
    pub async fn submit_batch(
        &self,
        signer: &Signer,
        transactions: Vec<Transaction>,
        api_base: Option<&str>,
    ) -> Result<SubmitResponse> {
        if transactions.is_empty() {
            return Err(GitchainError::Encoding("a batch needs at least one transaction".into()));
        }
        let client = self.client_for(api_base)?;

        let mut signed = Vec::with_capacity(transactions.len());
        for mut transaction in transactions {
            self.preprocessors.apply(&mut transaction, signer).await?;
            signed.push(sign_transaction(signer, &transaction)?);
        }

        let batch = sign_batch(signer, signed);
        tracing::info!(
            batch_id = %batch.header_signature,
            transactions = batch.transactions.len(),
            api_base = %client.base_url(),
            "submitting batch"
        );

        client.submit_batches(encode_batch_list(vec![batch])).await
    }

    /// Wait for the batch behind `status_link` to commit and fetch its record.
    pub async fn get_batch_data(
        &self,
        status_link: &str,
        api_base: Option<&str>,
        cancel: Option<watch::Receiver<bool>>,
    ) -> Result<Value> {
        let client = self.client_for(api_base)?;
        let mut poller = BatchPoller::new(&client, self.config.poll.clone());
        if let Some(cancel) = cancel {
            poller = poller.with_cancel(cancel);
        }
        poller.get_batch_data(status_link).await
    }

    /// Submit a transaction and wait for the committed batch record.
    pub async fn submit_and_poll(&self, options: SubmitOptions) -> Result<Value> {
        let api_base = options.api_base.clone();
        let cancel = options.cancel.clone();
        let response = self.send_transaction(options).await?;
        self.get_batch_data(&response.link, api_base.as_deref(), cancel)
            .await
    }
}
