//! Per-type transaction preprocessing hooks.
//!
//! A preprocessor enriches a transaction of one `type` before it is encoded,
//! e.g. filling in derived fields or `meta.inputs` / `meta.outputs`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use gitchain_crypto::Signer;
use gitchain_types::{GitchainError, Result, Transaction};

#[async_trait]
pub trait Preprocessor: Send + Sync {
    /// Mutate `transaction` in place. `signer` is the key that will sign it.
    async fn preprocess(&self, transaction: &mut Transaction, signer: &Signer) -> Result<()>;
}

/// Preprocessors keyed by transaction `type`.
#[derive(Clone, Default)]
pub struct PreprocessorRegistry {
    handlers: HashMap<String, Arc<dyn Preprocessor>>,
}

impl PreprocessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the preprocessor for `tx_type`.
    pub fn register<P: Preprocessor + 'static>(&mut self, tx_type: &str, preprocessor: P) -> &mut Self {
        self.handlers.insert(tx_type.to_string(), Arc::new(preprocessor));
        self
    }

    pub fn with<P: Preprocessor + 'static>(mut self, tx_type: &str, preprocessor: P) -> Self {
        self.register(tx_type, preprocessor);
        self
    }

    pub fn get(&self, tx_type: &str) -> Option<&Arc<dyn Preprocessor>> {
        self.handlers.get(tx_type)
    }

    /// Run the preprocessor registered for the transaction's type, if any.
    pub async fn apply(&self, transaction: &mut Transaction, signer: &Signer) -> Result<()> {
        let tx_type = transaction.tx_type().to_string();
        let Some(preprocessor) = self.handlers.get(&tx_type) else {
            return Ok(());
        };

        tracing::debug!(tx_type = %tx_type, "preprocessing transaction");
        preprocessor
            .preprocess(transaction, signer)
            .await
            .map_err(|e| match e {
                GitchainError::Preprocess { .. } => e,
                other => GitchainError::Preprocess {
                    tx_type: tx_type.clone(),
                    message: other.to_string(),
                },
            })
    }
}

impl std::fmt::Debug for PreprocessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&String> = self.handlers.keys().collect();
        types.sort();
        f.debug_struct("PreprocessorRegistry").field("types", &types).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StampOwner;

    #[async_trait]
    impl Preprocessor for StampOwner {
        async fn preprocess(&self, transaction: &mut Transaction, signer: &Signer) -> Result<()> {
            transaction.insert("owner", json!(signer.public_key()));
            Ok(())
        }
    }

    struct Reject;

    #[async_trait]
    impl Preprocessor for Reject {
        async fn preprocess(&self, _: &mut Transaction, _: &Signer) -> Result<()> {
            Err(GitchainError::Encoding("blob upload failed".into()))
        }
    }

    #[tokio::test]
    async fn test_apply_runs_matching_preprocessor_only() {
        let registry = PreprocessorRegistry::new().with("createRepo", StampOwner);
        let signer = Signer::generate();

        let mut repo = Transaction::new("createRepo", "r1");
        registry.apply(&mut repo, &signer).await.unwrap();
        assert_eq!(repo.get("owner"), Some(&json!(signer.public_key())));

        let mut push = Transaction::new("push", "p1");
        registry.apply(&mut push, &signer).await.unwrap();
        assert_eq!(push.get("owner"), None);
    }

    #[tokio::test]
    async fn test_apply_wraps_errors() {
        let registry = PreprocessorRegistry::new().with("push", Reject);
        let mut tx = Transaction::new("push", "p1");

        let err = registry.apply(&mut tx, &Signer::generate()).await.unwrap_err();
        match err {
            GitchainError::Preprocess { tx_type, message } => {
                assert_eq!(tx_type, "push");
                assert!(message.contains("blob upload failed"));
            }
            other => panic!("expected preprocess error, got {:?}", other),
        }
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = PreprocessorRegistry::new();
        registry.register("push", Reject).register("push", StampOwner);
        assert!(registry.get("push").is_some());
        assert!(registry.get("createRepo").is_none());
        assert_eq!(format!("{:?}", registry), r#"PreprocessorRegistry { types: ["push"] }"#);
    }
}
