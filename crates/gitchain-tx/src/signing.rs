//! Header signing: logical transaction → signed wire transaction → signed batch.
//!
//! The batcher key is always the signer's key, so every batch built here is a
//! single-signer batch.

use gitchain_crypto::Signer;
use gitchain_types::{Result, Transaction};

use crate::assembler::{assemble_batch, assemble_transaction};
use crate::encoder::encode_payload;
use crate::header::{build_batch_header, build_transaction_header};
use crate::protos;

/// Encode, hash, and sign a logical transaction.
pub fn sign_transaction(signer: &Signer, transaction: &Transaction) -> Result<protos::Transaction> {
    let payload = encode_payload(transaction)?;
    let inputs = transaction.inputs()?;
    let outputs = transaction.outputs()?;
    let public_key = signer.public_key();

    let header = build_transaction_header(&payload, &inputs, &outputs, &public_key, &public_key);
    let signature = signer.sign(&header);

    tracing::debug!(
        tx_type = transaction.tx_type(),
        transaction_id = %signature,
        payload_len = payload.len(),
        "signed transaction"
    );

    Ok(assemble_transaction(header, signature, payload))
}

/// Wrap signed transactions in a batch signed by the same key.
pub fn sign_batch(signer: &Signer, transactions: Vec<protos::Transaction>) -> protos::Batch {
    let transaction_ids: Vec<String> = transactions
        .iter()
        .map(|tx| tx.header_signature.clone())
        .collect();
    let header = build_batch_header(&signer.public_key(), &transaction_ids);
    let signature = signer.sign(&header);

    tracing::debug!(batch_id = %signature, transactions = transaction_ids.len(), "signed batch");

    assemble_batch(header, signature, transactions)
}
