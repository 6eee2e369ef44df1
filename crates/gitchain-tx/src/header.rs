//! Transaction and batch header construction.
//!
//! TransactionHeader fields:
//! - family name / version: fixed protocol constants
//! - inputs / outputs: state addresses from `meta.inputs` / `meta.outputs`
//! - signer and batcher public keys (always the same key here)
//! - dependencies: always empty
//! - payload_sha512: lowercase hex SHA-512 of the encoded payload

use prost::Message;
use gitchain_crypto::digest::sha512_hex;

use crate::protos;
use crate::{FAMILY_NAME, FAMILY_VERSION};

/// Build the canonical header message for a payload.
pub fn transaction_header(
    payload: &[u8],
    inputs: &[String],
    outputs: &[String],
    signer_public_key: &str,
    batcher_public_key: &str,
) -> protos::TransactionHeader {
    protos::TransactionHeader {
        batcher_public_key: batcher_public_key.to_string(),
        dependencies: Vec::new(),
        family_name: FAMILY_NAME.to_string(),
        family_version: FAMILY_VERSION.to_string(),
        inputs: inputs.to_vec(),
        nonce: String::new(),
        outputs: outputs.to_vec(),
        payload_sha512: sha512_hex(payload),
        signer_public_key: signer_public_key.to_string(),
    }
}

/// Encode the transaction header to the bytes that get signed.
pub fn build_transaction_header(
    payload: &[u8],
    inputs: &[String],
    outputs: &[String],
    signer_public_key: &str,
    batcher_public_key: &str,
) -> Vec<u8> {
    transaction_header(payload, inputs, outputs, signer_public_key, batcher_public_key)
        .encode_to_vec()
}

/// Encode a batch header. `transaction_ids` are the header signatures of the
/// batch's transactions, in batch order.
pub fn build_batch_header(signer_public_key: &str, transaction_ids: &[String]) -> Vec<u8> {
    protos::BatchHeader {
        signer_public_key: signer_public_key.to_string(),
        transaction_ids: transaction_ids.to_vec(),
    }
    .encode_to_vec()
}
