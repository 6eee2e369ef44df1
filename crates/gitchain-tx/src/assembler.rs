//! Pure composition of signed wire objects. No hashing or signing here.

use prost::Message;
use gitchain_types::{GitchainError, Result};

use crate::protos::{Batch, BatchList, Transaction};

pub fn assemble_transaction(header: Vec<u8>, header_signature: String, payload: Vec<u8>) -> Transaction {
    Transaction {
        header,
        header_signature,
        payload,
    }
}

pub fn assemble_batch(header: Vec<u8>, header_signature: String, transactions: Vec<Transaction>) -> Batch {
    Batch {
        header,
        header_signature,
        transactions,
        trace: false,
    }
}

/// Serialize batches into the POST body for `/batches`.
pub fn encode_batch_list(batches: Vec<Batch>) -> Vec<u8> {
    BatchList { batches }.encode_to_vec()
}

pub fn decode_batch_list(bytes: &[u8]) -> Result<BatchList> {
    BatchList::decode(bytes).map_err(|e| GitchainError::Encoding(format!("invalid batch list: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_field_layout() {
        let tx = assemble_transaction(vec![0x01], "ab".into(), vec![0x02, 0x03]);
        // 1: header, 2: header_signature, 3: payload
        assert_eq!(hex::encode(tx.encode_to_vec()), "0a0101120261621a020203");
    }

    #[test]
    fn test_batch_list_preserves_order() {
        let txs: Vec<Transaction> = (0..3)
            .map(|i| assemble_transaction(vec![i], format!("sig{}", i), vec![i, i]))
            .collect();
        let first = assemble_batch(vec![0xaa], "batch-a".into(), txs.clone());
        let second = assemble_batch(vec![0xbb], "batch-b".into(), Vec::new());

        let bytes = encode_batch_list(vec![first, second]);
        let decoded = decode_batch_list(&bytes).unwrap();

        assert_eq!(decoded.batches.len(), 2);
        assert_eq!(decoded.batches[0].header_signature, "batch-a");
        assert_eq!(decoded.batches[0].transactions, txs);
        assert_eq!(decoded.batches[1].header_signature, "batch-b");
        assert!(!decoded.batches[0].trace);
    }

    #[test]
    fn test_empty_batch_list_is_empty_bytes() {
        assert!(encode_batch_list(Vec::new()).is_empty());
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode_batch_list(&[0x0a, 0xff]).is_err());
    }
}
