//! CBOR payload codec.
//!
//! Payloads are serialized through `serde` into CBOR. JSON objects are backed
//! by an ordered map, so keys are always emitted sorted and equal values give
//! equal bytes regardless of how the caller built them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use gitchain_types::{GitchainError, Result};

/// Encode a payload value as CBOR bytes.
pub fn encode_payload<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(value, &mut bytes)
        .map_err(|e| GitchainError::Encoding(e.to_string()))?;
    Ok(bytes)
}

/// Decode CBOR bytes back into a payload value.
pub fn decode_payload<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    ciborium::de::from_reader(bytes).map_err(|e| GitchainError::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitchain_types::Transaction;
    use serde::ser::Error as _;
    use serde_json::{json, Value};

    #[test]
    fn test_known_encoding() {
        // {"a": 1, "b": [true, "x"]}
        let bytes = encode_payload(&json!({"b": [true, "x"], "a": 1})).unwrap();
        assert_eq!(hex::encode(bytes), "a2616101616282f56178");
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let mut first = Transaction::new("push", "r1");
        first.insert("ref", json!("main"));
        first.insert("commit", json!("abc"));

        let mut second = Transaction::new("push", "r1");
        second.insert("commit", json!("abc"));
        second.insert("ref", json!("main"));

        assert_eq!(encode_payload(&first).unwrap(), encode_payload(&second).unwrap());
    }

    #[test]
    fn test_reencoding_is_stable() {
        let samples = vec![
            json!({}),
            json!({"type": "createRepo", "id": "r1", "meta": {"inputs": ["aa"], "outputs": []}}),
            json!({"n": -17, "big": 18446744073709551615u64, "f": 1.5, "none": null}),
            json!({"nested": {"deep": [[1, 2], {"k": "v"}]}, "unicode": "résumé ✓"}),
            json!([0, "", false]),
        ];

        for value in samples {
            let encoded = encode_payload(&value).unwrap();
            let decoded: Value = decode_payload(&encoded).unwrap();
            assert_eq!(encode_payload(&decoded).unwrap(), encoded, "value {}", value);
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn test_decode_malformed_bytes() {
        let result: Result<Value> = decode_payload(&[0xa1, 0x61]);
        assert!(matches!(result, Err(GitchainError::Encoding(_))));
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(S::Error::custom("file handles cannot be encoded"))
        }
    }

    #[test]
    fn test_unencodable_value_is_encoding_error() {
        let result = encode_payload(&Unencodable);
        assert!(matches!(result, Err(GitchainError::Encoding(_))));
    }
}
