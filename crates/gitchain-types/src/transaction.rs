//! The logical transaction supplied by callers.
//!
//! A transaction is a JSON object with a string `type`, an `id`, arbitrary
//! payload fields and an optional `meta` object declaring the state
//! addresses it reads (`meta.inputs`) and writes (`meta.outputs`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{GitchainError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Transaction(Map<String, Value>);

impl TryFrom<Value> for Transaction {
    type Error = GitchainError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl From<Transaction> for Value {
    fn from(transaction: Transaction) -> Self {
        Value::Object(transaction.0)
    }
}

impl Transaction {
    pub fn new(tx_type: &str, id: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("type".into(), Value::String(tx_type.to_string()));
        fields.insert("id".into(), Value::String(id.to_string()));
        Self(fields)
    }

    /// Wrap an arbitrary JSON value; it must be an object with a string `type`.
    pub fn from_value(value: Value) -> Result<Self> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(GitchainError::Encoding(format!(
                    "transaction must be a JSON object, got {}",
                    other
                )))
            }
        };
        if !matches!(fields.get("type"), Some(Value::String(_))) {
            return Err(GitchainError::Encoding(
                "transaction is missing a string `type` field".into(),
            ));
        }
        Ok(Self(fields))
    }

    pub fn tx_type(&self) -> &str {
        self.0.get("type").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn id(&self) -> Option<&Value> {
        self.0.get("id")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        self.0.insert(key.to_string(), value)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Builder-style field setter.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    /// Declared input addresses (`meta.inputs`), empty when absent.
    pub fn inputs(&self) -> Result<Vec<String>> {
        self.meta_addresses("inputs")
    }

    /// Declared output addresses (`meta.outputs`), empty when absent.
    pub fn outputs(&self) -> Result<Vec<String>> {
        self.meta_addresses("outputs")
    }

    fn meta_addresses(&self, key: &str) -> Result<Vec<String>> {
        let value = match self.0.get("meta").and_then(|m| m.get(key)) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(v) => v,
        };
        let items = value.as_array().ok_or_else(|| {
            GitchainError::Encoding(format!("meta.{} must be an array of strings", key))
        })?;
        items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    GitchainError::Encoding(format!(
                        "meta.{} contains a non-string address: {}",
                        key, item
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_sets_type_and_id() {
        let tx = Transaction::new("createRepo", "repo-1");
        assert_eq!(tx.tx_type(), "createRepo");
        assert_eq!(tx.id(), Some(&json!("repo-1")));
    }

    #[test]
    fn test_from_value_requires_object_with_type() {
        assert!(Transaction::from_value(json!([1, 2])).is_err());
        assert!(Transaction::from_value(json!({"id": "x"})).is_err());
        assert!(Transaction::from_value(json!({"type": 7})).is_err());
        let tx = Transaction::from_value(json!({"type": "push", "id": "x"})).unwrap();
        assert_eq!(tx.tx_type(), "push");
    }

    #[test]
    fn test_meta_addresses_default_to_empty() {
        let tx = Transaction::new("push", "x");
        assert!(tx.inputs().unwrap().is_empty());
        assert!(tx.outputs().unwrap().is_empty());

        let tx = tx.with("meta", json!({"inputs": ["aa01"], "outputs": null}));
        assert_eq!(tx.inputs().unwrap(), vec!["aa01".to_string()]);
        assert!(tx.outputs().unwrap().is_empty());
    }

    #[test]
    fn test_meta_addresses_reject_non_strings() {
        let tx = Transaction::new("push", "x").with("meta", json!({"inputs": ["aa", 3]}));
        assert!(matches!(tx.inputs(), Err(GitchainError::Encoding(_))));

        let tx = Transaction::new("push", "x").with("meta", json!({"outputs": "aa"}));
        assert!(matches!(tx.outputs(), Err(GitchainError::Encoding(_))));
    }

    #[test]
    fn test_deserialize_enforces_string_type() {
        let err = serde_json::from_value::<Transaction>(json!({"id": "x"})).unwrap_err();
        assert!(err.to_string().contains("`type`"), "{}", err);
        assert!(serde_json::from_value::<Transaction>(json!({"type": 1, "id": "x"})).is_err());
        assert!(serde_json::from_str::<Transaction>("[]").is_err());

        let tx: Transaction = serde_json::from_str(r#"{"type":"push","id":"x"}"#).unwrap();
        assert_eq!(tx, Transaction::new("push", "x"));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let tx = Transaction::new("push", "x").with("ref", json!("refs/heads/main"));
        assert_eq!(
            serde_json::to_value(&tx).unwrap(),
            json!({"type": "push", "id": "x", "ref": "refs/heads/main"})
        );
    }
}
