use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::models;

/// The two transaction types the ledger aggregates over. The database does
/// not restrict the `type` column to these values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// The data required to create a transaction.
///
/// Fields are kept as the text the client sent and are only parsed by the
/// database, which is responsible for rejecting missing or malformed values.
/// Scalars of any JSON type are accepted, eg an amount of `12.5` or `"12.50"`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct NewTransaction {
    #[serde(default, deserialize_with = "as_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "as_text")]
    pub amount: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "as_text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "as_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "as_text")]
    pub date: Option<String>,
}

fn as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Debug, Error, PartialEq)]
pub enum BulkInsertRequestError {
    #[error("Invalid format: expected a `transactions` array.")]
    InvalidFormat,
}

/// A batch of transactions to insert one at a time.
///
/// Items are kept as raw JSON so that a single malformed item only fails
/// itself rather than the whole batch.
#[derive(Debug, PartialEq)]
pub struct BulkInsertRequest {
    pub transactions: Vec<serde_json::Value>,
}

impl TryFrom<serde_json::Value> for BulkInsertRequest {
    type Error = BulkInsertRequestError;

    fn try_from(mut body: serde_json::Value) -> Result<Self, Self::Error> {
        match body.get_mut("transactions").map(serde_json::Value::take) {
            Some(serde_json::Value::Array(transactions)) => Ok(Self { transactions }),
            _ => Err(BulkInsertRequestError::InvalidFormat),
        }
    }
}

/// An item of a bulk insert that was skipped.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BulkInsertFailure {
    /// Position of the item in the submitted array.
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct BulkInsertOutcome {
    pub inserted: Vec<models::ledger::Transaction>,
    pub failed: Vec<BulkInsertFailure>,
}
