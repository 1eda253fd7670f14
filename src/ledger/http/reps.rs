use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    ledger::domain::{self},
    models,
};

/// A stored transaction. The amount is rendered as a decimal string, eg
/// `"50.00"`.
#[derive(Serialize)]
pub struct Transaction {
    pub id: i32,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub date: NaiveDate,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<&models::ledger::Transaction> for Transaction {
    fn from(transaction: &models::ledger::Transaction) -> Self {
        Self {
            id: transaction.id,
            description: transaction.description.clone(),
            amount: transaction.amount,
            kind: transaction.kind.clone(),
            category: transaction.category.clone(),
            date: transaction.date,
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct TransactionCount {
    pub count: i64,
}

#[derive(Serialize)]
pub struct BulkInsertResult {
    pub message: &'static str,
    pub count: usize,
    pub transactions: Vec<Transaction>,
    pub failed: Vec<domain::transactions::BulkInsertFailure>,
}

impl From<&domain::transactions::BulkInsertOutcome> for BulkInsertResult {
    fn from(outcome: &domain::transactions::BulkInsertOutcome) -> Self {
        Self {
            message: "Transactions processed",
            count: outcome.inserted.len(),
            transactions: outcome.inserted.iter().map(Transaction::from).collect(),
            failed: outcome.failed.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct CategoryTotal {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// Totals are rendered as JSON numbers.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub categories: Vec<CategoryTotal>,
}

impl From<&domain::statistics::Statistics> for Statistics {
    fn from(statistics: &domain::statistics::Statistics) -> Self {
        Self {
            total_income: statistics.total_income(),
            total_expense: statistics.total_expense(),
            balance: statistics.balance(),
            categories: statistics
                .categories()
                .iter()
                .map(|category| CategoryTotal {
                    category: category.category.clone(),
                    total: category.total,
                })
                .collect(),
        }
    }
}
