//! An in-memory [`TransactionRepo`] for exercising the HTTP layer without a
//! database.

use std::{
    collections::{BTreeMap, HashSet},
    str::FromStr,
    sync::Mutex,
};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::{
    ledger::domain::transactions::{NewTransaction, TransactionType},
    models,
};

use super::transactions::TransactionRepo;

#[derive(Default)]
struct State {
    rows: Vec<models::ledger::Transaction>,
    next_id: i32,
    rejected_descriptions: HashSet<String>,
    conflicting_descriptions: HashSet<String>,
    unavailable: bool,
}

#[derive(Default)]
pub struct MemoryTransactionRepo {
    state: Mutex<State>,
}

impl MemoryTransactionRepo {
    /// Make every operation fail as if the database could not be reached.
    pub fn unavailable() -> Self {
        let repo = Self::default();
        repo.state.lock().unwrap().unavailable = true;

        repo
    }

    /// Reject inserts of transactions with the given description, as a
    /// database constraint would.
    pub fn reject_description(self, description: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .rejected_descriptions
            .insert(description.to_owned());

        self
    }

    /// Treat conflict-tolerant inserts of the given description as conflicts.
    pub fn conflict_on_description(self, description: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .conflicting_descriptions
            .insert(description.to_owned());

        self
    }

    fn insert(
        &self,
        transaction: &NewTransaction,
    ) -> anyhow::Result<models::ledger::Transaction> {
        let mut state = self.state.lock().unwrap();
        check_available(&state)?;

        let description = required(&transaction.description, "description")?;
        if state.rejected_descriptions.contains(description) {
            return Err(anyhow!(
                "new row for relation \"transactions\" violates check constraint"
            ));
        }

        state.next_id += 1;
        let id = state.next_id;
        let created_at = base_timestamp() + Duration::seconds(id.into());

        let row = models::ledger::Transaction {
            id,
            description: description.to_owned(),
            amount: parse_amount(required(&transaction.amount, "amount")?)?,
            kind: required(&transaction.kind, "type")?.to_owned(),
            category: required(&transaction.category, "category")?.to_owned(),
            date: parse_date(required(&transaction.date, "date")?)?,
            created_at: Some(created_at),
            updated_at: Some(created_at),
        };
        state.rows.push(row.clone());

        Ok(row)
    }
}

fn parse_amount(text: &str) -> anyhow::Result<Decimal> {
    Decimal::from_str(text.trim())
        .map_err(|_| anyhow!("invalid input syntax for type numeric: \"{}\"", text))
}

/// Accepts the date spellings the tests rely on: ISO dates, ISO timestamps and
/// US-style `MM/DD/YYYY`.
fn parse_date(text: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(text).map(|t| t.naive_utc().date()))
        .or_else(|_| NaiveDate::parse_from_str(text, "%m/%d/%Y"))
        .map_err(|_| anyhow!("date/time field value out of range: \"{}\"", text))
}

fn base_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn check_available(state: &State) -> anyhow::Result<()> {
    if state.unavailable {
        Err(anyhow!("error communicating with database: Connection refused"))
    } else {
        Ok(())
    }
}

fn required<'a, T>(value: &'a Option<T>, column: &str) -> anyhow::Result<&'a T> {
    value.as_ref().ok_or_else(|| {
        anyhow!(
            "null value in column \"{}\" of relation \"transactions\" violates not-null constraint",
            column
        )
    })
}

#[async_trait]
impl TransactionRepo for MemoryTransactionRepo {
    async fn database_version(&self) -> anyhow::Result<String> {
        check_available(&self.state.lock().unwrap())?;

        Ok("PostgreSQL 15.4 (in-memory)".to_owned())
    }

    async fn list_transactions(&self) -> anyhow::Result<Vec<models::ledger::Transaction>> {
        let state = self.state.lock().unwrap();
        check_available(&state)?;

        let mut rows = state.rows.clone();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        Ok(rows)
    }

    async fn count_transactions(&self) -> anyhow::Result<i64> {
        let state = self.state.lock().unwrap();
        check_available(&state)?;

        Ok(state.rows.len().try_into()?)
    }

    async fn insert_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> anyhow::Result<models::ledger::Transaction> {
        self.insert(transaction)
    }

    async fn insert_transaction_unless_conflict(
        &self,
        transaction: &NewTransaction,
    ) -> anyhow::Result<Option<models::ledger::Transaction>> {
        let conflicts = transaction.description.as_ref().map_or(false, |description| {
            self.state
                .lock()
                .unwrap()
                .conflicting_descriptions
                .contains(description)
        });

        if conflicts {
            Ok(None)
        } else {
            self.insert(transaction).map(Some)
        }
    }

    async fn delete_transaction(&self, transaction_id: &str) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        check_available(&state)?;

        let transaction_id: i32 = transaction_id.parse().map_err(|_| {
            anyhow!(
                "invalid input syntax for type integer: \"{}\"",
                transaction_id
            )
        })?;

        state.rows.retain(|row| row.id != transaction_id);

        Ok(())
    }

    async fn sum_by_type(&self, kind: TransactionType) -> anyhow::Result<Decimal> {
        let state = self.state.lock().unwrap();
        check_available(&state)?;

        Ok(state
            .rows
            .iter()
            .filter(|row| row.kind == kind.as_str())
            .map(|row| row.amount)
            .sum())
    }

    async fn totals_by_category(
        &self,
        kind: TransactionType,
    ) -> anyhow::Result<Vec<models::ledger::CategoryTotal>> {
        let state = self.state.lock().unwrap();
        check_available(&state)?;

        let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
        for row in state.rows.iter().filter(|row| row.kind == kind.as_str()) {
            *totals.entry(row.category.as_str()).or_default() += row.amount;
        }

        let mut categories = totals
            .into_iter()
            .map(|(category, total)| models::ledger::CategoryTotal {
                category: category.to_owned(),
                total,
            })
            .collect::<Vec<_>>();
        categories.sort_by(|a, b| b.total.cmp(&a.total));

        Ok(categories)
    }
}
