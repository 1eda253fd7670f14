use std::{iter, sync::Arc};

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};
use tracing::trace;

use crate::{
    database::PostgresConnection,
    ledger::domain::transactions::{NewTransaction, TransactionType},
    models,
};

pub type DynTransactionRepo = Arc<dyn TransactionRepo + Send + Sync>;

#[async_trait]
pub trait TransactionRepo {
    /// Round-trip to the database and report its version string.
    async fn database_version(&self) -> anyhow::Result<String>;

    /// List every transaction, most recent date first. Transactions sharing a
    /// date are ordered by creation time, newest first.
    async fn list_transactions(&self) -> anyhow::Result<Vec<models::ledger::Transaction>>;

    async fn count_transactions(&self) -> anyhow::Result<i64>;

    /// Persist a new transaction.
    ///
    /// # Returns
    ///
    /// An [`anyhow::Result`] containing the stored row, including its
    /// generated ID and timestamps. Missing fields are rejected by the
    /// database and reported as errors.
    async fn insert_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> anyhow::Result<models::ledger::Transaction>;

    /// Persist a new transaction unless it conflicts with an existing row.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the insert was skipped because of a conflict.
    async fn insert_transaction_unless_conflict(
        &self,
        transaction: &NewTransaction,
    ) -> anyhow::Result<Option<models::ledger::Transaction>>;

    /// Delete a transaction. Deleting an ID that does not exist succeeds. The
    /// ID is passed through as text and an ID that is not an integer is
    /// rejected by the database.
    async fn delete_transaction(&self, transaction_id: &str) -> anyhow::Result<()>;

    /// Sum the amounts of all transactions of a type. Zero if there are none.
    async fn sum_by_type(&self, kind: TransactionType) -> anyhow::Result<Decimal>;

    /// Sum the amounts of all transactions of a type per category, ordered
    /// from the largest total to the smallest.
    async fn totals_by_category(
        &self,
        kind: TransactionType,
    ) -> anyhow::Result<Vec<models::ledger::CategoryTotal>>;
}

/// Every value is bound as text and cast by the database, so that it accepts
/// exactly the input formats Postgres does, eg dates like `03/02/2024`.
fn insert_query(transaction: &NewTransaction) -> QueryBuilder<'_, Postgres> {
    let mut query_builder: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("INSERT INTO transactions (description, amount, type, category, date) ");

    query_builder.push_values(iter::once(transaction), |mut row, transaction| {
        row.push_bind(transaction.description.as_deref())
            .push_bind(transaction.amount.as_deref())
            .push_unseparated("::numeric")
            .push_bind(transaction.kind.as_deref())
            .push_bind(transaction.category.as_deref())
            .push_bind(transaction.date.as_deref())
            .push_unseparated("::date");
    });

    query_builder
}

#[async_trait]
impl TransactionRepo for PostgresConnection {
    async fn database_version(&self) -> anyhow::Result<String> {
        let (version,): (String,) = sqlx::query_as("SELECT version()")
            .fetch_one(&**self)
            .await?;

        Ok(version)
    }

    async fn list_transactions(&self) -> anyhow::Result<Vec<models::ledger::Transaction>> {
        Ok(sqlx::query_as::<_, models::ledger::Transaction>(
            r#"
            SELECT *
            FROM transactions
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .fetch_all(&**self)
        .await?)
    }

    async fn count_transactions(&self) -> anyhow::Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
            .fetch_one(&**self)
            .await?;

        Ok(count)
    }

    async fn insert_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> anyhow::Result<models::ledger::Transaction> {
        trace!(?transaction, "Inserting transaction.");

        let mut query_builder = insert_query(transaction);
        query_builder.push(" RETURNING *");

        Ok(query_builder
            .build_query_as::<models::ledger::Transaction>()
            .fetch_one(&**self)
            .await?)
    }

    async fn insert_transaction_unless_conflict(
        &self,
        transaction: &NewTransaction,
    ) -> anyhow::Result<Option<models::ledger::Transaction>> {
        trace!(?transaction, "Inserting transaction unless it conflicts.");

        let mut query_builder = insert_query(transaction);
        query_builder.push(" ON CONFLICT DO NOTHING RETURNING *");

        Ok(query_builder
            .build_query_as::<models::ledger::Transaction>()
            .fetch_optional(&**self)
            .await?)
    }

    async fn delete_transaction(&self, transaction_id: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM transactions WHERE id = $1::int")
            .bind(transaction_id)
            .execute(&**self)
            .await?;

        Ok(())
    }

    async fn sum_by_type(&self, kind: TransactionType) -> anyhow::Result<Decimal> {
        let (total,): (Decimal,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(amount), 0) AS total
            FROM transactions
            WHERE type = $1
            "#,
        )
        .bind(kind.as_str())
        .fetch_one(&**self)
        .await?;

        Ok(total)
    }

    async fn totals_by_category(
        &self,
        kind: TransactionType,
    ) -> anyhow::Result<Vec<models::ledger::CategoryTotal>> {
        Ok(sqlx::query_as::<_, models::ledger::CategoryTotal>(
            r#"
            SELECT category, SUM(amount) AS total
            FROM transactions
            WHERE type = $1
            GROUP BY category
            ORDER BY total DESC
            "#,
        )
        .bind(kind.as_str())
        .fetch_all(&**self)
        .await?)
    }
}
