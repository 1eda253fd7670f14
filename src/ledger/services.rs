use tracing::{debug, warn};

use crate::{
    ledger::domain::{
        statistics::Statistics,
        transactions::{
            BulkInsertFailure, BulkInsertOutcome, BulkInsertRequest, NewTransaction,
            TransactionType,
        },
    },
    models,
    repos::DynTransactionRepo,
};

#[derive(Clone)]
pub struct LedgerService {
    transaction_repo: DynTransactionRepo,
}

impl LedgerService {
    pub fn new(transaction_repo: DynTransactionRepo) -> Self {
        Self { transaction_repo }
    }

    pub async fn database_version(&self) -> anyhow::Result<String> {
        self.transaction_repo.database_version().await
    }

    pub async fn list_transactions(&self) -> anyhow::Result<Vec<models::ledger::Transaction>> {
        self.transaction_repo.list_transactions().await
    }

    pub async fn count_transactions(&self) -> anyhow::Result<i64> {
        self.transaction_repo.count_transactions().await
    }

    pub async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> anyhow::Result<models::ledger::Transaction> {
        self.transaction_repo.insert_transaction(transaction).await
    }

    /// Insert each transaction of the request in turn.
    ///
    /// Every item is its own unit of work. Items that cannot be read or that
    /// the database rejects are recorded as failures and do not stop the
    /// remaining items from being inserted. Items skipped because they
    /// conflict with an existing row are neither inserted nor failed.
    pub async fn bulk_create_transactions(&self, request: BulkInsertRequest) -> BulkInsertOutcome {
        let mut outcome = BulkInsertOutcome::default();

        for (index, item) in request.transactions.into_iter().enumerate() {
            let transaction: NewTransaction = match serde_json::from_value(item) {
                Ok(transaction) => transaction,
                Err(error) => {
                    warn!(index, %error, "Skipping unreadable transaction in bulk insert.");

                    outcome.failed.push(BulkInsertFailure {
                        index,
                        error: error.to_string(),
                    });
                    continue;
                }
            };

            match self
                .transaction_repo
                .insert_transaction_unless_conflict(&transaction)
                .await
            {
                Ok(Some(saved)) => outcome.inserted.push(saved),
                Ok(None) => debug!(index, "Bulk insert item conflicted with an existing row."),
                Err(error) => {
                    warn!(index, ?error, "Failed to insert transaction in bulk insert.");

                    outcome.failed.push(BulkInsertFailure {
                        index,
                        error: error.to_string(),
                    });
                }
            }
        }

        debug!(
            inserted = outcome.inserted.len(),
            failed = outcome.failed.len(),
            "Processed bulk insert."
        );

        outcome
    }

    pub async fn delete_transaction(&self, transaction_id: &str) -> anyhow::Result<()> {
        self.transaction_repo
            .delete_transaction(transaction_id)
            .await
    }

    pub async fn statistics(&self) -> anyhow::Result<Statistics> {
        let total_income = self
            .transaction_repo
            .sum_by_type(TransactionType::Income)
            .await?;
        let total_expense = self
            .transaction_repo
            .sum_by_type(TransactionType::Expense)
            .await?;
        let categories = self
            .transaction_repo
            .totals_by_category(TransactionType::Expense)
            .await?;

        Ok(Statistics::new(total_income, total_expense, categories))
    }
}
