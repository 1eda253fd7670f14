use std::ops::Deref;

use sqlx::PgPool;
use tracing::debug;

/// Creates the `transactions` table when it does not exist yet. Running it
/// against an existing table is a no-op, even if that table's columns differ.
const CREATE_TRANSACTIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id SERIAL PRIMARY KEY,
        description VARCHAR(255) NOT NULL,
        amount DECIMAL(10,2) NOT NULL,
        type VARCHAR(50) NOT NULL,
        category VARCHAR(100) NOT NULL,
        date DATE NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

#[derive(Clone)]
pub struct PostgresConnection(PgPool);

impl PostgresConnection {
    pub fn new(pool: PgPool) -> Self {
        Self(pool)
    }

    /// Make sure the schema used by the application exists.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        debug!("Ensuring the transactions table exists.");

        sqlx::query(CREATE_TRANSACTIONS_TABLE)
            .execute(&self.0)
            .await?;

        Ok(())
    }
}

impl Deref for PostgresConnection {
    type Target = PgPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
