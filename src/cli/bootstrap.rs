use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::database::PostgresConnection;

pub struct BootstrapOptions {
    pub database_url: String,
}

/// Create the application schema and exit. Any failure is returned to the
/// caller.
pub async fn run_bootstrap(opts: BootstrapOptions) -> anyhow::Result<()> {
    let db_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&opts.database_url)
        .await?;

    PostgresConnection::new(db_pool).ensure_schema().await?;

    info!("Transactions table is ready.");

    Ok(())
}
