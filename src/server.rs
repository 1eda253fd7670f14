use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{extract::FromRef, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    database::PostgresConnection, ledger::services::LedgerService,
    repos::transactions::DynTransactionRepo,
};

pub struct Options {
    pub port: u16,

    pub database_pool_size: u32,
    pub database_timeout_seconds: u8,
    pub database_url: String,

    /// Refuse to start if the schema cannot be created.
    pub strict_bootstrap: bool,
}

#[derive(Clone)]
pub struct AppState {
    ledger_service: LedgerService,
}

impl AppState {
    pub fn new(ledger_service: LedgerService) -> Self {
        Self { ledger_service }
    }
}

/// Build the application's router, including CORS and request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(crate::health::routes())
        .merge(crate::ledger::http::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(opts: Options) -> anyhow::Result<()> {
    let db_pool = PgPoolOptions::new()
        .max_connections(opts.database_pool_size)
        .acquire_timeout(Duration::from_secs(opts.database_timeout_seconds.into()))
        .connect_lazy(&opts.database_url)?;

    let db_connection = PostgresConnection::new(db_pool);

    match db_connection.ensure_schema().await {
        Ok(()) => info!("Transactions table is ready."),
        Err(error) if opts.strict_bootstrap => {
            return Err(error.context("Failed to create the transactions table"));
        }
        Err(error) => {
            error!(
                ?error,
                "Failed to create the transactions table. Requests may fail until it exists."
            );
        }
    }

    let transaction_repo: DynTransactionRepo = Arc::new(db_connection);

    let state = AppState::new(LedgerService::new(transaction_repo));

    let addr = SocketAddr::from(([0, 0, 0, 0], opts.port));
    info!(%addr, "Listening for requests.");

    axum::Server::bind(&addr)
        .serve(app(state).into_make_service())
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}

impl FromRef<AppState> for LedgerService {
    fn from_ref(state: &AppState) -> Self {
        state.ledger_service.clone()
    }
}
