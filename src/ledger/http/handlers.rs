use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{debug, error};

use crate::{
    http_err::{ApiError, ApiResponse},
    ledger::{
        domain::transactions::{BulkInsertRequest, BulkInsertRequestError, NewTransaction},
        services::LedgerService,
    },
    server::AppState,
};

use super::reps;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(get_transactions).post(create_transaction),
        )
        .route("/transactions/bulk", post(create_transactions_bulk))
        .route("/transactions/count", get(count_transactions))
        .route("/transactions/:transaction_id", delete(delete_transaction))
        .route("/statistics", get(get_statistics))
}

async fn get_transactions(
    State(ledger_service): State<LedgerService>,
) -> ApiResponse<Json<Vec<reps::Transaction>>> {
    match ledger_service.list_transactions().await {
        Ok(transactions) => Ok(Json(
            transactions.iter().map(reps::Transaction::from).collect(),
        )),
        Err(error) => {
            error!(?error, "Failed to list transactions.");

            Err(ApiError::Database(error))
        }
    }
}

async fn count_transactions(
    State(ledger_service): State<LedgerService>,
) -> ApiResponse<Json<reps::TransactionCount>> {
    match ledger_service.count_transactions().await {
        Ok(count) => Ok(Json(reps::TransactionCount { count })),
        Err(error) => {
            error!(?error, "Failed to count transactions.");

            Err(ApiError::Database(error))
        }
    }
}

async fn create_transaction(
    State(ledger_service): State<LedgerService>,
    new_transaction: Result<Json<NewTransaction>, JsonRejection>,
) -> ApiResponse<(StatusCode, Json<reps::Transaction>)> {
    // An unreadable body carries no fields, so the insert is attempted with
    // every column NULL and the database reports the error.
    let new_transaction = match new_transaction {
        Ok(Json(new_transaction)) => new_transaction,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Creating transaction from unreadable body.");

            NewTransaction::default()
        }
    };

    let saved_transaction = match ledger_service.create_transaction(&new_transaction).await {
        Ok(t) => t,
        Err(error) => {
            error!(?error, "Failed to persist transaction.");

            return Err(ApiError::Database(error));
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(reps::Transaction::from(&saved_transaction)),
    ))
}

async fn create_transactions_bulk(
    State(ledger_service): State<LedgerService>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> ApiResponse<(StatusCode, Json<reps::BulkInsertResult>)> {
    let request = match body {
        Ok(Json(body)) => BulkInsertRequest::try_from(body)?,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Rejected unreadable bulk insert body.");

            return Err(BulkInsertRequestError::InvalidFormat.into());
        }
    };

    let outcome = ledger_service.bulk_create_transactions(request).await;

    Ok((
        StatusCode::CREATED,
        Json(reps::BulkInsertResult::from(&outcome)),
    ))
}

async fn delete_transaction(
    State(ledger_service): State<LedgerService>,
    Path(transaction_id): Path<String>,
) -> ApiResponse<StatusCode> {
    match ledger_service.delete_transaction(&transaction_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(error) => {
            error!(?error, %transaction_id, "Failed to delete transaction.");

            Err(ApiError::Database(error))
        }
    }
}

async fn get_statistics(
    State(ledger_service): State<LedgerService>,
) -> ApiResponse<Json<reps::Statistics>> {
    match ledger_service.statistics().await {
        Ok(statistics) => Ok(Json(reps::Statistics::from(&statistics))),
        Err(error) => {
            error!(?error, "Failed to compute statistics.");

            Err(ApiError::Database(error))
        }
    }
}
