use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use serde::Serialize;
use tracing::error;

use crate::{ledger::services::LedgerService, server::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(get_health))
}

#[derive(Serialize)]
pub struct Healthy {
    status: &'static str,
    database: &'static str,
    version: String,
}

#[derive(Serialize)]
pub struct Unhealthy {
    status: &'static str,
    database: &'static str,
    error: String,
}

pub enum HealthResponse {
    Healthy(Healthy),
    Unhealthy(Unhealthy),
}

impl IntoResponse for HealthResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Healthy(rep) => (StatusCode::OK, Json(rep)).into_response(),
            Self::Unhealthy(rep) => (StatusCode::INTERNAL_SERVER_ERROR, Json(rep)).into_response(),
        }
    }
}

async fn get_health(State(ledger_service): State<LedgerService>) -> HealthResponse {
    match ledger_service.database_version().await {
        Ok(version) => HealthResponse::Healthy(Healthy {
            status: "healthy",
            database: "connected",
            version,
        }),
        Err(error) => {
            error!(?error, "Health check could not reach the database.");

            HealthResponse::Unhealthy(Unhealthy {
                status: "unhealthy",
                database: "disconnected",
                error: error.to_string(),
            })
        }
    }
}
