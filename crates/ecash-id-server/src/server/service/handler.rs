//! Route handlers for request identifier allocation.
//!
//! ## Routes
//!
//! - `POST /v1/request-ids` - allocate in the current period.
//! - `POST /v1/request-ids/{year}/{month}` - allocate in an explicit period.
//! - `GET /v1/request-ids/{id}` - check whether the service could have issued
//!   an identifier, widened sequences included, and extract its period.
//!   Malformed identifiers are an answer (`"valid": false`), not an error.
//! - `GET /v1/periods/{year}/{month}` - last sequence issued in a period.
//! - `GET /health` - liveness.
//!
//! Stores are blocking, so every store call runs on Tokio's blocking pool.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use ecash_id::{Period, RequestId, parse_period};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::server::{error::ServiceError, service::state::AppState};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/request-ids", post(allocate))
        .route("/v1/request-ids/{year}/{month}", post(allocate_for))
        .route("/v1/request-ids/{id}", get(lookup))
        .route("/v1/periods/{year}/{month}", get(counter_status))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct AllocatedId {
    pub id: RequestId,
    pub year: u16,
    pub month: u8,
    pub sequence: u64,
}

impl From<RequestId> for AllocatedId {
    fn from(id: RequestId) -> Self {
        Self {
            id,
            year: id.year(),
            month: id.month(),
            sequence: id.sequence(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IdLookup {
    pub id: String,
    pub valid: bool,
    pub year: Option<u16>,
    pub month: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct CounterStatus {
    pub year: u16,
    pub month: u8,
    pub current_sequence: Option<u64>,
}

async fn health() -> &'static str {
    "ok"
}

#[tracing::instrument(skip_all)]
async fn allocate(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<AllocatedId>), ServiceError> {
    let generator = Arc::clone(state.generator());
    let id = tokio::task::spawn_blocking(move || generator.next_id()).await??;
    tracing::info!(%id, "allocated request id");
    Ok((StatusCode::CREATED, Json(id.into())))
}

#[tracing::instrument(skip_all)]
async fn allocate_for(
    State(state): State<AppState>,
    Path((year, month)): Path<(u16, u8)>,
) -> Result<(StatusCode, Json<AllocatedId>), ServiceError> {
    let period = Period::new(year, month)?;
    let generator = Arc::clone(state.generator());
    let id = tokio::task::spawn_blocking(move || generator.next_id_for(period)).await??;
    tracing::info!(%id, "allocated request id");
    Ok((StatusCode::CREATED, Json(id.into())))
}

async fn lookup(Path(id): Path<String>) -> Json<IdLookup> {
    let period = parse_period(&id);
    Json(IdLookup {
        valid: period.is_some(),
        year: period.map(|p| p.year()),
        month: period.map(|p| p.month()),
        id,
    })
}

async fn counter_status(
    State(state): State<AppState>,
    Path((year, month)): Path<(u16, u8)>,
) -> Result<Json<CounterStatus>, ServiceError> {
    let period = Period::new(year, month)?;
    let generator = Arc::clone(state.generator());
    let current_sequence = tokio::task::spawn_blocking(move || generator.current(period)).await??;
    Ok(Json(CounterStatus {
        year,
        month,
        current_sequence,
    }))
}
