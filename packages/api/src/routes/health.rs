use crate::entity::{category, product};
use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::{Router, routing::get};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use utoipa::ToSchema;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/db", get(catalog_health))
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Answered only when the catalog tables can be read.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct CatalogHealthResponse {
    pub status: String,
    pub categories: u64,
    pub products: u64,
    /// Time spent on both counts.
    pub rtt_ms: u128,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Process is up", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health/db",
    tag = "health",
    responses(
        (status = 200, description = "Catalog tables are readable", body = CatalogHealthResponse),
        (status = 500, description = "Schema missing or database unreachable")
    )
)]
#[tracing::instrument(name = "GET /health/db", skip(state))]
pub async fn catalog_health(
    State(state): State<AppState>,
) -> Result<Json<CatalogHealthResponse>, ApiError> {
    let started = Instant::now();
    let categories = category::Entity::find().count(&state.db).await?;
    let products = product::Entity::find().count(&state.db).await?;

    Ok(Json(CatalogHealthResponse {
        status: "ok".to_string(),
        categories,
        products,
        rtt_ms: started.elapsed().as_millis(),
    }))
}
