use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    error::ApiError,
    middleware::jwt::AppUser,
    serialization::order::{OrderInput, OrderPatch, OrderResponse},
    state::AppState,
    store,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route(
            "/{id}",
            get(get_order)
                .put(replace_order)
                .patch(update_order)
                .delete(delete_order),
        )
}

#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    responses(
        (status = 200, description = "Orders placed by the caller", body = Vec<OrderResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "GET /orders", skip(state, user))]
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let owner = user.require()?;
    let orders = store::order::list(&state.db, owner).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = OrderResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such order for the caller")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "GET /orders/{id}", skip(state, user))]
pub async fn get_order(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(id): Path<i32>,
) -> Result<Json<OrderResponse>, ApiError> {
    let owner = user.require()?;
    Ok(Json(store::order::get(&state.db, owner, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/orders",
    tag = "orders",
    request_body = OrderInput,
    responses(
        (status = 201, description = "Order placed with status pending", body = OrderResponse),
        (status = 400, description = "Invalid quantity or unknown product"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "POST /orders", skip(state, user))]
pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Json(input): Json<OrderInput>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let owner = user.require()?;
    let model = store::order::create(&state.db, owner, input).await?;
    Ok((StatusCode::CREATED, Json(model.into())))
}

#[utoipa::path(
    put,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = i32, Path, description = "Order id")),
    request_body = OrderInput,
    responses(
        (status = 200, description = "Order replaced", body = OrderResponse),
        (status = 400, description = "Invalid quantity or product changed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such order for the caller")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "PUT /orders/{id}", skip(state, user))]
pub async fn replace_order(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(id): Path<i32>,
    Json(input): Json<OrderInput>,
) -> Result<Json<OrderResponse>, ApiError> {
    let owner = user.require()?;
    let current = store::order::get(&state.db, owner, id).await?;
    if current.product_id != input.product {
        return Err(ApiError::validation("an order cannot move to another product"));
    }
    let patch = OrderPatch {
        quantity: Some(input.quantity),
        ..Default::default()
    };
    let model = store::order::update(&state.db, owner, id, patch).await?;
    Ok(Json(model.into()))
}

/// Status only moves forward: pending, processing, delivered.
#[utoipa::path(
    patch,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = i32, Path, description = "Order id")),
    request_body = OrderPatch,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Invalid quantity or backward status transition"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such order for the caller")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "PATCH /orders/{id}", skip(state, user))]
pub async fn update_order(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(id): Path<i32>,
    Json(patch): Json<OrderPatch>,
) -> Result<Json<OrderResponse>, ApiError> {
    let owner = user.require()?;
    let model = store::order::update(&state.db, owner, id, patch).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such order for the caller")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "DELETE /orders/{id}", skip(state, user))]
pub async fn delete_order(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let owner = user.require()?;
    store::order::delete(&state.db, owner, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
