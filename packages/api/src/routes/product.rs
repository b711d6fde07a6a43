use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    error::ApiError,
    middleware::jwt::AppUser,
    serialization::product::{ProductFilter, ProductInput, ProductPatch, ProductResponse},
    state::AppState,
    store,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product)
                .put(replace_product)
                .patch(update_product)
                .delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    params(ProductFilter),
    responses(
        (status = 200, description = "Products matching every given filter", body = Vec<ProductResponse>),
        (status = 400, description = "Malformed filter")
    )
)]
#[tracing::instrument(name = "GET /products", skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    Ok(Json(store::product::list(&state.db, &filter).await?))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product with its reviews and rating summary", body = ProductResponse),
        (status = 404, description = "Product not found")
    )
)]
#[tracing::instrument(name = "GET /products/{id}", skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductResponse>, ApiError> {
    Ok(Json(store::product::get_detail(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid payload or unknown category/brand"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "POST /products", skip(state, user))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    user.require()?;
    let product = store::product::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product replaced", body = ProductResponse),
        (status = 400, description = "Invalid payload or unknown category/brand"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "PUT /products/{id}", skip(state, user))]
pub async fn replace_product(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(id): Path<i32>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductResponse>, ApiError> {
    user.require()?;
    Ok(Json(store::product::update(&state.db, id, input.into()).await?))
}

#[utoipa::path(
    patch,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid payload or unknown category/brand"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "PATCH /products/{id}", skip(state, user))]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(id): Path<i32>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<ProductResponse>, ApiError> {
    user.require()?;
    Ok(Json(store::product::update(&state.db, id, patch).await?))
}

/// Deletes the product along with its reviews and orders.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "DELETE /products/{id}", skip(state, user))]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    user.require()?;
    store::product::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
