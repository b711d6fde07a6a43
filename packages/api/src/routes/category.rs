use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    error::ApiError,
    middleware::jwt::AppUser,
    serialization::category::{CategoryInput, CategoryNode, CategoryPatch, CategoryResponse},
    state::AppState,
    store,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category)
                .put(replace_category)
                .patch(update_category)
                .delete(delete_category),
        )
        .route("/{id}/subcategories", get(list_subcategories))
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Top-level categories with their nested subtrees", body = Vec<CategoryNode>),
        (status = 500, description = "Category tree is corrupt")
    )
)]
#[tracing::instrument(name = "GET /categories", skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryNode>>, ApiError> {
    Ok(Json(store::category::list_top_level(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category with its nested subtree", body = CategoryNode),
        (status = 404, description = "Category not found")
    )
)]
#[tracing::instrument(name = "GET /categories/{id}", skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CategoryNode>, ApiError> {
    Ok(Json(store::category::get_nested(&state.db, id).await?))
}

#[utoipa::path(
    get,
    path = "/categories/{id}/subcategories",
    tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Direct children of the category", body = Vec<CategoryResponse>),
        (status = 404, description = "Category not found")
    )
)]
#[tracing::instrument(name = "GET /categories/{id}/subcategories", skip(state))]
pub async fn list_subcategories(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    store::category::get(&state.db, id).await?;
    let children = store::category::subcategories(&state.db, id).await?;
    Ok(Json(children.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid payload or unknown parent"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "POST /categories", skip(state, user))]
pub async fn create_category(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    user.require()?;
    let model = store::category::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(model.into())))
}

#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Category replaced", body = CategoryResponse),
        (status = 400, description = "Invalid payload, unknown parent or cyclic parent"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "PUT /categories/{id}", skip(state, user))]
pub async fn replace_category(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(id): Path<i32>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<CategoryResponse>, ApiError> {
    user.require()?;
    let model = store::category::update(&state.db, id, input.into()).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    request_body = CategoryPatch,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Invalid payload, unknown parent or cyclic parent"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "PATCH /categories/{id}", skip(state, user))]
pub async fn update_category(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(id): Path<i32>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Json<CategoryResponse>, ApiError> {
    user.require()?;
    let model = store::category::update(&state.db, id, patch).await?;
    Ok(Json(model.into()))
}

/// Removes the category, its whole subtree and every product filed under it.
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category subtree deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "DELETE /categories/{id}", skip(state, user))]
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    user.require()?;
    store::category::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
