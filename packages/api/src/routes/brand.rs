use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    error::ApiError,
    middleware::jwt::AppUser,
    serialization::brand::{BrandInput, BrandPatch, BrandResponse},
    state::AppState,
    store,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_brands).post(create_brand))
        .route(
            "/{id}",
            get(get_brand)
                .put(replace_brand)
                .patch(update_brand)
                .delete(delete_brand),
        )
}

#[utoipa::path(
    get,
    path = "/brands",
    tag = "brands",
    responses((status = 200, description = "All brands", body = Vec<BrandResponse>))
)]
#[tracing::instrument(name = "GET /brands", skip(state))]
pub async fn list_brands(State(state): State<AppState>) -> Result<Json<Vec<BrandResponse>>, ApiError> {
    let brands = store::brand::list(&state.db).await?;
    Ok(Json(brands.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/brands/{id}",
    tag = "brands",
    params(("id" = i32, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Brand", body = BrandResponse),
        (status = 404, description = "Brand not found")
    )
)]
#[tracing::instrument(name = "GET /brands/{id}", skip(state))]
pub async fn get_brand(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BrandResponse>, ApiError> {
    Ok(Json(store::brand::get(&state.db, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/brands",
    tag = "brands",
    request_body = BrandInput,
    responses(
        (status = 201, description = "Brand created", body = BrandResponse),
        (status = 400, description = "Invalid or duplicate name"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "POST /brands", skip(state, user))]
pub async fn create_brand(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Json(input): Json<BrandInput>,
) -> Result<(StatusCode, Json<BrandResponse>), ApiError> {
    user.require()?;
    let model = store::brand::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(model.into())))
}

#[utoipa::path(
    put,
    path = "/brands/{id}",
    tag = "brands",
    params(("id" = i32, Path, description = "Brand id")),
    request_body = BrandInput,
    responses(
        (status = 200, description = "Brand replaced", body = BrandResponse),
        (status = 400, description = "Invalid or duplicate name"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Brand not found")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "PUT /brands/{id}", skip(state, user))]
pub async fn replace_brand(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(id): Path<i32>,
    Json(input): Json<BrandInput>,
) -> Result<Json<BrandResponse>, ApiError> {
    user.require()?;
    let model = store::brand::update(&state.db, id, Some(input.name)).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/brands/{id}",
    tag = "brands",
    params(("id" = i32, Path, description = "Brand id")),
    request_body = BrandPatch,
    responses(
        (status = 200, description = "Brand updated", body = BrandResponse),
        (status = 400, description = "Invalid or duplicate name"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Brand not found")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "PATCH /brands/{id}", skip(state, user))]
pub async fn update_brand(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(id): Path<i32>,
    Json(patch): Json<BrandPatch>,
) -> Result<Json<BrandResponse>, ApiError> {
    user.require()?;
    let model = store::brand::update(&state.db, id, patch.name).await?;
    Ok(Json(model.into()))
}

/// Deleting a brand keeps its products; their `brand` becomes null.
#[utoipa::path(
    delete,
    path = "/brands/{id}",
    tag = "brands",
    params(("id" = i32, Path, description = "Brand id")),
    responses(
        (status = 204, description = "Brand deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Brand not found")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "DELETE /brands/{id}", skip(state, user))]
pub async fn delete_brand(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    user.require()?;
    store::brand::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
