use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    error::ApiError,
    middleware::jwt::AppUser,
    serialization::review::{ReviewFilter, ReviewInput, ReviewPatch, ReviewResponse},
    state::AppState,
    store,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route(
            "/{id}",
            get(get_review)
                .put(replace_review)
                .patch(update_review)
                .delete(delete_review),
        )
}

#[utoipa::path(
    get,
    path = "/reviews",
    tag = "reviews",
    params(ReviewFilter),
    responses((status = 200, description = "Reviews, optionally for one product", body = Vec<ReviewResponse>))
)]
#[tracing::instrument(name = "GET /reviews", skip(state))]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(filter): Query<ReviewFilter>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let reviews = store::review::list(&state.db, &filter).await?;
    Ok(Json(reviews.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/reviews/{id}",
    tag = "reviews",
    params(("id" = i32, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review", body = ReviewResponse),
        (status = 404, description = "Review not found")
    )
)]
#[tracing::instrument(name = "GET /reviews/{id}", skip(state))]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ReviewResponse>, ApiError> {
    Ok(Json(store::review::get(&state.db, id).await?.into()))
}

/// The author is always the caller; one review per user and product.
#[utoipa::path(
    post,
    path = "/reviews",
    tag = "reviews",
    request_body = ReviewInput,
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Invalid rating, unknown product or already reviewed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "POST /reviews", skip(state, user))]
pub async fn create_review(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Json(input): Json<ReviewInput>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
    let author = user.require()?;
    let model = store::review::create(&state.db, author, input).await?;
    Ok((StatusCode::CREATED, Json(model.into())))
}

#[utoipa::path(
    put,
    path = "/reviews/{id}",
    tag = "reviews",
    params(("id" = i32, Path, description = "Review id")),
    request_body = ReviewInput,
    responses(
        (status = 200, description = "Review replaced", body = ReviewResponse),
        (status = 400, description = "Invalid rating"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "Review not found")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "PUT /reviews/{id}", skip(state, user))]
pub async fn replace_review(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(id): Path<i32>,
    Json(input): Json<ReviewInput>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let author = user.require()?;
    let current = store::review::get(&state.db, id).await?;
    if current.product_id != input.product {
        return Err(ApiError::validation("a review cannot move to another product"));
    }
    let patch = ReviewPatch {
        rating: Some(input.rating),
        comment: Some(input.comment),
    };
    let model = store::review::update(&state.db, author, id, patch).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/reviews/{id}",
    tag = "reviews",
    params(("id" = i32, Path, description = "Review id")),
    request_body = ReviewPatch,
    responses(
        (status = 200, description = "Review updated", body = ReviewResponse),
        (status = 400, description = "Invalid rating"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "Review not found")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "PATCH /reviews/{id}", skip(state, user))]
pub async fn update_review(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(id): Path<i32>,
    Json(patch): Json<ReviewPatch>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let author = user.require()?;
    let model = store::review::update(&state.db, author, id, patch).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    tag = "reviews",
    params(("id" = i32, Path, description = "Review id")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the author"),
        (status = 404, description = "Review not found")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "DELETE /reviews/{id}", skip(state, user))]
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let author = user.require()?;
    store::review::delete(&state.db, author, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
