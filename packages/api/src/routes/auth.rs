use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    auth::{AuthenticatedUser, token::TokenType},
    error::ApiError,
    middleware::jwt::AppUser,
    serialization::user::{
        AccessToken, LoginRequest, RefreshRequest, RegisterRequest, TokenPair, UserResponse,
    },
    state::AppState,
    store,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/me", get(me).delete(delete_me))
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid payload or username taken")
    )
)]
#[tracing::instrument(name = "POST /auth/register", skip(state, req))]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = store::user::create(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access and refresh tokens", body = TokenPair),
        (status = 401, description = "Unknown user or wrong password")
    )
)]
#[tracing::instrument(name = "POST /auth/login", skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let user = store::user::authenticate(&state.db, &req.username, &req.password)
        .await?
        .ok_or_else(|| crate::unauthorized!("No active account found with the given credentials"))?;

    let identity = AuthenticatedUser {
        id: user.id,
        username: user.username,
    };
    tracing::info!(user_id = identity.id, "Issued token pair");
    Ok(Json(TokenPair {
        access: state.tokens.sign(&identity, TokenType::Access)?,
        refresh: state.tokens.sign(&identity, TokenType::Refresh)?,
    }))
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Fresh access token", body = AccessToken),
        (status = 401, description = "Invalid or expired refresh token")
    )
)]
#[tracing::instrument(name = "POST /auth/refresh", skip(state, req))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<AccessToken>, ApiError> {
    let claims = state.tokens.verify(&req.refresh, TokenType::Refresh)?;
    let identity = claims.user()?;

    // The account may have been removed since the refresh token was issued.
    store::user::get(&state.db, identity.id)
        .await
        .map_err(|_| crate::unauthorized!("User no longer exists"))?;

    Ok(Json(AccessToken {
        access: state.tokens.sign(&identity, TokenType::Access)?,
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "The authenticated caller", body = UserResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "GET /auth/me", skip(state, user))]
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let caller = user.require()?;
    let model = store::user::get(&state.db, caller.id)
        .await
        .map_err(|_| crate::unauthorized!("User no longer exists"))?;
    Ok(Json(model.into()))
}

/// Closes the caller's account. Their reviews and orders go with it.
#[utoipa::path(
    delete,
    path = "/auth/me",
    tag = "auth",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(name = "DELETE /auth/me", skip(state, user))]
pub async fn delete_me(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
) -> Result<StatusCode, ApiError> {
    let caller = user.require()?;
    store::user::delete(&state.db, caller.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
