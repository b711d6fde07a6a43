use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use hyper::header::AUTHORIZATION;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Caller identity attached to every request by [`jwt_middleware`].
#[derive(Debug, Clone)]
pub enum AppUser {
    Authenticated(AuthenticatedUser),
    Anonymous,
}

impl AppUser {
    /// The authenticated caller, or `401` for anonymous requests.
    pub fn require(&self) -> Result<&AuthenticatedUser, ApiError> {
        match self {
            AppUser::Authenticated(user) => Ok(user),
            AppUser::Anonymous => Err(crate::unauthorized!(
                "Authentication credentials were not provided"
            )),
        }
    }

    pub fn id(&self) -> Option<i32> {
        match self {
            AppUser::Authenticated(user) => Some(user.id),
            AppUser::Anonymous => None,
        }
    }
}

/// Resolves `Authorization: Bearer <token>` into an [`AppUser`]. Requests
/// without the header continue as anonymous; a header carrying an invalid or
/// expired token is rejected outright.
pub async fn jwt_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response<Body>, ApiError> {
    if let Some(auth_header) = request.headers().get(AUTHORIZATION) {
        let header = auth_header
            .to_str()
            .map_err(|_| crate::unauthorized!("Authorization header is not valid UTF-8"))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| crate::unauthorized!("Authorization header must use the Bearer scheme"))?
            .trim();

        let user = state.validate_token(token)?;
        request
            .extensions_mut()
            .insert::<AppUser>(AppUser::Authenticated(user));
        return Ok(next.run(request).await);
    }

    request.extensions_mut().insert::<AppUser>(AppUser::Anonymous);
    Ok(next.run(request).await)
}
