//! Credentials and bearer tokens.
//!
//! Handlers never read the caller from ambient state: the middleware resolves
//! the bearer token into an [`AuthenticatedUser`], and operations that need an
//! identity take it as an explicit argument.

pub mod password;
pub mod token;

pub use crate::middleware::jwt::AppUser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
}
