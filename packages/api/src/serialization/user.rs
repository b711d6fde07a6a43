use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validate_name;
use crate::entity::user;
use crate::store::StoreError;

const PASSWORD_MIN: usize = 8;

/// Registration body. `Debug` is implemented by hand so the password never
/// reaches a log line through `tracing::instrument`.
#[derive(Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_name("username", &self.username, 150)?;
        if !self
            .username
            .chars()
            .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
        {
            return Err(StoreError::Validation(
                "username may only contain letters, digits and @/./+/-/_".into(),
            ));
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(StoreError::Validation("email is not a valid address".into())),
        }
        if self.password.chars().count() < PASSWORD_MIN {
            return Err(StoreError::Validation(format!(
                "password must be at least {PASSWORD_MIN} characters"
            )));
        }
        Ok(())
    }
}

/// Public view of a user. There is no password field to leak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
        }
    }
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccessToken {
    pub access: String,
}
