//! Bearer token issuing and verification.
//!
//! Tokens are HS256 JWTs signed with the shared `JWT_SECRET`. Two token types
//! exist, each with its own audience so one can never stand in for the other:
//! - **Access tokens**: presented on every authenticated request
//! - **Refresh tokens**: exchanged at `/auth/refresh` for a new access token

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedUser;
use crate::config::Config;

const ISSUER: &str = "storefront";

// ============================================================================
// Token Types & Audiences
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn audience(&self) -> &'static str {
        match self {
            TokenType::Access => "storefront-access",
            TokenType::Refresh => "storefront-refresh",
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Failed to encode JWT: {0}")]
    Encoding(String),
    #[error("Invalid token: {0}")]
    Decoding(String),
    #[error("Token type mismatch: expected {expected:?}, got {got:?}")]
    TokenTypeMismatch { expected: TokenType, got: TokenType },
    #[error("Token subject is not a user id")]
    InvalidSubject,
}

// ============================================================================
// Claims
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a string per the JWT convention.
    pub sub: String,
    pub username: String,
    #[serde(rename = "typ")]
    pub token_type: TokenType,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user(&self) -> Result<AuthenticatedUser, TokenError> {
        let id = self.sub.parse().map_err(|_| TokenError::InvalidSubject)?;
        Ok(AuthenticatedUser {
            id,
            username: self.username.clone(),
        })
    }
}

/// Standard JWT time claims
pub struct TimeClaims {
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

pub fn make_time_claims(ttl_seconds: i64) -> TimeClaims {
    let iat = chrono::Utc::now().timestamp();
    TimeClaims {
        iat,
        nbf: iat - 30, // 30 second clock skew allowance
        exp: iat + ttl_seconds,
    }
}

// ============================================================================
// Issuer
// ============================================================================

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            config.access_token_ttl_secs,
            config.refresh_token_ttl_secs,
        )
    }

    fn ttl(&self, token_type: TokenType) -> i64 {
        match token_type {
            TokenType::Access => self.access_ttl_secs,
            TokenType::Refresh => self.refresh_ttl_secs,
        }
    }

    pub fn sign(&self, user: &AuthenticatedUser, token_type: TokenType) -> Result<String, TokenError> {
        let time = make_time_claims(self.ttl(token_type));
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            token_type,
            iss: ISSUER.to_string(),
            aud: token_type.audience().to_string(),
            iat: time.iat,
            nbf: time.nbf,
            exp: time.exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Validates signature, issuer, audience (from the expected type) and expiry.
    pub fn verify(&self, token: &str, expected_type: TokenType) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[expected_type.audience()]);
        validation.validate_nbf = true;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| TokenError::Decoding(e.to_string()))?
            .claims;

        if claims.token_type != expected_type {
            return Err(TokenError::TokenTypeMismatch {
                expected: expected_type,
                got: claims.token_type,
            });
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"test-secret", 3600, 86400)
    }

    fn alice() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 7,
            username: "alice".into(),
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let issuer = issuer();
        let token = issuer.sign(&alice(), TokenType::Access).unwrap();
        let claims = issuer.verify(&token, TokenType::Access).unwrap();
        assert_eq!(claims.user().unwrap(), alice());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let issuer = issuer();
        let refresh = issuer.sign(&alice(), TokenType::Refresh).unwrap();
        assert!(issuer.verify(&refresh, TokenType::Access).is_err());
        assert!(issuer.verify(&refresh, TokenType::Refresh).is_ok());
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = TokenIssuer::new(b"other-secret", 3600, 86400)
            .sign(&alice(), TokenType::Access)
            .unwrap();
        assert!(matches!(
            issuer().verify(&token, TokenType::Access),
            Err(TokenError::Decoding(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = TokenIssuer::new(b"test-secret", -3600, -3600);
        let token = issuer.sign(&alice(), TokenType::Access).unwrap();
        assert!(issuer.verify(&token, TokenType::Access).is_err());
    }
}
