use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::{sync::Arc, time::Duration};

use crate::auth::AuthenticatedUser;
use crate::auth::token::{TokenError, TokenIssuer, TokenType};
use crate::config::Config;
use crate::store::schema::create_schema;

pub type AppState = Arc<State>;

/// Cached outcome of verifying a bearer token.
#[derive(Clone, Debug)]
pub enum CachedAuth {
    User { user: AuthenticatedUser, exp: i64 },
    /// Invalid/expired token
    Invalid,
}

pub struct State {
    pub config: Config,
    pub db: DatabaseConnection,
    pub tokens: TokenIssuer,
    /// Auth token cache: token_hash -> CachedAuth
    /// Short TTL (240s) to balance security vs performance
    pub auth_cache: moka::sync::Cache<String, CachedAuth>,
}

impl State {
    /// Connects to `config.database_url` and makes sure the tables exist.
    pub async fn new(config: Config) -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new(config.database_url.to_owned());
        opt.max_connections(config.db_max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .sqlx_logging(false);

        let db = Database::connect(opt).await?;
        create_schema(&db).await?;
        tracing::info!("Connected to database");

        Ok(Self::with_connection(config, db))
    }

    pub fn with_connection(config: Config, db: DatabaseConnection) -> Self {
        let tokens = TokenIssuer::from_config(&config);
        let auth_cache = moka::sync::Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(240))
            .build();

        Self {
            config,
            db,
            tokens,
            auth_cache,
        }
    }

    /// Resolves an access token to the caller. Results, including failures, are
    /// memoized by the token's blake3 digest so the raw token is never a cache key.
    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, TokenError> {
        let key = blake3::hash(token.as_bytes()).to_hex().to_string();
        let now = chrono::Utc::now().timestamp();

        match self.auth_cache.get(&key) {
            Some(CachedAuth::User { user, exp }) if exp > now => return Ok(user),
            Some(CachedAuth::Invalid) => {
                return Err(TokenError::Decoding("token previously rejected".to_string()));
            }
            _ => {}
        }

        match self
            .tokens
            .verify(token, TokenType::Access)
            .and_then(|claims| Ok((claims.user()?, claims.exp)))
        {
            Ok((user, exp)) => {
                self.auth_cache.insert(
                    key,
                    CachedAuth::User {
                        user: user.clone(),
                        exp,
                    },
                );
                Ok(user)
            }
            Err(err) => {
                self.auth_cache.insert(key, CachedAuth::Invalid);
                Err(err)
            }
        }
    }
}
