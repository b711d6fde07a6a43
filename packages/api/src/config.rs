use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://storefront.db?mode=rwc";

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("db_max_connections", &self.db_max_connections)
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_secs", &self.refresh_token_ttl_secs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;
        if jwt_secret.len() < 16 {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET must be at least 16 bytes".to_string(),
            ));
        }

        Ok(Config {
            port: parse_var("PORT", 8080)?,
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 10)?,
            jwt_secret,
            access_token_ttl_secs: parse_var("ACCESS_TOKEN_TTL_SECS", 60 * 60)?,
            refresh_token_ttl_secs: parse_var("REFRESH_TOKEN_TTL_SECS", 24 * 60 * 60)?,
        })
    }

    /// Configuration for tests and local tooling: in-memory SQLite and a fixed secret.
    pub fn in_memory(jwt_secret: impl Into<String>) -> Self {
        Config {
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            jwt_secret: jwt_secret.into(),
            access_token_ttl_secs: 60 * 60,
            refresh_token_ttl_secs: 24 * 60 * 60,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid value for: {0}")]
    InvalidValue(String),
}
