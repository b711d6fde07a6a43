use axum::{
    Json,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::auth::token::TokenError;
use crate::catalog::tree::TreeError;
use crate::store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportPolicy {
    Ignore,
    Report,
}

/// Inserted into the response extensions for errors that deserve a follow-up,
/// so outer layers can pick them up without re-parsing the body.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub id: String,
    pub status_code: u16,
    pub public_code: String,
    pub summary: String,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    public_code: String,
    public_message: Option<String>,
    report_policy: ReportPolicy,
    report_summary: Option<String>,
}

impl ApiError {
    pub const NOT_FOUND: ApiError = ApiError {
        status: StatusCode::NOT_FOUND,
        public_code: String::new(),
        public_message: None,
        report_policy: ReportPolicy::Ignore,
        report_summary: None,
    };

    pub const FORBIDDEN: ApiError = ApiError {
        status: StatusCode::FORBIDDEN,
        public_code: String::new(),
        public_message: None,
        report_policy: ReportPolicy::Ignore,
        report_summary: None,
    };

    pub const UNAUTHORIZED: ApiError = ApiError {
        status: StatusCode::UNAUTHORIZED,
        public_code: String::new(),
        public_message: None,
        report_policy: ReportPolicy::Ignore,
        report_summary: None,
    };
}

impl ApiError {
    fn new(
        status: StatusCode,
        public_code: impl Into<String>,
        public_message: Option<String>,
        report_policy: ReportPolicy,
    ) -> Self {
        Self {
            status,
            public_code: public_code.into(),
            public_message,
            report_policy,
            report_summary: None,
        }
    }

    fn with_report(mut self, summary: impl Into<String>) -> Self {
        self.report_summary = Some(summary.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &str {
        &self.public_code
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("Internal error: {}", msg);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            None,
            ReportPolicy::Report,
        )
        .with_report(msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Not found: {}", msg);
        Self::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            Some(msg),
            ReportPolicy::Ignore,
        )
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Validation failed: {}", msg);
        Self::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            Some(msg),
            ReportPolicy::Ignore,
        )
    }

    pub fn constraint_violation(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Constraint violation: {}", msg);
        Self::new(
            StatusCode::BAD_REQUEST,
            "CONSTRAINT_VIOLATION",
            Some(msg),
            ReportPolicy::Ignore,
        )
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Business rule violated: {}", msg);
        Self::new(
            StatusCode::BAD_REQUEST,
            "BUSINESS_RULE",
            Some(msg),
            ReportPolicy::Ignore,
        )
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Unauthorized: {}", msg);
        Self::new(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            Some(msg),
            ReportPolicy::Ignore,
        )
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Forbidden: {}", msg);
        Self::new(
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
            Some(msg),
            ReportPolicy::Ignore,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorEnvelope<'a> {
            error: ErrorBody<'a>,
        }

        #[derive(Serialize)]
        struct ErrorBody<'a> {
            code: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            id: Option<&'a str>,
            message: &'a str,
        }

        let code = if self.public_code.is_empty() {
            match self.status {
                StatusCode::NOT_FOUND => "NOT_FOUND",
                StatusCode::FORBIDDEN => "FORBIDDEN",
                StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
                StatusCode::BAD_REQUEST => "BAD_REQUEST",
                _ => "ERROR",
            }
        } else {
            self.public_code.as_str()
        };

        let public_message = self
            .public_message
            .as_deref()
            .unwrap_or_else(|| self.status.canonical_reason().unwrap_or("Error"));

        let error_id = (self.report_policy == ReportPolicy::Report)
            .then(|| uuid::Uuid::new_v4().simple().to_string());

        let mut response = (
            self.status,
            Json(ErrorEnvelope {
                error: ErrorBody {
                    code,
                    id: error_id.as_deref(),
                    message: public_message,
                },
            }),
        )
            .into_response();

        if let Some(id) = error_id.as_deref() {
            if let Ok(v) = HeaderValue::from_str(id) {
                response.headers_mut().insert("x-error-id", v);
            }

            let report = ErrorReport {
                id: id.to_string(),
                status_code: self.status.as_u16(),
                public_code: code.to_string(),
                summary: self
                    .report_summary
                    .clone()
                    .unwrap_or_else(|| public_message.to_string()),
            };
            response.extensions_mut().insert(report);
        }

        response
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(msg) => Self::validation(msg),
            StoreError::ConstraintViolation(msg) => Self::constraint_violation(msg),
            StoreError::BusinessRuleViolation(msg) => Self::business_rule(msg),
            StoreError::NotFound { entity, id } => crate::not_found!("{entity} {id} not found"),
            StoreError::Forbidden(msg) => Self::forbidden(msg),
            StoreError::Integrity(msg) => Self::internal(format!("Data integrity error: {msg}")),
            StoreError::Hashing(msg) => Self::internal(format!("Password hashing failed: {msg}")),
            StoreError::Database(db_err) => db_err.into(),
        }
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        tracing::error!("Database error: {:?}", err);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "DATABASE_ERROR",
            None,
            ReportPolicy::Report,
        )
        .with_report(format!("{:?}", err))
    }
}

impl From<TreeError> for ApiError {
    fn from(err: TreeError) -> Self {
        StoreError::from(err).into()
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Encoding(msg) => Self::internal(format!("Failed to issue token: {msg}")),
            other => Self::unauthorized(other.to_string()),
        }
    }
}

impl std::error::Error for ApiError {}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.public_code.as_str())
    }
}

#[macro_export]
macro_rules! not_found {
    ($($arg:tt)*) => { $crate::error::ApiError::not_found(format!($($arg)*)) };
}

#[macro_export]
macro_rules! unauthorized {
    ($($arg:tt)*) => { $crate::error::ApiError::unauthorized(format!($($arg)*)) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_client_errors() {
        let err: ApiError = StoreError::BusinessRuleViolation("already reviewed".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "BUSINESS_RULE");

        let err: ApiError = StoreError::NotFound {
            entity: "product",
            id: 7,
        }
        .into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = StoreError::ConstraintViolation("brand name taken".into()).into();
        assert_eq!(err.code(), "CONSTRAINT_VIOLATION");
    }

    #[test]
    fn internal_errors_carry_an_error_id() {
        let response = ApiError::internal("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key("x-error-id"));
        assert!(response.extensions().get::<ErrorReport>().is_some());
    }
}
