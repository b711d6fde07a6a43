use axum::{extract::Request, middleware::Next, response::Response};

use crate::{error::ErrorReport, middleware::jwt::AppUser};

fn redact_bearer(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while let Some(pos) = input[i..].find("Bearer ") {
        let abs = i + pos;
        out.push_str(&input[i..abs]);
        out.push_str("Bearer [REDACTED]");
        let token_start = abs + "Bearer ".len();
        let token_end = input[token_start..]
            .find(|c: char| c.is_whitespace())
            .map(|p| token_start + p)
            .unwrap_or(input.len());
        i = token_end;
    }
    out.push_str(&input[i..]);
    out
}

fn redact_kv(input: &str, key: &str) -> String {
    let mut out = input.to_string();
    let needle = format!("{}=", key);
    let mut search_start = 0;
    while let Some(pos) = out[search_start..].find(&needle) {
        let abs = search_start + pos;
        let value_start = abs + needle.len();
        let value_end = out[value_start..]
            .find(|c: char| c == '&' || c == ';' || c == ',' || c.is_whitespace())
            .map(|p| value_start + p)
            .unwrap_or(out.len());
        out.replace_range(value_start..value_end, "[REDACTED]");
        search_start = value_start + "[REDACTED]".len();
    }
    out
}

/// Scrubs credentials out of an error summary before it is logged.
pub(crate) fn sanitize_text(mut input: String) -> String {
    input = redact_bearer(&input);

    for key in ["password", "password_hash", "secret", "token", "access", "refresh"] {
        input = redact_kv(&input, key);
    }

    const MAX_LEN: usize = 8 * 1024;
    if input.len() > MAX_LEN {
        input.truncate(MAX_LEN);
    }
    input
}

/// Logs responses that carry an [`ErrorReport`] with request context.
pub async fn error_reporting_middleware(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    // If JWT middleware ran before us, AppUser will be available as an extension.
    let user_id = req.extensions().get::<AppUser>().and_then(AppUser::id);

    let mut response = next.run(req).await;

    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    tracing::error!(
        error_id = %report.id,
        status_code = report.status_code,
        public_code = %report.public_code,
        method = %method,
        path = %path,
        user_id = ?user_id,
        "{}", sanitize_text(report.summary)
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_are_scrubbed() {
        let text = "login failed password=secret123 with Bearer abc.def.ghi token=xyz".to_string();
        let clean = sanitize_text(text);
        assert!(!clean.contains("secret123"));
        assert!(!clean.contains("abc.def.ghi"));
        assert!(!clean.contains("xyz"));
        assert!(clean.contains("Bearer [REDACTED]"));
    }
}
