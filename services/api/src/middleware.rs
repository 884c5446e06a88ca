//! Session resolution middleware
//!
//! Resolves the request's bearer token against the session store and inserts
//! a [`SessionContext`] into request extensions. Requests without a token, or
//! with a token the store no longer knows, proceed as `Anonymous`; handlers
//! decide what identity they require.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::session::SessionContext;
use crate::state::AppState;

/// Extract the bearer token from an Authorization header, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// Resolve the session token into a [`SessionContext`] for downstream
/// handlers
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let context = match bearer_token(req.headers()) {
        Some(token) => match state.sessions.peek(token).await? {
            Some(record) => SessionContext::from_record(&record),
            None => SessionContext::Anonymous,
        },
        None => SessionContext::Anonymous,
    };

    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc-123"),
        );
        assert_eq!(bearer_token(&headers), Some("abc-123"));
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc-123"));
        assert_eq!(bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
