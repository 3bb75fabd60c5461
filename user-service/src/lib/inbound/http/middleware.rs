use std::collections::HashMap;

use auth::IdentityClaims;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::Uri;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Header, cookie and query parameter name carrying the access token.
pub const ACCESS_TOKEN_NAME: &str = "x-access-token";

/// Extension type to store the verified identity in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: IdentityClaims,
}

/// Middleware guarding protected routes.
///
/// Requests without a verifiable token never reach the handler and all get
/// the same 403 response; the reason is only logged.
pub async fn gate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credential = extract_credential(&req);

    let claims = state
        .authenticator
        .authorize(credential.as_deref())
        .map_err(|e| {
            tracing::warn!(error = %e, uri = %req.uri(), "Access denied");
            ApiError::Forbidden("Access denied".to_string())
        })?;

    req.extensions_mut().insert(AuthenticatedUser { claims });

    Ok(next.run(req).await)
}

/// Locate the access token on a request.
///
/// Looks at the `x-access-token` header, then cookie, then query parameter;
/// the first present, non-empty value wins.
pub fn extract_credential<B>(req: &axum::http::Request<B>) -> Option<String> {
    from_header(req.headers())
        .or_else(|| from_cookie(req.headers()))
        .or_else(|| from_query(req.uri()))
}

fn from_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ACCESS_TOKEN_NAME)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn from_cookie(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(ACCESS_TOKEN_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

fn from_query(uri: &Uri) -> Option<String> {
    let Query(mut params) = Query::<HashMap<String, String>>::try_from_uri(uri).ok()?;
    params
        .remove(ACCESS_TOKEN_NAME)
        .filter(|value| !value.is_empty())
}
