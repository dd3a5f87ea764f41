//! Authentication: admin JWT middleware, menu tokens and rate limiting

pub mod admin_auth;
pub mod menu_token;
pub mod rate_limit;

pub use admin_auth::AdminIdentity;
pub use menu_token::MenuAccess;

/// Pull the token out of `Authorization: Bearer <token>`
pub(crate) fn bearer_token(headers: &http::HeaderMap) -> Option<&str> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
