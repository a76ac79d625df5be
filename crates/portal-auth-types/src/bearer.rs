//! `Authorization: Bearer <token>` parsing.

use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use http::HeaderMap;

/// Return the bearer token from the `Authorization` header, if one is present and well formed.
///
/// A missing header, a different scheme, or an empty token all yield `None`: an absent
/// credential is not an error, the request simply proceeds unauthenticated.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth = headers.typed_get::<Authorization<Bearer>>()?;
    let token = auth.token().trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_owned())
}

/// Build an `Authorization` header value for the given token.
pub fn bearer_header_value(token: &str) -> String {
    format!("Bearer {token}")
}
