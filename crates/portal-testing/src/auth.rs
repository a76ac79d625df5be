//! Mock auth helpers for integration tests.
//!
//! Requests reach handlers only after the authenticator has validated a bearer
//! token, so tests mint a real token with the shared test secret instead of
//! faking the principal.

use axum::http::{HeaderMap, HeaderValue, header};

use portal_auth_types::bearer::bearer_header_value;
use portal_auth_types::token::{DEFAULT_TOKEN_TTL_SECS, TokenService};
use portal_domain::user::Role;

/// Secret shared by the test router and every `MockAuth`.
pub const TEST_JWT_SECRET: &str = "portal-test-secret-0123456789abcdef";

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub username: String,
    pub role: Role,
}

impl MockAuth {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    pub fn token_service() -> TokenService {
        TokenService::new(TEST_JWT_SECRET, DEFAULT_TOKEN_TTL_SECS)
    }

    /// Raw signed token for this identity.
    pub fn token(&self) -> String {
        Self::token_service()
            .issue(&self.username, self.role)
            .unwrap()
            .token
    }

    /// Return headers carrying `Authorization: Bearer <token>`.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&bearer_header_value(&self.token())).unwrap(),
        );
        map
    }
}
