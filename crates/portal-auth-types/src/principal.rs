//! The authenticated identity attached to a request.

use std::collections::BTreeSet;

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;

use portal_domain::id::UserId;
use portal_domain::user::Role;

/// Role → granted authority. The only place authority names are spelled out.
pub fn authority_for(role: Role) -> &'static str {
    match role {
        Role::Admin => "ROLE_ADMIN",
        Role::Faculty => "ROLE_FACULTY",
        Role::Supervisor => "ROLE_SUPERVISOR",
        Role::Student => "ROLE_STUDENT",
    }
}

/// Identity resolved from a validated bearer token plus a user lookup.
///
/// Built fresh on every request and stored in the request extensions by the
/// authenticator middleware. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
    pub authorities: BTreeSet<String>,
}

impl Principal {
    pub fn new(user_id: UserId, username: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            username: username.into(),
            role,
            authorities: BTreeSet::from([authority_for(role).to_owned()]),
        }
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles
            .iter()
            .any(|role| self.has_authority(authority_for(*role)))
    }
}

/// Returns 401 when the authenticator attached no principal to the request.
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let principal = parts.extensions.get::<Principal>().cloned();
        async move { principal.ok_or(StatusCode::UNAUTHORIZED) }
    }
}
