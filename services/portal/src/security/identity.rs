use portal_auth_types::principal::Principal;
use portal_auth_types::token::Claims;

use crate::domain::repository::UserRepository;
use crate::error::PortalError;

/// Why a validated token could not be turned into a principal.
#[derive(Debug, thiserror::Error)]
pub enum Unauthenticated {
    #[error("no user named {0}")]
    UnknownSubject(String),
    #[error("user lookup failed")]
    Lookup(#[source] PortalError),
}

/// Maps validated claims to the principal of the user they name.
///
/// The user record is read on every call. Tokens are never revoked server-side, so a
/// user deleted after issuance must stop resolving here. The role attached to the
/// principal is the stored one, which keeps an admin role change effective immediately.
pub struct IdentityResolver<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> IdentityResolver<R> {
    pub async fn resolve(&self, claims: &Claims) -> Result<Principal, Unauthenticated> {
        let user = self
            .users
            .find_by_username(claims.username())
            .await
            .map_err(Unauthenticated::Lookup)?
            .ok_or_else(|| Unauthenticated::UnknownSubject(claims.username().to_owned()))?;
        Ok(Principal::new(user.id, user.username, user.role))
    }
}
