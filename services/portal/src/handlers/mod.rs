pub mod admin;
pub mod auth;
pub mod evaluations;
pub mod feedback;
pub mod progress;
pub mod projects;
pub mod users;

use portal_auth_types::principal::Principal;
use portal_domain::user::Role;

use crate::error::PortalError;

/// Handler-level guard for operations narrower than their route's policy rule.
pub(crate) fn require_role(principal: &Principal, roles: &[Role]) -> Result<(), PortalError> {
    if principal.has_any_role(roles) {
        Ok(())
    } else {
        Err(PortalError::Forbidden)
    }
}
