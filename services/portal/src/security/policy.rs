//! Route-level access policy.
//!
//! A static table maps path patterns to the roles allowed through. Patterns are either
//! exact paths or `prefix/**`, which matches the prefix itself and anything below it.
//! The most specific matching pattern (most literal segments) decides; ties go to the
//! rule declared first. Handlers may narrow access further.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::Method;

use portal_auth_types::principal::Principal;
use portal_core::error::AppError;
use portal_domain::user::Role;

use crate::state::AppState;

const ADMIN: &[Role] = &[Role::Admin];
const STAFF: &[Role] = &[Role::Admin, Role::Faculty, Role::Supervisor];
const STUDENT: &[Role] = &[Role::Student];
const ANY_ROLE: &[Role] = &[Role::Admin, Role::Faculty, Role::Supervisor, Role::Student];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    /// Any resolved principal.
    Authenticated,
    AnyOf(&'static [Role]),
}

#[derive(Debug, Clone)]
pub struct Rule {
    /// `None` matches every method.
    pub method: Option<Method>,
    pub pattern: &'static str,
    pub requirement: Requirement,
}

impl Rule {
    pub const fn any(pattern: &'static str, requirement: Requirement) -> Self {
        Self {
            method: None,
            pattern,
            requirement,
        }
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        if self.method.as_ref().is_some_and(|m| m != method) {
            return false;
        }
        match self.pattern.strip_suffix("/**") {
            Some(prefix) => {
                prefix.is_empty()
                    || path == prefix
                    || path
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            None => path == self.pattern,
        }
    }

    fn specificity(&self) -> usize {
        self.pattern
            .split('/')
            .filter(|s| !s.is_empty() && *s != "**")
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    /// No principal on a route that needs one.
    Unauthenticated,
    /// A principal whose role is not allowed.
    Forbidden,
}

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<Rule>,
}

impl AccessPolicy {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The portal's route table.
    pub fn portal() -> Self {
        use Requirement::{AnyOf, Authenticated, Public};
        Self::new(vec![
            Rule::any("/healthz", Public),
            Rule::any("/readyz", Public),
            Rule::any("/api/auth/**", Public),
            Rule::any("/api/admin/**", AnyOf(ADMIN)),
            Rule::any("/api/users/**", AnyOf(STAFF)),
            Rule::any("/api/projects/approve/**", AnyOf(STAFF)),
            Rule::any("/api/projects/reject/**", AnyOf(STAFF)),
            Rule::any("/api/evaluations/**", AnyOf(ANY_ROLE)),
            Rule::any("/api/feedback/**", AnyOf(STAFF)),
            Rule::any("/api/projects/submit/**", AnyOf(STUDENT)),
            Rule::any("/api/projects/my/**", AnyOf(STUDENT)),
            Rule::any("/api/progress-updates/**", AnyOf(ANY_ROLE)),
            Rule::any("/api/documents/upload/**", AnyOf(STAFF)),
            Rule::any("/api/documents/supervisor/**", AnyOf(STAFF)),
            Rule::any("/api/documents/student/**", AnyOf(ANY_ROLE)),
            Rule::any("/api/documents/download/**", AnyOf(ANY_ROLE)),
            Rule::any("/api/documents/**", AnyOf(STAFF)),
            Rule::any("/api/projects/**", Authenticated),
            Rule::any("/**", Authenticated),
        ])
    }

    /// Requirement of the most specific rule matching `method` and `path`.
    /// Paths matched by no rule require authentication.
    pub fn requirement(&self, method: &Method, path: &str) -> Requirement {
        let mut best: Option<&Rule> = None;
        for rule in self.rules.iter().filter(|r| r.matches(method, path)) {
            if best.is_none_or(|b| rule.specificity() > b.specificity()) {
                best = Some(rule);
            }
        }
        best.map_or(Requirement::Authenticated, |r| r.requirement)
    }

    pub fn decide(&self, method: &Method, path: &str, principal: Option<&Principal>) -> Decision {
        match (self.requirement(method, path), principal) {
            (Requirement::Public, _) => Decision::Permit,
            (_, None) => Decision::Unauthenticated,
            (Requirement::Authenticated, Some(_)) => Decision::Permit,
            (Requirement::AnyOf(roles), Some(p)) if p.has_any_role(roles) => Decision::Permit,
            (Requirement::AnyOf(_), Some(_)) => Decision::Forbidden,
        }
    }
}

/// Router middleware enforcing [`AccessPolicy`]. Runs after the authenticator.
pub async fn enforce_policy(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let principal = req.extensions().get::<Principal>();
    let decision = state.policy.decide(req.method(), req.uri().path(), principal);
    match decision {
        Decision::Permit => next.run(req).await,
        Decision::Unauthenticated => AppError::Unauthorized.into_response(),
        Decision::Forbidden => {
            tracing::debug!(
                method = %req.method(),
                path = req.uri().path(),
                "role not permitted for route"
            );
            AppError::Forbidden.into_response()
        }
    }
}
