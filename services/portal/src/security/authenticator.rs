use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use portal_auth_types::bearer::bearer_token;
use portal_auth_types::principal::Principal;
use portal_auth_types::token::TokenService;

use crate::domain::repository::UserRepository;
use crate::security::identity::IdentityResolver;
use crate::state::AppState;

/// Attach a [`Principal`] to `req` when it carries a valid bearer token for a live user.
///
/// Every failure leaves the request unauthenticated. A principal that is already
/// attached is left untouched, so running this twice on one request is harmless.
pub async fn authenticate<B, R: UserRepository>(
    tokens: &TokenService,
    resolver: &IdentityResolver<R>,
    req: &mut http::Request<B>,
) {
    if req.extensions().get::<Principal>().is_some() {
        return;
    }
    let Some(token) = bearer_token(req.headers()) else {
        return;
    };
    let claims = match tokens.validate(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(reason = %e, "bearer token rejected");
            return;
        }
    };
    match resolver.resolve(&claims).await {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
        }
        Err(e) => {
            tracing::debug!(subject = %claims.sub, reason = %e, "token subject not resolvable");
        }
    }
}

/// Router middleware wrapping [`authenticate`]. Always forwards to the next stage.
pub async fn authenticate_request(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    authenticate(&state.tokens, &state.identity_resolver(), &mut req).await;
    next.run(req).await
}
