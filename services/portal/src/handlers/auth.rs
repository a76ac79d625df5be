use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use portal_domain::id::UserId;
use portal_domain::user::Role;

use crate::error::PortalError;
use crate::handlers::users::UserResponse;
use crate::state::AppState;
use crate::usecase::auth::{LoginUseCase, NewAccountInput, RegisterUseCase};

// ── POST /api/auth/register ──────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub faculty: Option<String>,
    /// Accepted for compatibility and ignored: only assignment writes the supervisor.
    pub supervisor_name: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), PortalError> {
    let usecase = RegisterUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(NewAccountInput {
            username: body.username,
            email: body.email,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
            faculty: body.faculty,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── POST /api/auth/login ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: u64,
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, PortalError> {
    let usecase = LoginUseCase {
        repo: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    let out = usecase.execute(&body.username, &body.password).await?;
    Ok(Json(LoginResponse {
        token: out.token,
        token_type: "Bearer",
        expires_at: out.expires_at,
        id: out.user.id,
        username: out.user.username,
        email: out.user.email,
        role: out.user.role,
    }))
}
