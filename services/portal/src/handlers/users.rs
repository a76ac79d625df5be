use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use portal_auth_types::principal::Principal;
use portal_domain::id::UserId;
use portal_domain::user::Role;

use crate::domain::types::{User, UserProfileUpdate};
use crate::error::PortalError;
use crate::handlers::require_role;
use crate::state::AppState;
use crate::usecase::assignment::AssignmentManager;
use crate::usecase::user::{DeleteUserUseCase, UpdateUserUseCase, UserDirectory};

// ── Response types ───────────────────────────────────────────────────────────

/// Public view of an account. Never carries the password hash.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub faculty: Option<String>,
    pub supervisor_id: Option<UserId>,
    pub supervisor_name: Option<String>,
    #[serde(serialize_with = "portal_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "portal_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let (supervisor_id, supervisor_name) = match user.supervisor {
            Some(link) => (Some(link.supervisor_id), Some(link.supervisor_name)),
            None => (None, None),
        };
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            faculty: user.faculty,
            supervisor_id,
            supervisor_name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

pub(crate) fn user_list(users: Vec<User>) -> Json<Vec<UserResponse>> {
    Json(users.into_iter().map(UserResponse::from).collect())
}

// ── Directory reads ──────────────────────────────────────────────────────────

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, PortalError> {
    let directory = UserDirectory {
        repo: state.user_repo(),
    };
    Ok(user_list(directory.list_all().await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserResponse>, PortalError> {
    let directory = UserDirectory {
        repo: state.user_repo(),
    };
    Ok(Json(directory.get(id).await?.into()))
}

pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, PortalError> {
    let directory = UserDirectory {
        repo: state.user_repo(),
    };
    Ok(Json(directory.by_username(&username).await?.into()))
}

pub async fn get_users_by_role(
    principal: Principal,
    State(state): State<AppState>,
    Path(role): Path<Role>,
) -> Result<Json<Vec<UserResponse>>, PortalError> {
    require_role(&principal, &[Role::Admin])?;
    let directory = UserDirectory {
        repo: state.user_repo(),
    };
    Ok(user_list(directory.by_role(role).await?))
}

pub async fn get_supervisors(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, PortalError> {
    let directory = UserDirectory {
        repo: state.user_repo(),
    };
    Ok(user_list(directory.supervisors().await?))
}

pub async fn get_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, PortalError> {
    let directory = UserDirectory {
        repo: state.user_repo(),
    };
    Ok(user_list(directory.students().await?))
}

pub async fn get_students_of(
    State(state): State<AppState>,
    Path(supervisor_id): Path<UserId>,
) -> Result<Json<Vec<UserResponse>>, PortalError> {
    let directory = UserDirectory {
        repo: state.user_repo(),
    };
    Ok(user_list(directory.students_of(supervisor_id).await?))
}

pub async fn get_my_students(
    principal: Principal,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, PortalError> {
    let directory = UserDirectory {
        repo: state.user_repo(),
    };
    Ok(user_list(directory.students_of(principal.user_id).await?))
}

pub async fn get_me(
    principal: Principal,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, PortalError> {
    let directory = UserDirectory {
        repo: state.user_repo(),
    };
    Ok(Json(directory.get(principal.user_id).await?.into()))
}

// ── PUT /api/users/{id} ──────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub faculty: Option<String>,
    pub role: Option<Role>,
}

pub async fn update_user(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, PortalError> {
    require_role(&principal, &[Role::Admin])?;
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            id,
            UserProfileUpdate {
                email: body.email,
                first_name: body.first_name,
                last_name: body.last_name,
                faculty: body.faculty,
                role: body.role,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── DELETE /api/users/{id} ───────────────────────────────────────────────────

pub async fn delete_user(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<StatusCode, PortalError> {
    require_role(&principal, &[Role::Admin])?;
    let usecase = DeleteUserUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Assignment ───────────────────────────────────────────────────────────────

pub async fn assign_supervisor(
    principal: Principal,
    State(state): State<AppState>,
    Path((student_id, supervisor_id)): Path<(UserId, UserId)>,
) -> Result<Json<UserResponse>, PortalError> {
    require_role(&principal, &[Role::Admin])?;
    let manager = AssignmentManager {
        users: state.user_repo(),
    };
    Ok(Json(manager.assign(student_id, supervisor_id).await?.into()))
}

pub async fn remove_supervisor(
    State(state): State<AppState>,
    Path(student_id): Path<UserId>,
) -> Result<Json<UserResponse>, PortalError> {
    let manager = AssignmentManager {
        users: state.user_repo(),
    };
    Ok(Json(manager.unassign(student_id).await?.into()))
}

pub async fn supervisor_remove_student(
    principal: Principal,
    State(state): State<AppState>,
    Path((supervisor_id, student_id)): Path<(UserId, UserId)>,
) -> Result<Json<UserResponse>, PortalError> {
    let manager = AssignmentManager {
        users: state.user_repo(),
    };
    let student = manager
        .remove_own_student(&principal, supervisor_id, student_id)
        .await?;
    Ok(Json(student.into()))
}
