//! `/api/admin/**`: every route here is ADMIN-only by policy.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use portal_auth_types::principal::Principal;
use portal_domain::id::{ProjectId, UserId};
use portal_domain::project::ProjectStatus;
use portal_domain::user::Role;

use crate::error::PortalError;
use crate::handlers::projects::{ProjectResponse, project_list};
use crate::handlers::users::{UserResponse, user_list};
use crate::state::AppState;
use crate::usecase::assignment::AssignmentManager;
use crate::usecase::auth::NewAccountInput;
use crate::usecase::lifecycle::ProjectLifecycle;
use crate::usecase::project::{
    DashboardStatsUseCase, ProjectProgressUseCase, ProjectQueries, SetDeadlineUseCase,
};
use crate::usecase::user::{CreateSupervisorUseCase, DeleteUserUseCase, UserDirectory};

// ── Users ────────────────────────────────────────────────────────────────────

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, PortalError> {
    let directory = UserDirectory {
        repo: state.user_repo(),
    };
    Ok(user_list(directory.list_all().await?))
}

pub async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, PortalError> {
    let directory = UserDirectory {
        repo: state.user_repo(),
    };
    Ok(user_list(directory.by_role(Role::Student).await?))
}

pub async fn list_supervisors(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, PortalError> {
    let directory = UserDirectory {
        repo: state.user_repo(),
    };
    Ok(user_list(directory.supervisors().await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupervisorRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub faculty: Option<String>,
}

pub async fn create_supervisor(
    State(state): State<AppState>,
    Json(body): Json<CreateSupervisorRequest>,
) -> Result<(StatusCode, Json<UserResponse>), PortalError> {
    let usecase = CreateSupervisorUseCase {
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

pub async fn assign_faculty(
    State(state): State<AppState>,
    Path((student_id, supervisor_id)): Path<(UserId, UserId)>,
) -> Result<Json<UserResponse>, PortalError> {
    let manager = AssignmentManager {
        users: state.user_repo(),
    };
    Ok(Json(manager.assign(student_id, supervisor_id).await?.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<StatusCode, PortalError> {
    let usecase = DeleteUserUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Projects ─────────────────────────────────────────────────────────────────

pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, PortalError> {
    let queries = ProjectQueries {
        repo: state.project_repo(),
    };
    Ok(project_list(queries.list_all().await?))
}

pub async fn list_pending_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, PortalError> {
    let queries = ProjectQueries {
        repo: state.project_repo(),
    };
    Ok(project_list(queries.by_status(ProjectStatus::Pending).await?))
}

pub async fn approve_project(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<Json<ProjectResponse>, PortalError> {
    let lifecycle = ProjectLifecycle {
        repo: state.project_repo(),
    };
    Ok(Json(lifecycle.approve(&principal, id).await?.into()))
}

pub async fn reject_project(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<Json<ProjectResponse>, PortalError> {
    let lifecycle = ProjectLifecycle {
        repo: state.project_repo(),
    };
    Ok(Json(lifecycle.reject(&principal, id).await?.into()))
}

#[derive(Deserialize)]
pub struct DeadlineRequest {
    pub deadline: NaiveDate,
}

pub async fn set_deadline(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Json(body): Json<DeadlineRequest>,
) -> Result<Json<ProjectResponse>, PortalError> {
    let usecase = SetDeadlineUseCase {
        repo: state.project_repo(),
    };
    Ok(Json(usecase.execute(id, body.deadline).await?.into()))
}

// ── Monitoring ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsResponse {
    pub total_students: u64,
    pub total_supervisors: u64,
    pub total_projects: u64,
    pub pending_projects: u64,
    pub completed_projects: u64,
    pub completion_rate: f64,
}

pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStatsResponse>, PortalError> {
    let usecase = DashboardStatsUseCase {
        users: state.user_repo(),
        projects: state.project_repo(),
    };
    let stats = usecase.execute().await?;
    Ok(Json(DashboardStatsResponse {
        total_students: stats.total_students,
        total_supervisors: stats.total_supervisors,
        total_projects: stats.total_projects,
        pending_projects: stats.pending_projects,
        completed_projects: stats.completed_projects,
        completion_rate: stats.completion_rate,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgressResponse {
    pub project_id: ProjectId,
    pub progress: i32,
    pub status: ProjectStatus,
    pub update_count: u64,
    pub average_score: f64,
}

pub async fn project_progress(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<Json<ProjectProgressResponse>, PortalError> {
    let usecase = ProjectProgressUseCase {
        projects: state.project_repo(),
        updates: state.progress_repo(),
        evaluations: state.evaluation_repo(),
    };
    let summary = usecase.execute(id).await?;
    Ok(Json(ProjectProgressResponse {
        project_id: summary.project_id,
        progress: summary.progress,
        status: summary.status,
        update_count: summary.progress_update_count,
        average_score: summary.average_score,
    }))
}
