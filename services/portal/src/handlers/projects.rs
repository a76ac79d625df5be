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

use crate::domain::types::{Project, ProjectDetails};
use crate::error::PortalError;
use crate::handlers::require_role;
use crate::state::AppState;
use crate::usecase::lifecycle::ProjectLifecycle;
use crate::usecase::project::{
    AssignProjectsToSupervisorsUseCase, DeleteProjectUseCase, ProjectQueries, SubmitProjectInput,
    SubmitProjectUseCase, UpdateProjectUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub objective: Option<String>,
    pub tools: Option<String>,
    pub category: Option<String>,
    pub github_link: Option<String>,
    pub status: ProjectStatus,
    pub student_id: UserId,
    pub faculty_id: Option<UserId>,
    pub progress: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(serialize_with = "portal_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "portal_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            objective: p.objective,
            tools: p.tools,
            category: p.category,
            github_link: p.github_link,
            status: p.status,
            student_id: p.student_id,
            faculty_id: p.faculty_id,
            progress: p.progress,
            start_date: p.start_date,
            end_date: p.end_date,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

pub(crate) fn project_list(projects: Vec<Project>) -> Json<Vec<ProjectResponse>> {
    Json(projects.into_iter().map(ProjectResponse::from).collect())
}

// ── Request types ────────────────────────────────────────────────────────────

/// Body of submit and update. Status is never read from it.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub objective: Option<String>,
    pub tools: Option<String>,
    pub category: Option<String>,
    pub github_link: Option<String>,
    pub progress: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub faculty_id: Option<UserId>,
}

impl ProjectRequest {
    fn details(&self) -> ProjectDetails {
        ProjectDetails {
            title: self.title.clone(),
            description: self.description.clone(),
            objective: self.objective.clone(),
            tools: self.tools.clone(),
            category: self.category.clone(),
            github_link: self.github_link.clone(),
            progress: self.progress,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

// ── Reads ────────────────────────────────────────────────────────────────────

pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, PortalError> {
    let queries = ProjectQueries {
        repo: state.project_repo(),
    };
    Ok(project_list(queries.list_all().await?))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<Json<ProjectResponse>, PortalError> {
    let queries = ProjectQueries {
        repo: state.project_repo(),
    };
    Ok(Json(queries.get(id).await?.into()))
}

pub async fn get_projects_by_student(
    State(state): State<AppState>,
    Path(student_id): Path<UserId>,
) -> Result<Json<Vec<ProjectResponse>>, PortalError> {
    let queries = ProjectQueries {
        repo: state.project_repo(),
    };
    Ok(project_list(queries.by_student(student_id).await?))
}

pub async fn get_projects_by_faculty(
    State(state): State<AppState>,
    Path(faculty_id): Path<UserId>,
) -> Result<Json<Vec<ProjectResponse>>, PortalError> {
    let queries = ProjectQueries {
        repo: state.project_repo(),
    };
    Ok(project_list(queries.by_faculty(faculty_id).await?))
}

pub async fn get_projects_by_status(
    State(state): State<AppState>,
    Path(status): Path<ProjectStatus>,
) -> Result<Json<Vec<ProjectResponse>>, PortalError> {
    let queries = ProjectQueries {
        repo: state.project_repo(),
    };
    Ok(project_list(queries.by_status(status).await?))
}

pub async fn get_my_projects(
    principal: Principal,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, PortalError> {
    let queries = ProjectQueries {
        repo: state.project_repo(),
    };
    Ok(project_list(queries.by_student(principal.user_id).await?))
}

pub async fn get_projects_of_supervised_students(
    State(state): State<AppState>,
    Path(supervisor_id): Path<UserId>,
) -> Result<Json<Vec<ProjectResponse>>, PortalError> {
    let queries = ProjectQueries {
        repo: state.project_repo(),
    };
    Ok(project_list(
        queries.of_supervised_students(supervisor_id).await?,
    ))
}

pub async fn get_my_students_projects(
    principal: Principal,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, PortalError> {
    require_role(&principal, &[Role::Supervisor, Role::Faculty])?;
    let queries = ProjectQueries {
        repo: state.project_repo(),
    };
    Ok(project_list(
        queries.of_supervised_students(principal.user_id).await?,
    ))
}

// ── POST /api/projects/submit ────────────────────────────────────────────────

pub async fn submit_project(
    principal: Principal,
    State(state): State<AppState>,
    Json(body): Json<ProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), PortalError> {
    let usecase = SubmitProjectUseCase {
        users: state.user_repo(),
        projects: state.project_repo(),
    };
    let mut details = body.details();
    let title = details.title.take().unwrap_or_default();
    let project = usecase
        .execute(
            &principal,
            SubmitProjectInput {
                title,
                details,
                faculty_id: body.faculty_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(project.into())))
}

// ── PUT /api/projects/{id} ───────────────────────────────────────────────────

pub async fn update_project(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Json(body): Json<ProjectRequest>,
) -> Result<Json<ProjectResponse>, PortalError> {
    let usecase = UpdateProjectUseCase {
        repo: state.project_repo(),
    };
    let project = usecase.execute(&principal, id, body.details()).await?;
    Ok(Json(project.into()))
}

// ── DELETE /api/projects/{id} ────────────────────────────────────────────────

pub async fn delete_project(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<StatusCode, PortalError> {
    let usecase = DeleteProjectUseCase {
        repo: state.project_repo(),
    };
    usecase.execute(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Lifecycle transitions ────────────────────────────────────────────────────

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

pub async fn complete_project(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<Json<ProjectResponse>, PortalError> {
    let lifecycle = ProjectLifecycle {
        repo: state.project_repo(),
    };
    Ok(Json(lifecycle.complete(&principal, id).await?.into()))
}

/// Body is the bare status string, e.g. `"APPROVED"`.
pub async fn update_project_status(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Json(status): Json<ProjectStatus>,
) -> Result<Json<ProjectResponse>, PortalError> {
    let lifecycle = ProjectLifecycle {
        repo: state.project_repo(),
    };
    Ok(Json(lifecycle.transition(&principal, id, status).await?.into()))
}

// ── POST /api/projects/assign-to-supervisors ─────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedCountResponse {
    pub updated: u64,
}

pub async fn assign_projects_to_supervisors(
    principal: Principal,
    State(state): State<AppState>,
) -> Result<Json<AssignedCountResponse>, PortalError> {
    require_role(&principal, &[Role::Admin])?;
    let usecase = AssignProjectsToSupervisorsUseCase {
        users: state.user_repo(),
        projects: state.project_repo(),
    };
    let updated = usecase.execute().await?;
    Ok(Json(AssignedCountResponse { updated }))
}
