use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use portal_auth_types::principal::Principal;
use portal_domain::id::{ProgressUpdateId, ProjectId};

use crate::domain::types::{NewProgressUpdate, ProgressUpdate, ProgressUpdateEdit};
use crate::error::PortalError;
use crate::state::AppState;
use crate::usecase::progress::{
    CreateProgressUpdateUseCase, DeleteProgressUpdateUseCase, ProgressQueries,
    UpdateProgressUpdateUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdateResponse {
    pub id: ProgressUpdateId,
    pub project_id: ProjectId,
    pub week_number: i32,
    pub update_description: String,
    pub feedback: Option<String>,
    #[serde(serialize_with = "portal_core::serde::to_rfc3339_ms")]
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl From<ProgressUpdate> for ProgressUpdateResponse {
    fn from(u: ProgressUpdate) -> Self {
        Self {
            id: u.id,
            project_id: u.project_id,
            week_number: u.week_number,
            update_description: u.description,
            feedback: u.feedback,
            timestamp: u.created_at,
        }
    }
}

// ── POST /api/progress-updates ───────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgressUpdateRequest {
    pub project_id: ProjectId,
    pub week_number: i32,
    pub update_description: String,
    pub feedback: Option<String>,
}

pub async fn create_progress_update(
    principal: Principal,
    State(state): State<AppState>,
    Json(body): Json<CreateProgressUpdateRequest>,
) -> Result<(StatusCode, Json<ProgressUpdateResponse>), PortalError> {
    let usecase = CreateProgressUpdateUseCase {
        projects: state.project_repo(),
        updates: state.progress_repo(),
    };
    let update = usecase
        .execute(
            &principal,
            NewProgressUpdate {
                project_id: body.project_id,
                week_number: body.week_number,
                description: body.update_description,
                feedback: body.feedback,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(update.into())))
}

// ── PUT /api/progress-updates/{id} ───────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressUpdateRequest {
    pub week_number: Option<i32>,
    pub update_description: Option<String>,
    pub feedback: Option<String>,
}

pub async fn update_progress_update(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<ProgressUpdateId>,
    Json(body): Json<UpdateProgressUpdateRequest>,
) -> Result<Json<ProgressUpdateResponse>, PortalError> {
    let usecase = UpdateProgressUpdateUseCase {
        projects: state.project_repo(),
        updates: state.progress_repo(),
    };
    let update = usecase
        .execute(
            &principal,
            id,
            ProgressUpdateEdit {
                week_number: body.week_number,
                description: body.update_description,
                feedback: body.feedback,
            },
        )
        .await?;
    Ok(Json(update.into()))
}

// ── DELETE /api/progress-updates/{id} ────────────────────────────────────────

pub async fn delete_progress_update(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<ProgressUpdateId>,
) -> Result<StatusCode, PortalError> {
    let usecase = DeleteProgressUpdateUseCase {
        projects: state.project_repo(),
        updates: state.progress_repo(),
    };
    usecase.execute(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Reads ────────────────────────────────────────────────────────────────────

pub async fn get_progress_update(
    State(state): State<AppState>,
    Path(id): Path<ProgressUpdateId>,
) -> Result<Json<ProgressUpdateResponse>, PortalError> {
    let queries = ProgressQueries {
        repo: state.progress_repo(),
    };
    Ok(Json(queries.get(id).await?.into()))
}

pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<ProgressUpdateResponse>>, PortalError> {
    let queries = ProgressQueries {
        repo: state.progress_repo(),
    };
    let updates = queries.by_project(project_id).await?;
    Ok(Json(updates.into_iter().map(Into::into).collect()))
}

pub async fn get_by_project_week(
    State(state): State<AppState>,
    Path((project_id, week_number)): Path<(ProjectId, i32)>,
) -> Result<Json<ProgressUpdateResponse>, PortalError> {
    let queries = ProgressQueries {
        repo: state.progress_repo(),
    };
    Ok(Json(
        queries.by_project_week(project_id, week_number).await?.into(),
    ))
}

pub async fn count_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<u64>, PortalError> {
    let queries = ProgressQueries {
        repo: state.progress_repo(),
    };
    Ok(Json(queries.count(project_id).await?))
}
