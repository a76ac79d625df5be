use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use portal_auth_types::principal::Principal;
use portal_domain::id::{EvaluationId, ProjectId};

use crate::domain::types::Evaluation;
use crate::error::PortalError;
use crate::state::AppState;
use crate::usecase::evaluation::{
    CreateEvaluationUseCase, DeleteEvaluationUseCase, EvaluationQueries, UpdateEvaluationUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResponse {
    pub id: EvaluationId,
    pub project_id: ProjectId,
    pub final_score: i32,
    pub final_comment: String,
    #[serde(serialize_with = "portal_core::serde::to_rfc3339_ms")]
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl From<Evaluation> for EvaluationResponse {
    fn from(e: Evaluation) -> Self {
        Self {
            id: e.id,
            project_id: e.project_id,
            final_score: e.final_score,
            final_comment: e.comment,
            timestamp: e.created_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub project_id: ProjectId,
    pub final_score: i32,
    #[serde(default)]
    pub final_comment: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvaluationRequest {
    pub final_score: i32,
    #[serde(default)]
    pub final_comment: String,
}

pub async fn create_evaluation(
    principal: Principal,
    State(state): State<AppState>,
    Json(body): Json<EvaluationRequest>,
) -> Result<(StatusCode, Json<EvaluationResponse>), PortalError> {
    let usecase = CreateEvaluationUseCase {
        projects: state.project_repo(),
        evaluations: state.evaluation_repo(),
    };
    let evaluation = usecase
        .execute(&principal, body.project_id, body.final_score, &body.final_comment)
        .await?;
    Ok((StatusCode::CREATED, Json(evaluation.into())))
}

pub async fn update_evaluation(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<EvaluationId>,
    Json(body): Json<UpdateEvaluationRequest>,
) -> Result<Json<EvaluationResponse>, PortalError> {
    let usecase = UpdateEvaluationUseCase {
        repo: state.evaluation_repo(),
    };
    let evaluation = usecase
        .execute(&principal, id, body.final_score, &body.final_comment)
        .await?;
    Ok(Json(evaluation.into()))
}

pub async fn delete_evaluation(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<EvaluationId>,
) -> Result<StatusCode, PortalError> {
    let usecase = DeleteEvaluationUseCase {
        repo: state.evaluation_repo(),
    };
    usecase.execute(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_evaluation(
    State(state): State<AppState>,
    Path(id): Path<EvaluationId>,
) -> Result<Json<EvaluationResponse>, PortalError> {
    let queries = EvaluationQueries {
        repo: state.evaluation_repo(),
    };
    Ok(Json(queries.get(id).await?.into()))
}

pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<EvaluationResponse>>, PortalError> {
    let queries = EvaluationQueries {
        repo: state.evaluation_repo(),
    };
    let evaluations = queries.by_project(project_id).await?;
    Ok(Json(evaluations.into_iter().map(Into::into).collect()))
}

pub async fn latest_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<EvaluationResponse>, PortalError> {
    let queries = EvaluationQueries {
        repo: state.evaluation_repo(),
    };
    Ok(Json(queries.latest(project_id).await?.into()))
}

pub async fn average_score(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<f64>, PortalError> {
    let queries = EvaluationQueries {
        repo: state.evaluation_repo(),
    };
    Ok(Json(queries.average_score(project_id).await?))
}

pub async fn exists_for_project(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<bool>, PortalError> {
    let queries = EvaluationQueries {
        repo: state.evaluation_repo(),
    };
    Ok(Json(queries.exists(project_id).await?))
}
