use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use portal_auth_types::principal::Principal;
use portal_domain::id::{FeedbackId, ProjectId, UserId};

use crate::domain::types::Feedback;
use crate::error::PortalError;
use crate::state::AppState;
use crate::usecase::feedback::{
    CreateFeedbackUseCase, DeleteFeedbackUseCase, FeedbackQueries, UpdateFeedbackUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: FeedbackId,
    pub project_id: ProjectId,
    pub faculty_id: Option<UserId>,
    pub comment: String,
    pub rating: i32,
    #[serde(serialize_with = "portal_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Feedback> for FeedbackResponse {
    fn from(f: Feedback) -> Self {
        Self {
            id: f.id,
            project_id: f.project_id,
            faculty_id: f.faculty_id,
            comment: f.comment,
            rating: f.rating,
            created_at: f.created_at,
        }
    }
}

fn feedback_list(items: Vec<Feedback>) -> Json<Vec<FeedbackResponse>> {
    Json(items.into_iter().map(FeedbackResponse::from).collect())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    pub project_id: ProjectId,
    pub comment: String,
    pub rating: i32,
}

#[derive(Deserialize)]
pub struct UpdateFeedbackRequest {
    pub comment: String,
    pub rating: i32,
}

pub async fn create_feedback(
    principal: Principal,
    State(state): State<AppState>,
    Json(body): Json<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackResponse>), PortalError> {
    let usecase = CreateFeedbackUseCase {
        projects: state.project_repo(),
        feedback: state.feedback_repo(),
    };
    let feedback = usecase
        .execute(&principal, body.project_id, &body.comment, body.rating)
        .await?;
    Ok((StatusCode::CREATED, Json(feedback.into())))
}

pub async fn update_feedback(
    State(state): State<AppState>,
    Path(id): Path<FeedbackId>,
    Json(body): Json<UpdateFeedbackRequest>,
) -> Result<Json<FeedbackResponse>, PortalError> {
    let usecase = UpdateFeedbackUseCase {
        repo: state.feedback_repo(),
    };
    Ok(Json(usecase.execute(id, &body.comment, body.rating).await?.into()))
}

pub async fn delete_feedback(
    State(state): State<AppState>,
    Path(id): Path<FeedbackId>,
) -> Result<StatusCode, PortalError> {
    let usecase = DeleteFeedbackUseCase {
        repo: state.feedback_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_feedback(
    State(state): State<AppState>,
) -> Result<Json<Vec<FeedbackResponse>>, PortalError> {
    let queries = FeedbackQueries {
        repo: state.feedback_repo(),
    };
    Ok(feedback_list(queries.list_all().await?))
}

pub async fn get_feedback(
    State(state): State<AppState>,
    Path(id): Path<FeedbackId>,
) -> Result<Json<FeedbackResponse>, PortalError> {
    let queries = FeedbackQueries {
        repo: state.feedback_repo(),
    };
    Ok(Json(queries.get(id).await?.into()))
}

pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<FeedbackResponse>>, PortalError> {
    let queries = FeedbackQueries {
        repo: state.feedback_repo(),
    };
    Ok(feedback_list(queries.by_project(project_id).await?))
}

pub async fn list_by_faculty(
    State(state): State<AppState>,
    Path(faculty_id): Path<UserId>,
) -> Result<Json<Vec<FeedbackResponse>>, PortalError> {
    let queries = FeedbackQueries {
        repo: state.feedback_repo(),
    };
    Ok(feedback_list(queries.by_faculty(faculty_id).await?))
}

pub async fn list_by_student(
    State(state): State<AppState>,
    Path(student_id): Path<UserId>,
) -> Result<Json<Vec<FeedbackResponse>>, PortalError> {
    let queries = FeedbackQueries {
        repo: state.feedback_repo(),
    };
    Ok(feedback_list(queries.by_student(student_id).await?))
}

pub async fn average_for_project(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<f64>, PortalError> {
    let queries = FeedbackQueries {
        repo: state.feedback_repo(),
    };
    Ok(Json(queries.average_for_project(project_id).await?))
}

pub async fn average_for_student(
    State(state): State<AppState>,
    Path(student_id): Path<UserId>,
) -> Result<Json<f64>, PortalError> {
    let queries = FeedbackQueries {
        repo: state.feedback_repo(),
    };
    Ok(Json(queries.average_for_student(student_id).await?))
}
