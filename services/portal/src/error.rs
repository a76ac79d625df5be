use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use portal_core::error::error_response;
use portal_domain::project::ProjectStatus;

/// Portal service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("authentication required")]
    Unauthorized,
    #[error("access denied")]
    Forbidden,
    #[error("user not found")]
    UserNotFound,
    #[error("project not found")]
    ProjectNotFound,
    #[error("progress update not found")]
    ProgressUpdateNotFound,
    #[error("evaluation not found")]
    EvaluationNotFound,
    #[error("feedback not found")]
    FeedbackNotFound,
    #[error("Username is already taken!")]
    UsernameTaken,
    #[error("Email is already in use!")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Validation(String),
    #[error("cannot change project status from {from} to {to}")]
    InvalidTransition {
        from: ProjectStatus,
        to: ProjectStatus,
    },
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl PortalError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ProjectNotFound => "PROJECT_NOT_FOUND",
            Self::ProgressUpdateNotFound => "PROGRESS_UPDATE_NOT_FOUND",
            Self::EvaluationNotFound => "EVALUATION_NOT_FOUND",
            Self::FeedbackNotFound => "FEEDBACK_NOT_FOUND",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Validation(_) => "VALIDATION",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound
            | Self::ProjectNotFound
            | Self::ProgressUpdateNotFound
            | Self::EvaluationNotFound
            | Self::FeedbackNotFound => StatusCode::NOT_FOUND,
            Self::UsernameTaken
            | Self::EmailTaken
            | Self::InvalidCredentials
            | Self::Validation(_)
            | Self::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        error_response(status, self.kind(), self.to_string())
    }
}
