use portal_auth_types::principal::Principal;
use portal_domain::id::{FeedbackId, ProjectId, UserId};

use crate::domain::repository::{FeedbackRepository, ProjectRepository};
use crate::domain::types::{Feedback, validate_rating};
use crate::error::PortalError;

fn average_rating(feedback: &[Feedback]) -> f64 {
    if feedback.is_empty() {
        return 0.0;
    }
    let sum: i64 = feedback.iter().map(|f| i64::from(f.rating)).sum();
    sum as f64 / feedback.len() as f64
}

// ── Queries ──────────────────────────────────────────────────────────────────

pub struct FeedbackQueries<F: FeedbackRepository> {
    pub repo: F,
}

impl<F: FeedbackRepository> FeedbackQueries<F> {
    pub async fn get(&self, id: FeedbackId) -> Result<Feedback, PortalError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(PortalError::FeedbackNotFound)
    }

    pub async fn list_all(&self) -> Result<Vec<Feedback>, PortalError> {
        self.repo.list_all().await
    }

    pub async fn by_project(&self, project_id: ProjectId) -> Result<Vec<Feedback>, PortalError> {
        self.repo.list_by_project(project_id).await
    }

    pub async fn by_faculty(&self, faculty_id: UserId) -> Result<Vec<Feedback>, PortalError> {
        self.repo.list_by_faculty(faculty_id).await
    }

    pub async fn by_student(&self, student_id: UserId) -> Result<Vec<Feedback>, PortalError> {
        self.repo.list_by_student(student_id).await
    }

    pub async fn average_for_project(&self, project_id: ProjectId) -> Result<f64, PortalError> {
        Ok(average_rating(&self.repo.list_by_project(project_id).await?))
    }

    pub async fn average_for_student(&self, student_id: UserId) -> Result<f64, PortalError> {
        Ok(average_rating(&self.repo.list_by_student(student_id).await?))
    }
}

// ── CreateFeedback ───────────────────────────────────────────────────────────

pub struct CreateFeedbackUseCase<P: ProjectRepository, F: FeedbackRepository> {
    pub projects: P,
    pub feedback: F,
}

impl<P: ProjectRepository, F: FeedbackRepository> CreateFeedbackUseCase<P, F> {
    /// The author is always the calling principal.
    pub async fn execute(
        &self,
        actor: &Principal,
        project_id: ProjectId,
        comment: &str,
        rating: i32,
    ) -> Result<Feedback, PortalError> {
        if !actor.role.is_staff() {
            return Err(PortalError::Forbidden);
        }
        validate_rating(rating).map_err(PortalError::Validation)?;
        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(PortalError::ProjectNotFound);
        }
        self.feedback
            .create(project_id, actor.user_id, comment, rating)
            .await
    }
}

// ── UpdateFeedback / DeleteFeedback ──────────────────────────────────────────

pub struct UpdateFeedbackUseCase<F: FeedbackRepository> {
    pub repo: F,
}

impl<F: FeedbackRepository> UpdateFeedbackUseCase<F> {
    pub async fn execute(
        &self,
        id: FeedbackId,
        comment: &str,
        rating: i32,
    ) -> Result<Feedback, PortalError> {
        validate_rating(rating).map_err(PortalError::Validation)?;
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(PortalError::FeedbackNotFound);
        }
        self.repo.update(id, comment, rating).await
    }
}

pub struct DeleteFeedbackUseCase<F: FeedbackRepository> {
    pub repo: F,
}

impl<F: FeedbackRepository> DeleteFeedbackUseCase<F> {
    pub async fn execute(&self, id: FeedbackId) -> Result<(), PortalError> {
        if !self.repo.delete(id).await? {
            return Err(PortalError::FeedbackNotFound);
        }
        Ok(())
    }
}
