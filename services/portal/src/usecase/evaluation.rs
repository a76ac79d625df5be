use portal_auth_types::principal::Principal;
use portal_domain::id::{EvaluationId, ProjectId};

use crate::domain::repository::{EvaluationRepository, ProjectRepository};
use crate::domain::types::{Evaluation, validate_percentage};
use crate::error::PortalError;

fn ensure_staff(actor: &Principal) -> Result<(), PortalError> {
    if !actor.role.is_staff() {
        return Err(PortalError::Forbidden);
    }
    Ok(())
}

fn validate_score(score: i32) -> Result<(), PortalError> {
    validate_percentage("Final score", score).map_err(PortalError::Validation)
}

// ── Queries ──────────────────────────────────────────────────────────────────

pub struct EvaluationQueries<E: EvaluationRepository> {
    pub repo: E,
}

impl<E: EvaluationRepository> EvaluationQueries<E> {
    pub async fn get(&self, id: EvaluationId) -> Result<Evaluation, PortalError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(PortalError::EvaluationNotFound)
    }

    pub async fn by_project(&self, project_id: ProjectId) -> Result<Vec<Evaluation>, PortalError> {
        self.repo.list_by_project(project_id).await
    }

    /// Most recent evaluation; ties on timestamp go to the higher id.
    pub async fn latest(&self, project_id: ProjectId) -> Result<Evaluation, PortalError> {
        self.repo
            .list_by_project(project_id)
            .await?
            .into_iter()
            .next()
            .ok_or(PortalError::EvaluationNotFound)
    }

    pub async fn average_score(&self, project_id: ProjectId) -> Result<f64, PortalError> {
        Ok(self.repo.average_score(project_id).await?.unwrap_or(0.0))
    }

    pub async fn exists(&self, project_id: ProjectId) -> Result<bool, PortalError> {
        Ok(!self.repo.list_by_project(project_id).await?.is_empty())
    }
}

// ── CreateEvaluation ─────────────────────────────────────────────────────────

pub struct CreateEvaluationUseCase<P: ProjectRepository, E: EvaluationRepository> {
    pub projects: P,
    pub evaluations: E,
}

impl<P: ProjectRepository, E: EvaluationRepository> CreateEvaluationUseCase<P, E> {
    pub async fn execute(
        &self,
        actor: &Principal,
        project_id: ProjectId,
        final_score: i32,
        comment: &str,
    ) -> Result<Evaluation, PortalError> {
        ensure_staff(actor)?;
        validate_score(final_score)?;
        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(PortalError::ProjectNotFound);
        }
        let evaluation = self
            .evaluations
            .create(project_id, final_score, comment)
            .await?;
        tracing::info!(
            evaluation_id = %evaluation.id,
            project_id = %project_id,
            evaluator = %actor.username,
            "project evaluated"
        );
        Ok(evaluation)
    }
}

// ── UpdateEvaluation ─────────────────────────────────────────────────────────

pub struct UpdateEvaluationUseCase<E: EvaluationRepository> {
    pub repo: E,
}

impl<E: EvaluationRepository> UpdateEvaluationUseCase<E> {
    pub async fn execute(
        &self,
        actor: &Principal,
        id: EvaluationId,
        final_score: i32,
        comment: &str,
    ) -> Result<Evaluation, PortalError> {
        ensure_staff(actor)?;
        validate_score(final_score)?;
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(PortalError::EvaluationNotFound);
        }
        self.repo.update(id, final_score, comment).await
    }
}

// ── DeleteEvaluation ─────────────────────────────────────────────────────────

pub struct DeleteEvaluationUseCase<E: EvaluationRepository> {
    pub repo: E,
}

impl<E: EvaluationRepository> DeleteEvaluationUseCase<E> {
    pub async fn execute(&self, actor: &Principal, id: EvaluationId) -> Result<(), PortalError> {
        ensure_staff(actor)?;
        if !self.repo.delete(id).await? {
            return Err(PortalError::EvaluationNotFound);
        }
        Ok(())
    }
}
