use portal_auth_types::principal::Principal;
use portal_domain::id::{ProgressUpdateId, ProjectId};
use portal_domain::user::Role;

use crate::domain::repository::{ProgressUpdateRepository, ProjectRepository};
use crate::domain::types::{
    NewProgressUpdate, ProgressUpdate, ProgressUpdateEdit, Project, validate_week_number,
};
use crate::error::PortalError;
use crate::usecase::lifecycle::ensure_accepts_progress;

/// Progress updates are written only by the student who owns the project.
fn ensure_owner(actor: &Principal, project: &Project) -> Result<(), PortalError> {
    if actor.role != Role::Student || project.student_id != actor.user_id {
        return Err(PortalError::Forbidden);
    }
    Ok(())
}

fn duplicate_week(week_number: i32) -> PortalError {
    PortalError::validation(format!(
        "Progress update for week {week_number} already exists for this project"
    ))
}

async fn load_project<P: ProjectRepository>(
    projects: &P,
    id: ProjectId,
) -> Result<Project, PortalError> {
    projects
        .find_by_id(id)
        .await?
        .ok_or(PortalError::ProjectNotFound)
}

// ── Queries ──────────────────────────────────────────────────────────────────

pub struct ProgressQueries<G: ProgressUpdateRepository> {
    pub repo: G,
}

impl<G: ProgressUpdateRepository> ProgressQueries<G> {
    pub async fn get(&self, id: ProgressUpdateId) -> Result<ProgressUpdate, PortalError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(PortalError::ProgressUpdateNotFound)
    }

    pub async fn by_project(&self, project_id: ProjectId) -> Result<Vec<ProgressUpdate>, PortalError> {
        self.repo.list_by_project(project_id).await
    }

    pub async fn by_project_week(
        &self,
        project_id: ProjectId,
        week_number: i32,
    ) -> Result<ProgressUpdate, PortalError> {
        self.repo
            .find_by_project_week(project_id, week_number)
            .await?
            .ok_or(PortalError::ProgressUpdateNotFound)
    }

    pub async fn count(&self, project_id: ProjectId) -> Result<u64, PortalError> {
        self.repo.count_by_project(project_id).await
    }
}

// ── CreateProgressUpdate ─────────────────────────────────────────────────────

pub struct CreateProgressUpdateUseCase<P: ProjectRepository, G: ProgressUpdateRepository> {
    pub projects: P,
    pub updates: G,
}

impl<P: ProjectRepository, G: ProgressUpdateRepository> CreateProgressUpdateUseCase<P, G> {
    pub async fn execute(
        &self,
        actor: &Principal,
        input: NewProgressUpdate,
    ) -> Result<ProgressUpdate, PortalError> {
        let project = load_project(&self.projects, input.project_id).await?;
        ensure_owner(actor, &project)?;
        validate_week_number(input.week_number).map_err(PortalError::Validation)?;
        if input.description.trim().is_empty() {
            return Err(PortalError::validation("Description must not be blank"));
        }
        let advance_to = ensure_accepts_progress(project.status)?;
        if self
            .updates
            .find_by_project_week(project.id, input.week_number)
            .await?
            .is_some()
        {
            return Err(duplicate_week(input.week_number));
        }

        let created = self.updates.create_with_status(&input, advance_to).await?;
        if let Some(status) = advance_to {
            tracing::info!(
                project_id = %project.id,
                from = %project.status,
                to = %status,
                "project status advanced by first progress update"
            );
        }
        Ok(created)
    }
}

// ── UpdateProgressUpdate ─────────────────────────────────────────────────────

pub struct UpdateProgressUpdateUseCase<P: ProjectRepository, G: ProgressUpdateRepository> {
    pub projects: P,
    pub updates: G,
}

impl<P: ProjectRepository, G: ProgressUpdateRepository> UpdateProgressUpdateUseCase<P, G> {
    pub async fn execute(
        &self,
        actor: &Principal,
        id: ProgressUpdateId,
        edit: ProgressUpdateEdit,
    ) -> Result<ProgressUpdate, PortalError> {
        let current = self
            .updates
            .find_by_id(id)
            .await?
            .ok_or(PortalError::ProgressUpdateNotFound)?;
        let project = load_project(&self.projects, current.project_id).await?;
        ensure_owner(actor, &project)?;

        if let Some(week) = edit.week_number {
            validate_week_number(week).map_err(PortalError::Validation)?;
            let clash = self
                .updates
                .find_by_project_week(current.project_id, week)
                .await?;
            if clash.is_some_and(|other| other.id != id) {
                return Err(duplicate_week(week));
            }
        }
        self.updates.update(id, &edit).await
    }
}

// ── DeleteProgressUpdate ─────────────────────────────────────────────────────

pub struct DeleteProgressUpdateUseCase<P: ProjectRepository, G: ProgressUpdateRepository> {
    pub projects: P,
    pub updates: G,
}

impl<P: ProjectRepository, G: ProgressUpdateRepository> DeleteProgressUpdateUseCase<P, G> {
    pub async fn execute(&self, actor: &Principal, id: ProgressUpdateId) -> Result<(), PortalError> {
        let current = self
            .updates
            .find_by_id(id)
            .await?
            .ok_or(PortalError::ProgressUpdateNotFound)?;
        let project = load_project(&self.projects, current.project_id).await?;
        ensure_owner(actor, &project)?;
        self.updates.delete(id).await?;
        Ok(())
    }
}
