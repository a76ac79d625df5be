//! Project status state machine.
//!
//! | From | To |
//! |------|----|
//! | PENDING | APPROVED, REJECTED, COMPLETED |
//! | APPROVED | IN_PROGRESS, COMPLETED |
//! | IN_PROGRESS | COMPLETED |
//!
//! REJECTED and COMPLETED are terminal. Every explicit transition needs a staff
//! principal (ADMIN or a supervisory role). The APPROVED → IN_PROGRESS step also
//! happens implicitly when the first progress update is accepted.

use portal_auth_types::principal::Principal;
use portal_domain::id::ProjectId;
use portal_domain::project::ProjectStatus;
use portal_domain::user::Role;

use crate::domain::repository::ProjectRepository;
use crate::domain::types::Project;
use crate::error::PortalError;

/// Whether `to` is reachable from `from` in a single step.
pub fn is_allowed(from: ProjectStatus, to: ProjectStatus) -> bool {
    use ProjectStatus::*;
    matches!(
        (from, to),
        (Pending, Approved)
            | (Pending, Rejected)
            | (Approved, InProgress)
            | (Pending | Approved | InProgress, Completed)
    )
}

/// Check that `actor` may move a project from `from` to `to`.
pub fn check_transition(
    actor: Role,
    from: ProjectStatus,
    to: ProjectStatus,
) -> Result<(), PortalError> {
    if !actor.is_staff() {
        return Err(PortalError::Forbidden);
    }
    if !is_allowed(from, to) {
        return Err(PortalError::InvalidTransition { from, to });
    }
    Ok(())
}

/// Precondition for accepting a progress update against a project in `status`.
///
/// Returns the status the project moves to as a side effect of the update, if any.
pub fn ensure_accepts_progress(status: ProjectStatus) -> Result<Option<ProjectStatus>, PortalError> {
    match status {
        ProjectStatus::Approved => Ok(Some(ProjectStatus::InProgress)),
        ProjectStatus::InProgress => Ok(None),
        other => Err(PortalError::validation(format!(
            "Progress updates are only accepted for APPROVED or IN_PROGRESS projects (project is {other})"
        ))),
    }
}

pub struct ProjectLifecycle<R: ProjectRepository> {
    pub repo: R,
}

impl<R: ProjectRepository> ProjectLifecycle<R> {
    pub async fn transition(
        &self,
        actor: &Principal,
        project_id: ProjectId,
        to: ProjectStatus,
    ) -> Result<Project, PortalError> {
        let project = self
            .repo
            .find_by_id(project_id)
            .await?
            .ok_or(PortalError::ProjectNotFound)?;
        check_transition(actor.role, project.status, to)?;
        self.repo.set_status(project_id, to).await?;
        tracing::info!(
            project_id = %project_id,
            from = %project.status,
            to = %to,
            actor = %actor.username,
            "project status changed"
        );
        Ok(Project {
            status: to,
            ..project
        })
    }

    pub async fn approve(&self, actor: &Principal, id: ProjectId) -> Result<Project, PortalError> {
        self.transition(actor, id, ProjectStatus::Approved).await
    }

    pub async fn reject(&self, actor: &Principal, id: ProjectId) -> Result<Project, PortalError> {
        self.transition(actor, id, ProjectStatus::Rejected).await
    }

    pub async fn complete(&self, actor: &Principal, id: ProjectId) -> Result<Project, PortalError> {
        self.transition(actor, id, ProjectStatus::Completed).await
    }
}
