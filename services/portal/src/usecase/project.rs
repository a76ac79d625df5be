use chrono::NaiveDate;

use portal_auth_types::principal::Principal;
use portal_domain::id::{ProjectId, UserId};
use portal_domain::project::ProjectStatus;
use portal_domain::user::Role;

use crate::domain::repository::{
    EvaluationRepository, ProgressUpdateRepository, ProjectRepository, UserRepository,
};
use crate::domain::types::{
    DashboardStats, NewProject, Project, ProjectDetails, ProjectProgressSummary,
    SUPERVISORY_ROLES, validate_percentage,
};
use crate::error::PortalError;

fn validate_details(details: &ProjectDetails) -> Result<(), PortalError> {
    if let Some(progress) = details.progress {
        validate_percentage("Progress", progress).map_err(PortalError::Validation)?;
    }
    if let Some(ref title) = details.title {
        if title.trim().is_empty() {
            return Err(PortalError::validation("Title must not be blank"));
        }
    }
    Ok(())
}

// ── Queries ──────────────────────────────────────────────────────────────────

pub struct ProjectQueries<R: ProjectRepository> {
    pub repo: R,
}

impl<R: ProjectRepository> ProjectQueries<R> {
    pub async fn get(&self, id: ProjectId) -> Result<Project, PortalError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(PortalError::ProjectNotFound)
    }

    pub async fn list_all(&self) -> Result<Vec<Project>, PortalError> {
        self.repo.list_all().await
    }

    pub async fn by_student(&self, student_id: UserId) -> Result<Vec<Project>, PortalError> {
        self.repo.list_by_student(student_id).await
    }

    pub async fn by_faculty(&self, faculty_id: UserId) -> Result<Vec<Project>, PortalError> {
        self.repo.list_by_faculty(faculty_id).await
    }

    pub async fn by_status(&self, status: ProjectStatus) -> Result<Vec<Project>, PortalError> {
        self.repo.list_by_status(status).await
    }

    pub async fn of_supervised_students(
        &self,
        supervisor_id: UserId,
    ) -> Result<Vec<Project>, PortalError> {
        self.repo.list_by_supervised_students(supervisor_id).await
    }
}

// ── SubmitProject ────────────────────────────────────────────────────────────

pub struct SubmitProjectInput {
    pub title: String,
    pub details: ProjectDetails,
    pub faculty_id: Option<UserId>,
}

pub struct SubmitProjectUseCase<U: UserRepository, P: ProjectRepository> {
    pub users: U,
    pub projects: P,
}

impl<U: UserRepository, P: ProjectRepository> SubmitProjectUseCase<U, P> {
    /// Create a PENDING project owned by `student`. Without an explicit faculty the
    /// student's current supervisor is used.
    pub async fn execute(
        &self,
        student: &Principal,
        input: SubmitProjectInput,
    ) -> Result<Project, PortalError> {
        if student.role != Role::Student {
            return Err(PortalError::Forbidden);
        }
        if input.title.trim().is_empty() {
            return Err(PortalError::validation("Title must not be blank"));
        }
        validate_details(&input.details)?;

        let faculty_id = match input.faculty_id {
            Some(id) => {
                let faculty = self
                    .users
                    .find_by_id(id)
                    .await?
                    .ok_or(PortalError::UserNotFound)?;
                if !faculty.role.is_supervisory() {
                    return Err(PortalError::validation(format!(
                        "User with id {id} is not a supervisor"
                    )));
                }
                Some(id)
            }
            None => self
                .users
                .find_by_id(student.user_id)
                .await?
                .ok_or(PortalError::UserNotFound)?
                .supervisor_id(),
        };

        let project = self
            .projects
            .create(&NewProject {
                title: input.title,
                details: input.details,
                student_id: student.user_id,
                faculty_id,
            })
            .await?;
        tracing::info!(
            project_id = %project.id,
            student_id = %student.user_id,
            "project submitted"
        );
        Ok(project)
    }
}

// ── UpdateProject ────────────────────────────────────────────────────────────

pub struct UpdateProjectUseCase<R: ProjectRepository> {
    pub repo: R,
}

impl<R: ProjectRepository> UpdateProjectUseCase<R> {
    /// Edit descriptive fields and progress. Status changes go through `ProjectLifecycle`.
    pub async fn execute(
        &self,
        actor: &Principal,
        id: ProjectId,
        details: ProjectDetails,
    ) -> Result<Project, PortalError> {
        if !actor.role.is_staff() {
            return Err(PortalError::Forbidden);
        }
        validate_details(&details)?;
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(PortalError::ProjectNotFound);
        }
        self.repo.update_details(id, &details).await
    }
}

// ── DeleteProject ────────────────────────────────────────────────────────────

pub struct DeleteProjectUseCase<R: ProjectRepository> {
    pub repo: R,
}

impl<R: ProjectRepository> DeleteProjectUseCase<R> {
    pub async fn execute(&self, actor: &Principal, id: ProjectId) -> Result<(), PortalError> {
        if actor.role != Role::Admin {
            return Err(PortalError::Forbidden);
        }
        if !self.repo.delete(id).await? {
            return Err(PortalError::ProjectNotFound);
        }
        tracing::info!(project_id = %id, "project deleted");
        Ok(())
    }
}

// ── AssignProjectsToSupervisors ──────────────────────────────────────────────

pub struct AssignProjectsToSupervisorsUseCase<U: UserRepository, P: ProjectRepository> {
    pub users: U,
    pub projects: P,
}

impl<U: UserRepository, P: ProjectRepository> AssignProjectsToSupervisorsUseCase<U, P> {
    /// Fill in `faculty` on projects that have none from their student's current
    /// supervisor. Returns how many projects changed.
    pub async fn execute(&self) -> Result<u64, PortalError> {
        let mut updated = 0;
        for project in self.projects.list_without_faculty().await? {
            let supervisor = self
                .users
                .find_by_id(project.student_id)
                .await?
                .and_then(|s| s.supervisor_id());
            if let Some(supervisor_id) = supervisor {
                self.projects.set_faculty(project.id, supervisor_id).await?;
                updated += 1;
            }
        }
        tracing::info!(updated, "projects assigned to supervisors");
        Ok(updated)
    }
}

// ── SetDeadline ──────────────────────────────────────────────────────────────

pub struct SetDeadlineUseCase<R: ProjectRepository> {
    pub repo: R,
}

impl<R: ProjectRepository> SetDeadlineUseCase<R> {
    pub async fn execute(&self, id: ProjectId, end_date: NaiveDate) -> Result<Project, PortalError> {
        let project = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(PortalError::ProjectNotFound)?;
        self.repo.set_end_date(id, end_date).await?;
        Ok(Project {
            end_date: Some(end_date),
            ..project
        })
    }
}

// ── Dashboard ────────────────────────────────────────────────────────────────

pub struct DashboardStatsUseCase<U: UserRepository, P: ProjectRepository> {
    pub users: U,
    pub projects: P,
}

impl<U: UserRepository, P: ProjectRepository> DashboardStatsUseCase<U, P> {
    pub async fn execute(&self) -> Result<DashboardStats, PortalError> {
        let total_projects = self.projects.count().await?;
        let completed_projects = self.projects.count_by_status(ProjectStatus::Completed).await?;
        let completion_rate = if total_projects == 0 {
            0.0
        } else {
            completed_projects as f64 * 100.0 / total_projects as f64
        };
        Ok(DashboardStats {
            total_students: self.users.count_by_roles(&[Role::Student]).await?,
            total_supervisors: self.users.count_by_roles(&SUPERVISORY_ROLES).await?,
            total_projects,
            pending_projects: self.projects.count_by_status(ProjectStatus::Pending).await?,
            completed_projects,
            completion_rate,
        })
    }
}

pub struct ProjectProgressUseCase<P, G, E>
where
    P: ProjectRepository,
    G: ProgressUpdateRepository,
    E: EvaluationRepository,
{
    pub projects: P,
    pub updates: G,
    pub evaluations: E,
}

impl<P, G, E> ProjectProgressUseCase<P, G, E>
where
    P: ProjectRepository,
    G: ProgressUpdateRepository,
    E: EvaluationRepository,
{
    pub async fn execute(&self, id: ProjectId) -> Result<ProjectProgressSummary, PortalError> {
        let project = self
            .projects
            .find_by_id(id)
            .await?
            .ok_or(PortalError::ProjectNotFound)?;
        Ok(ProjectProgressSummary {
            project_id: id,
            progress: project.progress,
            status: project.status,
            progress_update_count: self.updates.count_by_project(id).await?,
            average_score: self.evaluations.average_score(id).await?.unwrap_or(0.0),
        })
    }
}
