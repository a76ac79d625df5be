#![allow(async_fn_in_trait)]

use chrono::NaiveDate;

use portal_domain::id::{EvaluationId, FeedbackId, ProgressUpdateId, ProjectId, UserId};
use portal_domain::project::ProjectStatus;
use portal_domain::user::Role;

use crate::domain::types::{
    Evaluation, Feedback, NewProgressUpdate, NewProject, NewUser, ProgressUpdate,
    ProgressUpdateEdit, Project, ProjectDetails, SupervisorLink, User, UserProfileUpdate,
};
use crate::error::PortalError;

/// Repository for portal accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PortalError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, PortalError>;
    async fn exists_by_username(&self, username: &str) -> Result<bool, PortalError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, PortalError>;
    async fn create(&self, user: &NewUser) -> Result<User, PortalError>;
    async fn list_all(&self) -> Result<Vec<User>, PortalError>;
    async fn list_by_roles(&self, roles: &[Role]) -> Result<Vec<User>, PortalError>;
    async fn list_by_supervisor(&self, supervisor_id: UserId) -> Result<Vec<User>, PortalError>;
    async fn count_by_roles(&self, roles: &[Role]) -> Result<u64, PortalError>;

    /// Apply an admin profile edit. Never touches the role or the supervisor fields.
    async fn update_profile(
        &self,
        id: UserId,
        update: &UserProfileUpdate,
    ) -> Result<User, PortalError>;

    /// Write the supervisor reference and its name snapshot in one statement.
    /// `None` clears both.
    async fn set_supervisor(
        &self,
        student_id: UserId,
        link: Option<&SupervisorLink>,
    ) -> Result<(), PortalError>;

    /// Change a user's role in one transaction, dropping every supervisor link the new
    /// role can no longer hold. A non-supervisory role unlinks the user's students and
    /// clears their faculty reference on projects. A non-student role clears the user's
    /// own supervisor. Returns `None` if the user does not exist.
    async fn change_role(&self, id: UserId, role: Role) -> Result<Option<User>, PortalError>;

    /// Delete a user. Supervised students are unlinked and supervised projects lose
    /// their faculty reference in the same transaction. Returns `true` if a row was deleted.
    async fn delete(&self, id: UserId) -> Result<bool, PortalError>;
}

/// Repository for projects.
pub trait ProjectRepository: Send + Sync {
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, PortalError>;
    async fn list_all(&self) -> Result<Vec<Project>, PortalError>;
    async fn list_by_student(&self, student_id: UserId) -> Result<Vec<Project>, PortalError>;
    async fn list_by_faculty(&self, faculty_id: UserId) -> Result<Vec<Project>, PortalError>;
    async fn list_by_status(&self, status: ProjectStatus) -> Result<Vec<Project>, PortalError>;
    /// Projects owned by students whose current supervisor is `supervisor_id`.
    async fn list_by_supervised_students(
        &self,
        supervisor_id: UserId,
    ) -> Result<Vec<Project>, PortalError>;
    async fn list_without_faculty(&self) -> Result<Vec<Project>, PortalError>;
    async fn count(&self) -> Result<u64, PortalError>;
    async fn count_by_status(&self, status: ProjectStatus) -> Result<u64, PortalError>;

    async fn create(&self, project: &NewProject) -> Result<Project, PortalError>;
    /// Overwrite the descriptive fields present in `details`. Status is not touched.
    async fn update_details(
        &self,
        id: ProjectId,
        details: &ProjectDetails,
    ) -> Result<Project, PortalError>;
    async fn set_status(&self, id: ProjectId, status: ProjectStatus) -> Result<(), PortalError>;
    async fn set_faculty(&self, id: ProjectId, faculty_id: UserId) -> Result<(), PortalError>;
    async fn set_end_date(&self, id: ProjectId, end_date: NaiveDate) -> Result<(), PortalError>;

    /// Delete a project with its progress updates, evaluations and feedback in one
    /// transaction. Returns `true` if the project existed.
    async fn delete(&self, id: ProjectId) -> Result<bool, PortalError>;
}

/// Repository for weekly progress updates.
pub trait ProgressUpdateRepository: Send + Sync {
    async fn find_by_id(&self, id: ProgressUpdateId) -> Result<Option<ProgressUpdate>, PortalError>;
    /// Ordered by week number ascending.
    async fn list_by_project(&self, project_id: ProjectId)
    -> Result<Vec<ProgressUpdate>, PortalError>;
    async fn find_by_project_week(
        &self,
        project_id: ProjectId,
        week_number: i32,
    ) -> Result<Option<ProgressUpdate>, PortalError>;
    async fn count_by_project(&self, project_id: ProjectId) -> Result<u64, PortalError>;

    /// Insert the update and, when `advance_to` is set, move the project to that
    /// status in the same transaction.
    async fn create_with_status(
        &self,
        update: &NewProgressUpdate,
        advance_to: Option<ProjectStatus>,
    ) -> Result<ProgressUpdate, PortalError>;
    async fn update(
        &self,
        id: ProgressUpdateId,
        edit: &ProgressUpdateEdit,
    ) -> Result<ProgressUpdate, PortalError>;
    async fn delete(&self, id: ProgressUpdateId) -> Result<bool, PortalError>;
}

/// Repository for final evaluations.
pub trait EvaluationRepository: Send + Sync {
    async fn find_by_id(&self, id: EvaluationId) -> Result<Option<Evaluation>, PortalError>;
    /// Newest first.
    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<Evaluation>, PortalError>;
    async fn average_score(&self, project_id: ProjectId) -> Result<Option<f64>, PortalError>;
    async fn create(
        &self,
        project_id: ProjectId,
        final_score: i32,
        comment: &str,
    ) -> Result<Evaluation, PortalError>;
    async fn update(
        &self,
        id: EvaluationId,
        final_score: i32,
        comment: &str,
    ) -> Result<Evaluation, PortalError>;
    async fn delete(&self, id: EvaluationId) -> Result<bool, PortalError>;
}

/// Repository for supervisor feedback.
pub trait FeedbackRepository: Send + Sync {
    async fn find_by_id(&self, id: FeedbackId) -> Result<Option<Feedback>, PortalError>;
    async fn list_all(&self) -> Result<Vec<Feedback>, PortalError>;
    async fn list_by_project(&self, project_id: ProjectId) -> Result<Vec<Feedback>, PortalError>;
    async fn list_by_faculty(&self, faculty_id: UserId) -> Result<Vec<Feedback>, PortalError>;
    /// Feedback on every project owned by `student_id`.
    async fn list_by_student(&self, student_id: UserId) -> Result<Vec<Feedback>, PortalError>;
    async fn create(
        &self,
        project_id: ProjectId,
        faculty_id: UserId,
        comment: &str,
        rating: i32,
    ) -> Result<Feedback, PortalError>;
    async fn update(
        &self,
        id: FeedbackId,
        comment: &str,
        rating: i32,
    ) -> Result<Feedback, PortalError>;
    async fn delete(&self, id: FeedbackId) -> Result<bool, PortalError>;
}
