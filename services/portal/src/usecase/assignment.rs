//! Student ↔ supervisor assignment.
//!
//! `AssignmentManager` is the only writer of a student's supervisor reference and
//! its name snapshot. Both always change in one repository call, so a reader never
//! sees one without the other.

use portal_auth_types::principal::Principal;
use portal_domain::id::UserId;
use portal_domain::user::Role;

use crate::domain::repository::UserRepository;
use crate::domain::types::{SupervisorLink, User};
use crate::error::PortalError;

pub struct AssignmentManager<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> AssignmentManager<R> {
    async fn student(&self, student_id: UserId) -> Result<User, PortalError> {
        self.users
            .find_by_id(student_id)
            .await?
            .ok_or(PortalError::UserNotFound)
    }

    /// Link `student_id` to `supervisor_id`, snapshotting the supervisor's full name.
    pub async fn assign(
        &self,
        student_id: UserId,
        supervisor_id: UserId,
    ) -> Result<User, PortalError> {
        let student = self.student(student_id).await?;
        if student.role != Role::Student {
            return Err(PortalError::validation(format!(
                "User with id {student_id} is not a student"
            )));
        }
        let supervisor = self
            .users
            .find_by_id(supervisor_id)
            .await?
            .ok_or(PortalError::UserNotFound)?;
        if !supervisor.role.is_supervisory() {
            return Err(PortalError::validation(format!(
                "User with id {supervisor_id} is not a supervisor"
            )));
        }

        let link = SupervisorLink::to(&supervisor);
        self.users.set_supervisor(student_id, Some(&link)).await?;
        tracing::info!(
            student_id = %student_id,
            supervisor_id = %supervisor_id,
            "supervisor assigned"
        );
        Ok(User {
            supervisor: Some(link),
            ..student
        })
    }

    /// Clear the student's supervisor. A student without one is a caller error.
    pub async fn unassign(&self, student_id: UserId) -> Result<User, PortalError> {
        let student = self.student(student_id).await?;
        if student.supervisor.is_none() {
            return Err(PortalError::validation(
                "Student is not assigned to any supervisor",
            ));
        }
        self.users.set_supervisor(student_id, None).await?;
        tracing::info!(student_id = %student_id, "supervisor removed");
        Ok(User {
            supervisor: None,
            ..student
        })
    }

    /// Change a user's role without leaving links that the new role cannot hold.
    /// Losing a supervisory role unlinks every student of the user. Leaving STUDENT
    /// drops the user's own supervisor.
    pub async fn change_role(&self, user_id: UserId, role: Role) -> Result<User, PortalError> {
        let updated = self
            .users
            .change_role(user_id, role)
            .await?
            .ok_or(PortalError::UserNotFound)?;
        tracing::info!(user_id = %user_id, role = %role, "role changed");
        Ok(updated)
    }

    /// True iff the student's current supervisor is exactly `supervisor_id`.
    pub async fn can_remove(
        &self,
        supervisor_id: UserId,
        student_id: UserId,
    ) -> Result<bool, PortalError> {
        let student = self.student(student_id).await?;
        Ok(student.supervisor_id() == Some(supervisor_id))
    }

    /// Supervisor self-service removal. Only the supervisor themselves (or an admin
    /// acting on their behalf) may remove one of their own students.
    pub async fn remove_own_student(
        &self,
        actor: &Principal,
        supervisor_id: UserId,
        student_id: UserId,
    ) -> Result<User, PortalError> {
        if actor.role != Role::Admin && actor.user_id != supervisor_id {
            return Err(PortalError::Forbidden);
        }
        if !self.can_remove(supervisor_id, student_id).await? {
            return Err(PortalError::Forbidden);
        }
        self.unassign(student_id).await
    }
}
