use portal_domain::id::UserId;
use portal_domain::user::Role;

use crate::domain::repository::UserRepository;
use crate::domain::types::{SUPERVISORY_ROLES, User, UserProfileUpdate};
use crate::error::PortalError;
use crate::usecase::assignment::AssignmentManager;
use crate::usecase::auth::{NewAccountInput, create_account};

// ── Queries ──────────────────────────────────────────────────────────────────

pub struct UserDirectory<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UserDirectory<R> {
    pub async fn get(&self, id: UserId) -> Result<User, PortalError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(PortalError::UserNotFound)
    }

    pub async fn by_username(&self, username: &str) -> Result<User, PortalError> {
        self.repo
            .find_by_username(username)
            .await?
            .ok_or(PortalError::UserNotFound)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, PortalError> {
        self.repo.list_all().await
    }

    pub async fn by_role(&self, role: Role) -> Result<Vec<User>, PortalError> {
        self.repo.list_by_roles(&[role]).await
    }

    /// SUPERVISOR and FACULTY accounts together.
    pub async fn supervisors(&self) -> Result<Vec<User>, PortalError> {
        self.repo.list_by_roles(&SUPERVISORY_ROLES).await
    }

    pub async fn students(&self) -> Result<Vec<User>, PortalError> {
        self.repo.list_by_roles(&[Role::Student]).await
    }

    pub async fn students_of(&self, supervisor_id: UserId) -> Result<Vec<User>, PortalError> {
        self.repo.list_by_supervisor(supervisor_id).await
    }
}

// ── CreateSupervisor (admin) ─────────────────────────────────────────────────

pub struct CreateSupervisorUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CreateSupervisorUseCase<R> {
    pub async fn execute(&self, input: NewAccountInput) -> Result<User, PortalError> {
        create_account(&self.repo, input, Role::Supervisor).await
    }
}

// ── UpdateUser (admin) ───────────────────────────────────────────────────────

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository + Clone> UpdateUserUseCase<R> {
    /// Profile fields are written first. A role change then goes through
    /// [`AssignmentManager::change_role`] so no supervisor link outlives it.
    pub async fn execute(
        &self,
        id: UserId,
        update: UserProfileUpdate,
    ) -> Result<User, PortalError> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(PortalError::UserNotFound)?;
        if let Some(ref email) = update.email {
            if *email != current.email && self.repo.exists_by_email(email).await? {
                return Err(PortalError::EmailTaken);
            }
        }
        let updated = self.repo.update_profile(id, &update).await?;
        match update.role {
            Some(role) if role != current.role => {
                let assignments = AssignmentManager {
                    users: self.repo.clone(),
                };
                assignments.change_role(id, role).await
            }
            _ => Ok(updated),
        }
    }
}

// ── DeleteUser (admin) ───────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    pub async fn execute(&self, id: UserId) -> Result<(), PortalError> {
        if !self.repo.delete(id).await? {
            return Err(PortalError::UserNotFound);
        }
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }
}
