use std::sync::Arc;

use anyhow::Context as _;

use portal_auth_types::token::TokenService;
use portal_domain::user::Role;

use crate::domain::repository::UserRepository;
use crate::domain::types::{NewUser, User};
use crate::error::PortalError;
use crate::security::password::{hash_password, verify_password};

// ── Account creation (shared by self-registration and admin) ────────────────

pub struct NewAccountInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub faculty: Option<String>,
}

fn require(field: &str, value: &str) -> Result<(), PortalError> {
    if value.trim().is_empty() {
        return Err(PortalError::validation(format!("{field} must not be blank")));
    }
    Ok(())
}

/// Create an account with `role` after the uniqueness checks.
pub(crate) async fn create_account<R: UserRepository>(
    repo: &R,
    input: NewAccountInput,
    role: Role,
) -> Result<User, PortalError> {
    require("Username", &input.username)?;
    require("Email", &input.email)?;
    require("Password", &input.password)?;
    if repo.exists_by_username(&input.username).await? {
        return Err(PortalError::UsernameTaken);
    }
    if repo.exists_by_email(&input.email).await? {
        return Err(PortalError::EmailTaken);
    }
    let password_hash = hash_password(&input.password).context("hash password")?;
    let user = repo
        .create(&NewUser {
            username: input.username,
            email: input.email,
            password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
            role,
            faculty: input.faculty,
        })
        .await?;
    tracing::info!(user_id = %user.id, role = %role, "account created");
    Ok(user)
}

// ── Register ─────────────────────────────────────────────────────────────────

/// Public self-registration. Always creates a STUDENT with no supervisor.
pub struct RegisterUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> RegisterUseCase<R> {
    pub async fn execute(&self, input: NewAccountInput) -> Result<User, PortalError> {
        create_account(&self.repo, input, Role::Student).await
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginOutput {
    pub token: String,
    pub expires_at: u64,
    pub user: User,
}

pub struct LoginUseCase<R: UserRepository> {
    pub repo: R,
    pub tokens: Arc<TokenService>,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(&self, username: &str, password: &str) -> Result<LoginOutput, PortalError> {
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or(PortalError::InvalidCredentials)?;
        if !verify_password(&user.password_hash, password) {
            return Err(PortalError::InvalidCredentials);
        }
        let issued = self
            .tokens
            .issue(&user.username, user.role)
            .context("sign token")?;
        Ok(LoginOutput {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }
}
