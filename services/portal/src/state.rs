use std::sync::Arc;

use sea_orm::DatabaseConnection;

use portal_auth_types::token::TokenService;

use crate::infra::db::{
    DbEvaluationRepository, DbFeedbackRepository, DbProgressUpdateRepository,
    DbProjectRepository, DbUserRepository,
};
use crate::security::identity::IdentityResolver;
use crate::security::policy::AccessPolicy;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub tokens: Arc<TokenService>,
    pub policy: Arc<AccessPolicy>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, tokens: TokenService) -> Self {
        Self {
            db,
            tokens: Arc::new(tokens),
            policy: Arc::new(AccessPolicy::portal()),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn project_repo(&self) -> DbProjectRepository {
        DbProjectRepository {
            db: self.db.clone(),
        }
    }

    pub fn progress_repo(&self) -> DbProgressUpdateRepository {
        DbProgressUpdateRepository {
            db: self.db.clone(),
        }
    }

    pub fn evaluation_repo(&self) -> DbEvaluationRepository {
        DbEvaluationRepository {
            db: self.db.clone(),
        }
    }

    pub fn feedback_repo(&self) -> DbFeedbackRepository {
        DbFeedbackRepository {
            db: self.db.clone(),
        }
    }

    pub fn identity_resolver(&self) -> IdentityResolver<DbUserRepository> {
        IdentityResolver {
            users: self.user_repo(),
        }
    }
}
