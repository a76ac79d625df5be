use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use sea_orm::{ConnectOptions, Database};
use serde_json::Value;
use tower::ServiceExt;

use portal::domain::repository::UserRepository;
use portal::domain::types::{NewUser, User};
use portal::router::build_router;
use portal::security::password::hash_password;
use portal::state::AppState;
use portal_domain::user::Role;
use portal_migration::{Migrator, MigratorTrait};
use portal_testing::auth::{MockAuth, TEST_JWT_SECRET};

pub const TEST_PASSWORD: &str = "correct horse battery";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

/// Router over a freshly migrated in-memory SQLite database.
pub async fn spawn_app() -> TestApp {
    // One connection: every new in-memory connection would be a different database.
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let tokens = portal_auth_types::token::TokenService::new(
        TEST_JWT_SECRET,
        portal_auth_types::token::DEFAULT_TOKEN_TTL_SECS,
    );
    let state = AppState::new(db, tokens);
    TestApp {
        router: build_router(state.clone()),
        state,
    }
}

impl TestApp {
    /// Insert an account directly, bypassing registration.
    pub async fn seed_user(&self, username: &str, role: Role, first: &str, last: &str) -> User {
        self.state
            .user_repo()
            .create(&NewUser {
                username: username.to_owned(),
                email: format!("{username}@example.com"),
                password_hash: hash_password(TEST_PASSWORD).unwrap(),
                first_name: first.to_owned(),
                last_name: last.to_owned(),
                role,
                faculty: None,
            })
            .await
            .unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        auth: Option<&MockAuth>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            for (name, value) in auth.headers().iter() {
                builder = builder.header(name, value);
            }
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn send_with_token(
        &self,
        method: Method,
        uri: &str,
        token: &str,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}

pub fn as_user(user: &User) -> MockAuth {
    MockAuth::new(user.username.clone(), user.role)
}
