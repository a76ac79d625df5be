use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use portal::domain::repository::UserRepository;
use portal_domain::user::Role;
use portal_testing::auth::MockAuth;

use crate::helpers::{TEST_PASSWORD, as_user, spawn_app};

fn registration(username: &str, email: &str) -> Value {
    json!({
        "username": username,
        "email": email,
        "password": "s3cret-pass",
        "firstName": "Alice",
        "lastName": "Liddell",
        "faculty": "Computer Science",
        "supervisorName": "Someone Important",
    })
}

#[tokio::test]
async fn should_register_student_and_ignore_supervisor_name() {
    let app = spawn_app().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(registration("alice", "alice@example.com")),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "STUDENT");
    assert_eq!(body["faculty"], "Computer Science");
    assert_eq!(body["supervisorName"], Value::Null);
    assert_eq!(body["supervisorId"], Value::Null);
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn should_reject_duplicate_username_and_email() {
    let app = spawn_app().await;
    app.send(
        Method::POST,
        "/api/auth/register",
        None,
        Some(registration("alice", "alice@example.com")),
    )
    .await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(registration("alice", "other@example.com")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "USERNAME_TAKEN");
    assert_eq!(body["message"], "Username is already taken!");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(registration("alicia", "alice@example.com")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "EMAIL_TAKEN");
    assert_eq!(body["message"], "Email is already in use!");
}

#[tokio::test]
async fn should_reject_login_with_wrong_password_or_unknown_user() {
    let app = spawn_app().await;
    app.seed_user("bob", Role::Student, "Bob", "Builder").await;

    for (username, password) in [("bob", "nope"), ("nobody", TEST_PASSWORD)] {
        let (status, body) = app
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{username}");
        assert_eq!(body["kind"], "INVALID_CREDENTIALS");
        assert_eq!(body["message"], "Invalid credentials");
    }
}

#[tokio::test]
async fn should_gate_routes_by_role_for_a_registered_student() {
    let app = spawn_app().await;
    app.send(
        Method::POST,
        "/api/auth/register",
        None,
        Some(registration("alice", "alice@example.com")),
    )
    .await;

    let (status, login) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "s3cret-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["tokenType"], "Bearer");
    assert_eq!(login["username"], "alice");
    assert_eq!(login["email"], "alice@example.com");
    assert_eq!(login["role"], "STUDENT");
    assert!(login["id"].as_i64().is_some());

    let token = login["token"].as_str().unwrap();
    let claims = MockAuth::token_service().validate(token).unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.role, "STUDENT");

    let (status, body) = app
        .send_with_token(Method::GET, "/api/admin/dashboard/stats", token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "FORBIDDEN");

    let (status, body) = app
        .send_with_token(Method::GET, "/api/projects/my", token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn should_treat_token_of_deleted_user_as_anonymous() {
    let app = spawn_app().await;
    let carol = app.seed_user("carol", Role::Student, "Carol", "Danvers").await;
    let auth = as_user(&carol);

    let (status, _) = app.send(Method::GET, "/api/projects", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);

    assert!(app.state.user_repo().delete(carol.id).await.unwrap());

    let (status, body) = app.send(Method::GET, "/api/projects", Some(&auth), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn should_treat_tampered_token_as_anonymous() {
    let app = spawn_app().await;
    let dave = app.seed_user("dave", Role::Admin, "Dave", "Lister").await;
    let token = as_user(&dave).token();
    let sig_start = token.rfind('.').unwrap() + 1;
    let flipped = if token[sig_start..].starts_with('A') { "B" } else { "A" };
    let token = format!("{}{}{}", &token[..sig_start], flipped, &token[sig_start + 1..]);

    let (status, _) = app
        .send_with_token(Method::GET, "/api/admin/users", &token)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_apply_current_stored_role_not_token_role() {
    let app = spawn_app().await;
    let erin = app.seed_user("erin", Role::Student, "Erin", "Hannon").await;
    // Token claims ADMIN, but the account is a student.
    let forged_role = MockAuth::new(erin.username.clone(), Role::Admin);

    let (status, _) = app
        .send(Method::GET, "/api/admin/users", Some(&forged_role), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
