use axum::http::{Method, StatusCode};

use portal_domain::user::Role;

use crate::helpers::{as_user, spawn_app};

#[tokio::test]
async fn should_serve_probes_without_credentials() {
    let app = spawn_app().await;
    let (status, _) = app.send(Method::GET, "/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.send(Method::GET, "/readyz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn should_return_401_json_for_anonymous_requests() {
    let app = spawn_app().await;
    for uri in ["/api/projects", "/api/users", "/api/admin/users", "/api/nowhere"] {
        let (status, body) = app.send(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["kind"], "UNAUTHORIZED", "{uri}");
    }
}

#[tokio::test]
async fn should_return_404_for_unknown_route_once_authenticated() {
    let app = spawn_app().await;
    let admin = app.seed_user("root", Role::Admin, "Root", "User").await;
    let (status, body) = app
        .send(Method::GET, "/api/nowhere", Some(&as_user(&admin)), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NOT_FOUND");
}

#[tokio::test]
async fn should_limit_user_directory_to_staff() {
    let app = spawn_app().await;
    let student = app.seed_user("stu", Role::Student, "Stu", "Dent").await;
    let faculty = app.seed_user("fay", Role::Faculty, "Fay", "Culty").await;
    let supervisor = app.seed_user("sam", Role::Supervisor, "Sam", "Vimes").await;

    let (status, _) = app
        .send(Method::GET, "/api/users", Some(&as_user(&student)), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    for user in [&faculty, &supervisor] {
        let (status, body) = app
            .send(Method::GET, "/api/users", Some(&as_user(user)), None)
            .await;
        assert_eq!(status, StatusCode::OK, "{}", user.username);
        assert_eq!(body.as_array().unwrap().len(), 3);
    }
}

#[tokio::test]
async fn should_reserve_admin_routes_for_admin() {
    let app = spawn_app().await;
    let admin = app.seed_user("root", Role::Admin, "Root", "User").await;
    let supervisor = app.seed_user("sam", Role::Supervisor, "Sam", "Vimes").await;

    let (status, _) = app
        .send(
            Method::GET,
            "/api/admin/dashboard/stats",
            Some(&as_user(&supervisor)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(Method::GET, "/api/admin/dashboard/stats", Some(&as_user(&admin)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalSupervisors"], 1);
    assert_eq!(body["totalStudents"], 0);
    assert_eq!(body["totalProjects"], 0);
    assert_eq!(body["completionRate"], 0.0);
}

#[tokio::test]
async fn should_keep_student_only_routes_from_staff() {
    let app = spawn_app().await;
    let admin = app.seed_user("root", Role::Admin, "Root", "User").await;
    let (status, _) = app
        .send(Method::GET, "/api/projects/my", Some(&as_user(&admin)), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_let_students_read_evaluations_but_not_feedback() {
    let app = spawn_app().await;
    let student = app.seed_user("stu", Role::Student, "Stu", "Dent").await;
    let auth = as_user(&student);

    let (status, body) = app
        .send(Method::GET, "/api/evaluations/project/1/exists", Some(&auth), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!(false));

    let (status, _) = app
        .send(Method::GET, "/api/feedback/project/1", Some(&auth), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
