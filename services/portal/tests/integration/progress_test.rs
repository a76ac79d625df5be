use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use portal_domain::user::Role;
use portal_testing::auth::MockAuth;

use crate::helpers::{TestApp, as_user, spawn_app};

struct Cast {
    admin: MockAuth,
    student: MockAuth,
    supervisor: MockAuth,
    supervisor_id: i64,
}

/// Admin, a student and the student's supervisor, already linked.
async fn cast(app: &TestApp) -> Cast {
    let admin = app.seed_user("root", Role::Admin, "Root", "User").await;
    let student = app.seed_user("stu", Role::Student, "Stu", "Dent").await;
    let supervisor = app.seed_user("sam", Role::Supervisor, "Sam", "Vimes").await;
    let admin = as_user(&admin);
    let uri = format!(
        "/api/users/{}/assign-supervisor/{}",
        student.id, supervisor.id
    );
    let (status, _) = app.send(Method::PUT, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    Cast {
        admin,
        student: as_user(&student),
        supervisor: as_user(&supervisor),
        supervisor_id: supervisor.id.0,
    }
}

async fn submit(app: &TestApp, student: &MockAuth, title: &str) -> Value {
    let (status, project) = app
        .send(
            Method::POST,
            "/api/projects/submit",
            Some(student),
            Some(json!({ "title": title, "description": "Term project", "status": "COMPLETED" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    project
}

fn weekly(project_id: &Value, week: i32) -> Value {
    json!({
        "projectId": project_id,
        "weekNumber": week,
        "updateDescription": format!("Work done in week {week}"),
    })
}

#[tokio::test]
async fn should_submit_as_pending_with_supervisor_as_faculty() {
    let app = spawn_app().await;
    let cast = cast(&app).await;
    let project = submit(&app, &cast.student, "Compiler").await;
    assert_eq!(project["status"], "PENDING");
    assert_eq!(project["facultyId"], cast.supervisor_id);
    assert_eq!(project["progress"], 0);

    let (status, mine) = app
        .send(Method::GET, "/api/projects/my", Some(&cast.student), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn should_drive_project_from_approval_into_progress() {
    let app = spawn_app().await;
    let cast = cast(&app).await;
    let project = submit(&app, &cast.student, "Compiler").await;
    let id = &project["id"];

    let (status, body) = app
        .send(
            Method::POST,
            "/api/progress-updates",
            Some(&cast.student),
            Some(weekly(id, 1)),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("PENDING"));

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/projects/approve/{id}"),
            Some(&cast.student),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, approved) = app
        .send(
            Method::PUT,
            &format!("/api/projects/approve/{id}"),
            Some(&cast.supervisor),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "APPROVED");

    let (status, update) = app
        .send(
            Method::POST,
            "/api/progress-updates",
            Some(&cast.student),
            Some(weekly(id, 3)),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(update["weekNumber"], 3);

    let (_, current) = app
        .send(
            Method::GET,
            &format!("/api/projects/{id}"),
            Some(&cast.student),
            None,
        )
        .await;
    assert_eq!(current["status"], "IN_PROGRESS");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/progress-updates",
            Some(&cast.student),
            Some(weekly(id, 3)),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Progress update for week 3 already exists for this project"
    );

    let (status, count) = app
        .send(
            Method::GET,
            &format!("/api/progress-updates/project/{id}/count"),
            Some(&cast.supervisor),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count, 1);

    let (status, completed) = app
        .send(
            Method::PUT,
            &format!("/api/projects/{id}/complete"),
            Some(&cast.supervisor),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["status"], "COMPLETED");
}

#[tokio::test]
async fn should_refuse_progress_from_someone_else() {
    let app = spawn_app().await;
    let cast = cast(&app).await;
    let intruder = app.seed_user("ivy", Role::Student, "Ivy", "Other").await;
    let project = submit(&app, &cast.student, "Compiler").await;
    let id = &project["id"];
    app.send(
        Method::PUT,
        &format!("/api/projects/approve/{id}"),
        Some(&cast.supervisor),
        None,
    )
    .await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/progress-updates",
            Some(&as_user(&intruder)),
            Some(weekly(id, 1)),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_not_reopen_rejected_project() {
    let app = spawn_app().await;
    let cast = cast(&app).await;
    let project = submit(&app, &cast.student, "Compiler").await;
    let id = &project["id"];

    let (status, rejected) = app
        .send(
            Method::PUT,
            &format!("/api/projects/reject/{id}"),
            Some(&cast.supervisor),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["status"], "REJECTED");

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/projects/approve/{id}"),
            Some(&cast.supervisor),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_TRANSITION");

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/projects/{id}/status"),
            Some(&cast.admin),
            Some(json!("IN_PROGRESS")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn should_report_latest_and_average_evaluation() {
    let app = spawn_app().await;
    let cast = cast(&app).await;
    let project = submit(&app, &cast.student, "Compiler").await;
    let id = &project["id"];

    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/evaluations/project/{id}/latest"),
            Some(&cast.supervisor),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for score in [70, 90] {
        let (status, _) = app
            .send(
                Method::POST,
                "/api/evaluations",
                Some(&cast.supervisor),
                Some(json!({ "projectId": id, "finalScore": score, "finalComment": "ok" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, latest) = app
        .send(
            Method::GET,
            &format!("/api/evaluations/project/{id}/latest"),
            Some(&cast.student),
            None,
        )
        .await;
    assert_eq!(latest["finalScore"], 90);

    let (_, average) = app
        .send(
            Method::GET,
            &format!("/api/evaluations/project/{id}/average-score"),
            Some(&cast.student),
            None,
        )
        .await;
    assert_eq!(average, 80.0);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/evaluations",
            Some(&cast.supervisor),
            Some(json!({ "projectId": id, "finalScore": 101 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_cascade_project_delete_to_children() {
    let app = spawn_app().await;
    let cast = cast(&app).await;
    let project = submit(&app, &cast.student, "Compiler").await;
    let id = &project["id"];
    app.send(
        Method::PUT,
        &format!("/api/projects/approve/{id}"),
        Some(&cast.supervisor),
        None,
    )
    .await;
    let (_, update) = app
        .send(
            Method::POST,
            "/api/progress-updates",
            Some(&cast.student),
            Some(weekly(id, 1)),
        )
        .await;

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/projects/{id}"),
            Some(&cast.supervisor),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/projects/{id}"),
            Some(&cast.admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/progress-updates/{}", update["id"]),
            Some(&cast.admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/projects/{id}"),
            Some(&cast.admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_set_deadline_and_back_fill_faculty() {
    let app = spawn_app().await;
    let admin = app.seed_user("root", Role::Admin, "Root", "User").await;
    let student = app.seed_user("stu", Role::Student, "Stu", "Dent").await;
    let supervisor = app.seed_user("sam", Role::Supervisor, "Sam", "Vimes").await;
    let admin = as_user(&admin);

    let project = submit(&app, &as_user(&student), "Compiler").await;
    assert_eq!(project["facultyId"], Value::Null);
    let id = &project["id"];

    let (status, dated) = app
        .send(
            Method::PUT,
            &format!("/api/admin/projects/{id}/deadline"),
            Some(&admin),
            Some(json!({ "deadline": "2026-06-30" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dated["endDate"], "2026-06-30");

    let uri = format!(
        "/api/users/{}/assign-supervisor/{}",
        student.id, supervisor.id
    );
    app.send(Method::PUT, &uri, Some(&admin), None).await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/projects/assign-to-supervisors",
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);

    let (_, fetched) = app
        .send(Method::GET, &format!("/api/projects/{id}"), Some(&admin), None)
        .await;
    assert_eq!(fetched["facultyId"], supervisor.id.0);
}
