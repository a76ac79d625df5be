use axum::{
    Router,
    extract::State,
    middleware::from_fn_with_state,
    response::Response,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use portal_core::error::AppError;
use portal_core::health::{healthz, readiness};
use portal_core::middleware::{cors_layer, request_id_layer};

use crate::handlers::{admin, auth, evaluations, feedback, progress, projects, users};
use crate::security::authenticator::authenticate_request;
use crate::security::policy::enforce_policy;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound
}

async fn readyz(State(state): State<AppState>) -> Response {
    readiness(state.db.ping().await)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        // Users
        .route("/api/users", get(users::list_users))
        .route("/api/users/me", get(users::get_me))
        .route("/api/users/faculty", get(users::get_supervisors))
        .route("/api/users/students", get(users::get_students))
        .route("/api/users/my-students", get(users::get_my_students))
        .route("/api/users/username/{username}", get(users::get_user_by_username))
        .route("/api/users/role/{role}", get(users::get_users_by_role))
        .route(
            "/api/users/supervisor/{supervisor_id}/students",
            get(users::get_students_of),
        )
        .route(
            "/api/users/supervisor/{supervisor_id}/remove-student/{student_id}",
            put(users::supervisor_remove_student),
        )
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/users/{id}/assign-supervisor/{supervisor_id}",
            put(users::assign_supervisor),
        )
        .route(
            "/api/users/{id}/remove-supervisor",
            put(users::remove_supervisor),
        )
        // Admin
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/students", get(admin::list_students))
        .route(
            "/api/admin/users/faculty",
            get(admin::list_supervisors).post(admin::create_supervisor),
        )
        .route(
            "/api/admin/users/{id}",
            axum::routing::delete(admin::delete_user),
        )
        .route(
            "/api/admin/users/{id}/assign-faculty/{supervisor_id}",
            put(admin::assign_faculty),
        )
        .route("/api/admin/projects", get(admin::list_projects))
        .route("/api/admin/projects/pending", get(admin::list_pending_projects))
        .route("/api/admin/projects/{id}/approve", put(admin::approve_project))
        .route("/api/admin/projects/{id}/reject", put(admin::reject_project))
        .route("/api/admin/projects/{id}/progress", get(admin::project_progress))
        .route("/api/admin/projects/{id}/deadline", put(admin::set_deadline))
        .route("/api/admin/dashboard/stats", get(admin::dashboard_stats))
        // Projects
        .route("/api/projects", get(projects::list_projects))
        .route("/api/projects/submit", post(projects::submit_project))
        .route("/api/projects/my", get(projects::get_my_projects))
        .route("/api/projects/my-students", get(projects::get_my_students_projects))
        .route(
            "/api/projects/assign-to-supervisors",
            post(projects::assign_projects_to_supervisors),
        )
        .route("/api/projects/approve/{id}", put(projects::approve_project))
        .route("/api/projects/reject/{id}", put(projects::reject_project))
        .route("/api/projects/student/{id}", get(projects::get_projects_by_student))
        .route("/api/projects/faculty/{id}", get(projects::get_projects_by_faculty))
        .route("/api/projects/status/{status}", get(projects::get_projects_by_status))
        .route(
            "/api/projects/supervisor/{id}/students",
            get(projects::get_projects_of_supervised_students),
        )
        .route(
            "/api/projects/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/api/projects/{id}/status", put(projects::update_project_status))
        .route("/api/projects/{id}/complete", put(projects::complete_project))
        // Progress updates
        .route(
            "/api/progress-updates",
            post(progress::create_progress_update),
        )
        .route(
            "/api/progress-updates/{id}",
            get(progress::get_progress_update)
                .put(progress::update_progress_update)
                .delete(progress::delete_progress_update),
        )
        .route(
            "/api/progress-updates/project/{project_id}",
            get(progress::list_by_project),
        )
        .route(
            "/api/progress-updates/project/{project_id}/week/{week}",
            get(progress::get_by_project_week),
        )
        .route(
            "/api/progress-updates/project/{project_id}/count",
            get(progress::count_by_project),
        )
        // Evaluations
        .route("/api/evaluations", post(evaluations::create_evaluation))
        .route(
            "/api/evaluations/{id}",
            get(evaluations::get_evaluation)
                .put(evaluations::update_evaluation)
                .delete(evaluations::delete_evaluation),
        )
        .route(
            "/api/evaluations/project/{project_id}",
            get(evaluations::list_by_project),
        )
        .route(
            "/api/evaluations/project/{project_id}/latest",
            get(evaluations::latest_by_project),
        )
        .route(
            "/api/evaluations/project/{project_id}/average-score",
            get(evaluations::average_score),
        )
        .route(
            "/api/evaluations/project/{project_id}/exists",
            get(evaluations::exists_for_project),
        )
        // Feedback
        .route(
            "/api/feedback",
            get(feedback::list_feedback).post(feedback::create_feedback),
        )
        .route(
            "/api/feedback/{id}",
            get(feedback::get_feedback)
                .put(feedback::update_feedback)
                .delete(feedback::delete_feedback),
        )
        .route("/api/feedback/project/{id}", get(feedback::list_by_project))
        .route("/api/feedback/faculty/{id}", get(feedback::list_by_faculty))
        .route("/api/feedback/student/{id}", get(feedback::list_by_student))
        .route(
            "/api/feedback/average-rating/project/{id}",
            get(feedback::average_for_project),
        )
        .route(
            "/api/feedback/average-rating/student/{id}",
            get(feedback::average_for_student),
        )
        .fallback(not_found)
        // Innermost first: the authenticator runs before the policy check.
        .layer(from_fn_with_state(state.clone(), enforce_policy))
        .layer(from_fn_with_state(state.clone(), authenticate_request))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .layer(cors_layer())
        .with_state(state)
}
