use std::fmt::Display;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Serialize)]
struct ProbeBody {
    status: &'static str,
}

/// Handler for `GET /healthz`: the process is up and serving.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Turn a dependency check into the `GET /readyz` answer.
///
/// The service runs its own checks (database ping and the like) and passes the
/// outcome here. A failed check answers 503 and is logged at warn.
pub fn readiness<E: Display>(check: Result<(), E>) -> Response {
    match check {
        Ok(()) => (StatusCode::OK, Json(ProbeBody { status: "ready" })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ProbeBody {
                    status: "unavailable",
                }),
            )
                .into_response()
        }
    }
}
