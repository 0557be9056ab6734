use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::answers::Answers;
use super::export::write_results_csv;
use super::service::AssessmentService;
use super::validation::ValidationError;

/// Router exposing the compiled form and answer evaluation.
pub fn assessment_router(service: Arc<AssessmentService>) -> Router {
    Router::new()
        .route("/api/v1/form", get(form_handler))
        .route("/api/v1/assessments", post(assess_handler))
        .route("/api/v1/assessments/csv", post(assess_csv_handler))
        .with_state(service)
}

pub(crate) async fn form_handler(State(service): State<Arc<AssessmentService>>) -> Response {
    (StatusCode::OK, axum::Json(service.compiled().clone())).into_response()
}

pub(crate) async fn assess_handler(
    State(service): State<Arc<AssessmentService>>,
    axum::Json(answers): axum::Json<Answers>,
) -> Response {
    match service.assess(answers) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => unprocessable(error),
    }
}

pub(crate) async fn assess_csv_handler(
    State(service): State<Arc<AssessmentService>>,
    axum::Json(answers): axum::Json<Answers>,
) -> Response {
    let report = match service.assess(answers) {
        Ok(report) => report,
        Err(error) => return unprocessable(error),
    };

    let mut buffer = Vec::new();
    match write_results_csv(&mut buffer, &report.results) {
        Ok(()) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            buffer,
        )
            .into_response(),
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn unprocessable(error: ValidationError) -> Response {
    let payload = json!({
        "error": error.to_string(),
        "issues": error.issues(),
    });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}
