use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::Local;
use serde_json::json;

use super::super::report::ConvocatoriaReport;
use super::domain::{
    AiScoreInput, ManualScoreInput, PostulacionId, PostulacionStatus, PostulacionSubmission,
};
use super::repository::{NotificationPublisher, PostulacionRepository, RepositoryError};
use super::service::{PostulacionService, PostulacionServiceError};

/// Router builder exposing HTTP endpoints for intake, scoring, evaluation,
/// and reporting.
pub fn postulacion_router<R, N>(service: Arc<PostulacionService<R, N>>) -> Router
where
    R: PostulacionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/convocatorias/:convocatoria_id/postulaciones",
            post(submit_handler::<R, N>),
        )
        .route(
            "/api/v1/convocatorias/:convocatoria_id/report",
            get(report_handler::<R, N>),
        )
        .route(
            "/api/v1/postulaciones/:postulacion_id",
            get(status_handler::<R, N>),
        )
        .route(
            "/api/v1/postulaciones/:postulacion_id/scores/manual",
            put(manual_scores_handler::<R, N>),
        )
        .route(
            "/api/v1/postulaciones/:postulacion_id/scores/ai",
            put(ai_scores_handler::<R, N>),
        )
        .route(
            "/api/v1/postulaciones/:postulacion_id/evaluacion",
            post(finalize_handler::<R, N>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<PostulacionService<R, N>>>,
    Path(convocatoria_id): Path<String>,
    axum::Json(submission): axum::Json<PostulacionSubmission>,
) -> Response
where
    R: PostulacionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    if let Some(response) = unknown_convocatoria(&service, &convocatoria_id) {
        return response;
    }

    let today = Local::now().date_naive();
    match service.submit(submission, today) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<PostulacionService<R, N>>>,
    Path(postulacion_id): Path<String>,
) -> Response
where
    R: PostulacionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = PostulacionId(postulacion_id);
    match service.get(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(PostulacionServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "postulacion_id": id.0,
                "status": PostulacionStatus::Enviada.label(),
                "decision_rationale": "evaluación pendiente",
                "total_score": serde_json::Value::Null,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn manual_scores_handler<R, N>(
    State(service): State<Arc<PostulacionService<R, N>>>,
    Path(postulacion_id): Path<String>,
    axum::Json(scores): axum::Json<Vec<ManualScoreInput>>,
) -> Response
where
    R: PostulacionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = PostulacionId(postulacion_id);
    match service.record_manual_scores(&id, scores) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn ai_scores_handler<R, N>(
    State(service): State<Arc<PostulacionService<R, N>>>,
    Path(postulacion_id): Path<String>,
    axum::Json(scores): axum::Json<Vec<AiScoreInput>>,
) -> Response
where
    R: PostulacionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = PostulacionId(postulacion_id);
    match service.record_ai_scores(&id, scores) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn finalize_handler<R, N>(
    State(service): State<Arc<PostulacionService<R, N>>>,
    Path(postulacion_id): Path<String>,
) -> Response
where
    R: PostulacionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = PostulacionId(postulacion_id);
    match service.finalize(&id) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R, N>(
    State(service): State<Arc<PostulacionService<R, N>>>,
    Path(convocatoria_id): Path<String>,
) -> Response
where
    R: PostulacionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    if let Some(response) = unknown_convocatoria(&service, &convocatoria_id) {
        return response;
    }

    match service.records() {
        Ok(records) => {
            let report = ConvocatoriaReport::build(service.convocatoria(), &records);
            (StatusCode::OK, axum::Json(report)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn unknown_convocatoria<R, N>(
    service: &PostulacionService<R, N>,
    convocatoria_id: &str,
) -> Option<Response>
where
    R: PostulacionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    if service.convocatoria().id().0 == convocatoria_id {
        return None;
    }
    let payload = json!({
        "error": format!("convocatoria '{convocatoria_id}' not found"),
    });
    Some((StatusCode::NOT_FOUND, axum::Json(payload)).into_response())
}

fn error_response(error: PostulacionServiceError) -> Response {
    let status = match &error {
        PostulacionServiceError::Intake(_)
        | PostulacionServiceError::Scoring(_)
        | PostulacionServiceError::UnknownCriterion { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PostulacionServiceError::Repository(RepositoryError::Conflict)
        | PostulacionServiceError::AnswersFrozen { .. }
        | PostulacionServiceError::AlreadySubmitted { .. }
        | PostulacionServiceError::ScoreBeforeSubmit
        | PostulacionServiceError::EvaluationClosed => StatusCode::CONFLICT,
        PostulacionServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
