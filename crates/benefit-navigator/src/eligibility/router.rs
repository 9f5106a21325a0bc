use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::FormData;
use super::fields::{catalog, FieldDescriptor};
use super::session::{EligibilitySessionService, RefreshRequest, SessionError, SessionId};
use super::store::{AnswerStore, StoreError, UserId};

/// Router exposing the field catalog, evaluation sessions and stored answers.
pub fn eligibility_router<S>(service: Arc<EligibilitySessionService<S>>) -> Router
where
    S: AnswerStore + 'static,
{
    Router::new()
        .route("/api/v1/eligibility/fields", get(fields_handler))
        .route("/api/v1/eligibility/sections", get(sections_handler::<S>))
        .route(
            "/api/v1/eligibility/sessions",
            post(create_session_handler::<S>),
        )
        .route(
            "/api/v1/eligibility/sessions/:session_id",
            axum::routing::delete(end_session_handler::<S>),
        )
        .route(
            "/api/v1/eligibility/sessions/:session_id/refresh",
            post(refresh_handler::<S>),
        )
        .route(
            "/api/v1/answers/:user_id",
            get(load_answers_handler::<S>).put(save_answers_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CreateSessionRequest {
    #[serde(default)]
    pub(crate) user_id: Option<UserId>,
}

pub(crate) async fn fields_handler() -> Json<Vec<FieldDescriptor>> {
    Json(catalog().map(|meta| meta.descriptor()).collect())
}

pub(crate) async fn sections_handler<S>(
    State(service): State<Arc<EligibilitySessionService<S>>>,
) -> Response
where
    S: AnswerStore + 'static,
{
    let sections = service.registry().strategy().sections().to_vec();
    (StatusCode::OK, Json(json!({ "sections": sections }))).into_response()
}

pub(crate) async fn create_session_handler<S>(
    State(service): State<Arc<EligibilitySessionService<S>>>,
    body: Option<Json<CreateSessionRequest>>,
) -> Response
where
    S: AnswerStore + 'static,
{
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let session_id = service.create_session(request.user_id);
    (
        StatusCode::CREATED,
        Json(json!({ "session_id": session_id })),
    )
        .into_response()
}

pub(crate) async fn refresh_handler<S>(
    State(service): State<Arc<EligibilitySessionService<S>>>,
    Path(session_id): Path<String>,
    Json(request): Json<RefreshRequest>,
) -> Response
where
    S: AnswerStore + 'static,
{
    let id = SessionId(session_id);
    match service.refresh(&id, request) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn end_session_handler<S>(
    State(service): State<Arc<EligibilitySessionService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: AnswerStore + 'static,
{
    match service.end_session(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn load_answers_handler<S>(
    State(service): State<Arc<EligibilitySessionService<S>>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: AnswerStore + 'static,
{
    match service.load_answers(&UserId(user_id)) {
        Ok(answers) => (StatusCode::OK, Json(answers)).into_response(),
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn save_answers_handler<S>(
    State(service): State<Arc<EligibilitySessionService<S>>>,
    Path(user_id): Path<String>,
    Json(answers): Json<FormData>,
) -> Response
where
    S: AnswerStore + 'static,
{
    match service.save_answers(&UserId(user_id), &answers) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => session_error_response(error),
    }
}

fn session_error_response(error: SessionError) -> Response {
    let status = match &error {
        SessionError::NotFound | SessionError::Store(StoreError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        SessionError::Busy => StatusCode::CONFLICT,
        SessionError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
