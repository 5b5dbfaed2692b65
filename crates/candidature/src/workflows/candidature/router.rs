use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;

use super::domain::CandidateId;
use super::form::StepSubmission;
use super::repository::{CandidateRepository, RepositoryError};
use super::service::{CandidatureService, CandidatureServiceError, StepOutcome};
use super::session::{SessionCookie, SessionStore};
use super::views::ConfirmationView;

pub const APPLY_PATH: &str = "/apply";

/// Shared state for the wizard routes.
pub struct CandidatureState<R, S> {
    pub service: Arc<CandidatureService<R, S>>,
    pub cookie: Arc<SessionCookie>,
}

impl<R, S> Clone for CandidatureState<R, S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            cookie: Arc::clone(&self.cookie),
        }
    }
}

/// Router builder exposing the wizard and its confirmation page.
pub fn candidature_router<R, S>(
    service: Arc<CandidatureService<R, S>>,
    cookie: SessionCookie,
) -> Router
where
    R: CandidateRepository + 'static,
    S: SessionStore + 'static,
{
    let state = CandidatureState {
        service,
        cookie: Arc::new(cookie),
    };

    Router::new()
        .route(
            APPLY_PATH,
            get(show_step_handler::<R, S>).post(submit_step_handler::<R, S>),
        )
        .route("/apply/reset", post(reset_handler::<R, S>))
        .route("/success/:candidate_id", get(success_handler::<R, S>))
        .with_state(state)
}

pub fn success_path(id: CandidateId) -> String {
    format!("/success/{id}")
}

pub(crate) async fn show_step_handler<R, S>(
    State(state): State<CandidatureState<R, S>>,
    headers: HeaderMap,
) -> Response
where
    R: CandidateRepository + 'static,
    S: SessionStore + 'static,
{
    let session = state.cookie.resolve(&headers);
    let response = match state.service.current_step(&session.id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => service_error_response(err),
    };
    state.cookie.attach(&session, response)
}

pub(crate) async fn submit_step_handler<R, S>(
    State(state): State<CandidatureState<R, S>>,
    headers: HeaderMap,
    Form(submission): Form<StepSubmission>,
) -> Response
where
    R: CandidateRepository + 'static,
    S: SessionStore + 'static,
{
    let session = state.cookie.resolve(&headers);
    let response = match state.service.submit(&session.id, submission) {
        Ok(StepOutcome::Advanced(_) | StepOutcome::SteppedBack(_) | StepOutcome::Reset) => {
            Redirect::to(APPLY_PATH).into_response()
        }
        Ok(StepOutcome::Completed(candidate)) => {
            Redirect::to(&success_path(candidate.id)).into_response()
        }
        Ok(StepOutcome::Invalid(view)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(*view)).into_response()
        }
        Err(err) => service_error_response(err),
    };
    state.cookie.attach(&session, response)
}

pub(crate) async fn reset_handler<R, S>(
    State(state): State<CandidatureState<R, S>>,
    headers: HeaderMap,
) -> Response
where
    R: CandidateRepository + 'static,
    S: SessionStore + 'static,
{
    let session = state.cookie.resolve(&headers);
    let response = match state.service.reset(&session.id) {
        Ok(()) => Redirect::to(APPLY_PATH).into_response(),
        Err(err) => service_error_response(err),
    };
    state.cookie.attach(&session, response)
}

pub(crate) async fn success_handler<R, S>(
    State(state): State<CandidatureState<R, S>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: CandidateRepository + 'static,
    S: SessionStore + 'static,
{
    let Ok(id) = candidate_id.parse::<CandidateId>() else {
        return not_found(&candidate_id);
    };

    match state.service.confirmation(id) {
        Ok(candidate) => {
            (StatusCode::OK, Json(ConfirmationView::from(&candidate))).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

fn not_found(candidate_id: &str) -> Response {
    let payload = json!({
        "error": "candidature not found",
        "candidate_id": candidate_id,
    });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

fn service_error_response(err: CandidatureServiceError) -> Response {
    match err {
        CandidatureServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "candidature not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        CandidatureServiceError::DuplicateSubmission => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        other => {
            tracing::error!(error = %other, "candidature request failed");
            let payload = json!({
                "error": "your candidature could not be recorded, please try again",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
