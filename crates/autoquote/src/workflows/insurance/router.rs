use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::ApplicationDraft;
use super::form::FormErrors;
use super::repository::{ApplicationRepository, RepositoryError};
use super::service::{ApplicationServiceError, InsuranceApplicationService};

/// Router builder exposing the save, update, submit, and fetch endpoints.
pub fn application_router<R>(service: Arc<InsuranceApplicationService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/get-application/:id", get(get_handler::<R>))
        .route(
            "/api/post-initialize-application",
            post(initialize_handler::<R>),
        )
        .route("/api/update-application/:id", put(update_handler::<R>))
        .route(
            "/api/post-complete-application",
            post(complete_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<InsuranceApplicationService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.get(&application_id) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn initialize_handler<R>(
    State(service): State<Arc<InsuranceApplicationService<R>>>,
    payload: Result<Json<ApplicationDraft>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let draft = match payload {
        Ok(Json(draft)) => draft,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.initialize(draft) {
        Ok(record) => (
            StatusCode::CREATED,
            Json(json!({ "applicationId": record.application_id })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<InsuranceApplicationService<R>>>,
    Path(application_id): Path<String>,
    payload: Result<Json<ApplicationDraft>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let draft = match payload {
        Ok(Json(draft)) => draft,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.update(&application_id, draft) {
        Ok(record) => (
            StatusCode::OK,
            Json(json!({ "applicationId": record.application_id })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn complete_handler<R>(
    State(service): State<Arc<InsuranceApplicationService<R>>>,
    payload: Result<Json<ApplicationDraft>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let draft = match payload {
        Ok(Json(draft)) => draft,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.submit(draft) {
        Ok(quote) => (StatusCode::CREATED, Json(quote)).into_response(),
        Err(err) => error_response(err),
    }
}

fn rejection_response(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": rejection.body_text(),
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn error_response(err: ApplicationServiceError) -> Response {
    match err {
        ApplicationServiceError::Validation(errors) => {
            let payload = json!({
                "errors": errors.messages(),
                "issues": errors.as_slice(),
                "fieldErrors": FormErrors::from_errors(errors.as_slice()),
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        ApplicationServiceError::MissingApplicationId | ApplicationServiceError::EmptyDraft => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        ApplicationServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({
                "error": "Application already exists",
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        ApplicationServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({
                "error": "Application not found",
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        ApplicationServiceError::Repository(other) => {
            error!(error = %other, "application request failed");
            let payload = json!({
                "error": "Internal Server Error",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
