use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::super::domain::{ApplicationId, ApplicationStatus, StudentId, VisitId};
use super::repository::{NoticePublisher, PlacementRepository, RepositoryError};
use super::service::{Decision, PlacementService, PlacementServiceError};

/// Router builder exposing the lifecycle endpoints consumed by the portal.
pub fn placement_router<R, N>(service: Arc<PlacementService<R, N>>) -> Router
where
    R: PlacementRepository + 'static,
    N: NoticePublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/placements/eligibility/:student_id/:visit_id",
            get(eligibility_handler::<R, N>),
        )
        .route(
            "/api/v1/placements/applications",
            get(list_handler::<R, N>).post(apply_handler::<R, N>),
        )
        .route(
            "/api/v1/placements/applications/:application_id",
            get(status_handler::<R, N>),
        )
        .route(
            "/api/v1/placements/applications/:application_id/decision",
            post(decide_handler::<R, N>),
        )
        .route(
            "/api/v1/placements/students/:student_id/applications",
            get(student_applications_handler::<R, N>),
        )
        .with_state(service)
}

impl PlacementServiceError {
    /// HTTP status carried by each domain error kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            PlacementServiceError::AlreadyApplied
            | PlacementServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,
            PlacementServiceError::NotEligible { .. }
            | PlacementServiceError::DeadlinePassed
            | PlacementServiceError::VisitInactive => StatusCode::UNPROCESSABLE_ENTITY,
            PlacementServiceError::UnknownStudent(_)
            | PlacementServiceError::UnknownVisit(_)
            | PlacementServiceError::UnknownApplication(_)
            | PlacementServiceError::UnknownCompany(_)
            | PlacementServiceError::UnknownDepartment(_) => StatusCode::NOT_FOUND,
            PlacementServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            PlacementServiceError::Repository(RepositoryError::Conflict)
            | PlacementServiceError::Repository(RepositoryError::CompanyInUse) => {
                StatusCode::CONFLICT
            }
            PlacementServiceError::Repository(_) | PlacementServiceError::Notice(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn error_response(error: PlacementServiceError) -> Response {
    let status = error.status_code();
    let payload = match &error {
        PlacementServiceError::NotEligible { reasons } => json!({
            "error": error.to_string(),
            "reasons": reasons,
        }),
        _ => json!({ "error": error.to_string() }),
    };
    (status, axum::Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplyRequest {
    pub(crate) student_id: StudentId,
    pub(crate) visit_id: VisitId,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum DecisionKind {
    Selected,
    Rejected,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    pub(crate) decision: DecisionKind,
    #[serde(default)]
    pub(crate) feedback: Option<String>,
    #[serde(default)]
    pub(crate) internship: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    pub(crate) status: Option<ApplicationStatus>,
}

pub(crate) async fn eligibility_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    Path((student_id, visit_id)): Path<(u64, u64)>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NoticePublisher + 'static,
{
    match service.eligibility(StudentId(student_id), VisitId(visit_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn apply_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    axum::Json(request): axum::Json<ApplyRequest>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NoticePublisher + 'static,
{
    let now = Local::now().naive_local();
    match service.apply(request.student_id, request.visit_id, now) {
        Ok(application) => {
            (StatusCode::CREATED, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    Path(application_id): Path<u64>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NoticePublisher + 'static,
{
    match service.get(ApplicationId(application_id)) {
        Ok(application) => {
            (StatusCode::OK, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NoticePublisher + 'static,
{
    match service.applications(query.status) {
        Ok(applications) => {
            let views: Vec<_> = applications
                .iter()
                .map(|application| application.status_view())
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn student_applications_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    Path(student_id): Path<u64>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NoticePublisher + 'static,
{
    match service.student_applications(StudentId(student_id)) {
        Ok(applications) => {
            let views: Vec<_> = applications
                .iter()
                .map(|application| application.status_view())
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decide_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    Path(application_id): Path<u64>,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NoticePublisher + 'static,
{
    let decision = match request.decision {
        DecisionKind::Selected => Decision::Selected {
            internship: request.internship,
        },
        DecisionKind::Rejected => Decision::Rejected {
            feedback: request.feedback,
        },
    };

    let now = Local::now().naive_local();
    match service.decide(ApplicationId(application_id), decision, now) {
        Ok(application) => {
            (StatusCode::OK, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}
