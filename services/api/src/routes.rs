use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use campus_placement::error::AppError;
use campus_placement::placements::applications::{
    placement_router, NoticePublisher, PlacementRepository, PlacementService,
    PlacementServiceError,
};
use campus_placement::placements::reports::{
    branch_totals, branch_year_matrix, company_stats, company_stats_csv, filter_records,
    placement_summary, sort_company_stats, year_totals, BranchTotal, BranchYearMatrix,
    CompanySortKey, CompanyStat, PlacementRecordView, PlacementSummary, RecordFilter,
    SortDirection, YearTotal,
};

use crate::infra::AppState;

#[derive(Debug, Deserialize)]
pub(crate) struct CompanyStatsQuery {
    #[serde(default)]
    pub(crate) sort: Option<CompanySortKey>,
    #[serde(default)]
    pub(crate) order: Option<SortDirection>,
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct BranchYearResponse {
    pub(crate) matrix: BranchYearMatrix,
    pub(crate) branch_totals: Vec<BranchTotal>,
    pub(crate) year_totals: Vec<YearTotal>,
}

pub(crate) fn with_portal_routes<R, N>(service: Arc<PlacementService<R, N>>) -> axum::Router
where
    R: PlacementRepository + 'static,
    N: NoticePublisher + 'static,
{
    placement_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/reports/placement-summary",
            axum::routing::get(placement_summary_endpoint),
        )
        .route(
            "/api/v1/reports/company-stats",
            axum::routing::get(company_stats_endpoint),
        )
        .route(
            "/api/v1/reports/company-stats/export",
            axum::routing::get(company_stats_export_endpoint),
        )
        .route(
            "/api/v1/reports/branch-year",
            axum::routing::get(branch_year_endpoint),
        )
        .route("/api/v1/records", axum::routing::get(records_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn placement_summary_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<PlacementSummary>, AppError> {
    let students = state
        .repository
        .students()
        .map_err(PlacementServiceError::from)?;
    Ok(Json(placement_summary(&students)))
}

fn sorted_company_stats(
    state: &AppState,
    query: &CompanyStatsQuery,
) -> Result<Vec<CompanyStat>, AppError> {
    let companies = state
        .repository
        .companies()
        .map_err(PlacementServiceError::from)?;
    let visits = state
        .repository
        .visits()
        .map_err(PlacementServiceError::from)?;
    let applications = state
        .repository
        .applications()
        .map_err(PlacementServiceError::from)?;
    let records = state
        .repository
        .records()
        .map_err(PlacementServiceError::from)?;

    let mut stats = company_stats(&companies, &visits, &applications, &records);
    if let Some(sort) = query.sort {
        let order = query.order.unwrap_or(SortDirection::Ascending);
        sort_company_stats(&mut stats, sort, order);
    }
    Ok(stats)
}

pub(crate) async fn company_stats_endpoint(
    Extension(state): Extension<AppState>,
    axum::extract::Query(query): axum::extract::Query<CompanyStatsQuery>,
) -> Result<Json<Vec<CompanyStat>>, AppError> {
    Ok(Json(sorted_company_stats(&state, &query)?))
}

pub(crate) async fn company_stats_export_endpoint(
    Extension(state): Extension<AppState>,
    axum::extract::Query(query): axum::extract::Query<CompanyStatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let stats = sorted_company_stats(&state, &query)?;
    let csv = company_stats_csv(&stats)?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"placement_stats.csv\"",
            ),
        ],
        csv,
    ))
}

pub(crate) async fn branch_year_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<BranchYearResponse>, AppError> {
    let records = state
        .repository
        .records()
        .map_err(PlacementServiceError::from)?;
    let matrix = branch_year_matrix(&records);
    let branch_totals = branch_totals(&matrix);
    let year_totals = year_totals(&matrix);
    Ok(Json(BranchYearResponse {
        matrix,
        branch_totals,
        year_totals,
    }))
}

pub(crate) async fn records_endpoint(
    Extension(state): Extension<AppState>,
    axum::extract::Query(filter): axum::extract::Query<RecordFilter>,
) -> Result<Json<Vec<PlacementRecordView>>, AppError> {
    let records = state
        .repository
        .records()
        .map_err(PlacementServiceError::from)?;
    let students = state
        .repository
        .students()
        .map_err(PlacementServiceError::from)?;
    let companies = state
        .repository
        .companies()
        .map_err(PlacementServiceError::from)?;
    Ok(Json(filter_records(
        &records, &students, &companies, &filter,
    )))
}
