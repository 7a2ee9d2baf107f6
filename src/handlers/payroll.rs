// src/handlers/payroll.rs

use crate::{
    errors::{AppError, AppResult},
    models::{
        BatchGenerationReport, GenerateBatchRequest, GeneratePayslipRequest, Payslip,
        PeriodQuery, PeriodRequest, PeriodSummary, Period,
    },
    services::payroll::GenerationOutcome,
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

/// Generate the payslip of one employee for a period
#[utoipa::path(
    post,
    path = "/api/v1/payroll/generate",
    request_body = GeneratePayslipRequest,
    responses(
        (status = 201, description = "Payslip generated", body = Payslip),
        (status = 400, description = "Invalid month or year"),
        (status = 404, description = "Employee or active employment not found"),
        (status = 409, description = "Payslip already exists for this period"),
    ),
    tag = "Payroll"
)]
pub async fn generate_payslip(
    State(state): State<AppState>,
    Json(body): Json<GeneratePayslipRequest>,
) -> AppResult<(StatusCode, Json<Payslip>)> {
    let period = Period::new(body.month, body.year)?;

    match state
        .payroll
        .generate_for_employee(body.employee_id, period, body.force_regenerate)
        .await?
    {
        GenerationOutcome::Generated(payslip) => Ok((StatusCode::CREATED, Json(payslip))),
        GenerationOutcome::AlreadyExists(existing) => Err(AppError::Conflict(format!(
            "Payslip {} already exists for employee {} in {}; set force_regenerate to replace it",
            existing.id, body.employee_id, period
        ))),
    }
}

/// Generate payslips for many employees at once.
/// Employees that fail are reported individually and never abort the run.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/generate/batch",
    request_body = GenerateBatchRequest,
    responses(
        (status = 200, description = "Batch generation report", body = BatchGenerationReport),
        (status = 400, description = "Invalid month or year"),
    ),
    tag = "Payroll"
)]
pub async fn generate_batch(
    State(state): State<AppState>,
    Json(body): Json<GenerateBatchRequest>,
) -> AppResult<Json<BatchGenerationReport>> {
    let period = Period::new(body.month, body.year)?;

    let report = state
        .payroll
        .generate_for_period(
            period,
            body.employee_ids,
            body.departments,
            body.force_regenerate,
        )
        .await?;

    Ok(Json(report))
}

/// Approve every pending payslip of a period
#[utoipa::path(
    post,
    path = "/api/v1/payroll/approve",
    request_body = PeriodRequest,
    responses(
        (status = 200, description = "Payslips approved (may be empty)", body = Vec<Payslip>),
        (status = 400, description = "Invalid month or year"),
    ),
    tag = "Payroll"
)]
pub async fn approve_period(
    State(state): State<AppState>,
    Json(body): Json<PeriodRequest>,
) -> AppResult<Json<Vec<Payslip>>> {
    let period = Period::new(body.month, body.year)?;
    let approved = state.payroll.approve_period(period).await?;
    Ok(Json(approved))
}

/// Payslip count and totals for a period
#[utoipa::path(
    get,
    path = "/api/v1/payroll/summary",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Period totals", body = PeriodSummary),
        (status = 400, description = "Invalid month or year"),
    ),
    tag = "Payroll"
)]
pub async fn period_summary(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<PeriodSummary>> {
    let period = Period::new(query.month, query.year)?;
    let summary = state.payroll.summarize_period(period).await?;
    Ok(Json(summary))
}
