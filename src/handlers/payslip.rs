// src/handlers/payslip.rs

use crate::{
    errors::AppResult,
    models::{ListPayslipsQuery, Payslip, Period, UpdatePayslipRequest},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

/// List the payslips of a period, optionally by status
#[utoipa::path(
    get,
    path = "/api/v1/payslips",
    params(ListPayslipsQuery),
    responses(
        (status = 200, description = "Payslips of the period", body = Vec<Payslip>),
        (status = 400, description = "Invalid month, year or status"),
    ),
    tag = "Payslips"
)]
pub async fn list_payslips(
    State(state): State<AppState>,
    Query(query): Query<ListPayslipsQuery>,
) -> AppResult<Json<Vec<Payslip>>> {
    let period = Period::new(query.month, query.year)?;
    let payslips = state.payroll.list_payslips(period, query.status).await?;
    Ok(Json(payslips))
}

/// Get a single payslip
#[utoipa::path(
    get,
    path = "/api/v1/payslips/{payslip_id}",
    params(("payslip_id" = Uuid, Path, description = "Payslip ID")),
    responses(
        (status = 200, description = "Payslip detail", body = Payslip),
        (status = 404, description = "Payslip not found"),
    ),
    tag = "Payslips"
)]
pub async fn get_payslip(
    State(state): State<AppState>,
    Path(payslip_id): Path<Uuid>,
) -> AppResult<Json<Payslip>> {
    Ok(Json(state.payroll.get_payslip(payslip_id).await?))
}

/// Change the base salary or other deduction of a pending payslip
#[utoipa::path(
    patch,
    path = "/api/v1/payslips/{payslip_id}",
    params(("payslip_id" = Uuid, Path, description = "Payslip ID")),
    request_body = UpdatePayslipRequest,
    responses(
        (status = 200, description = "Payslip recalculated", body = Payslip),
        (status = 400, description = "Invalid amounts"),
        (status = 404, description = "Payslip not found"),
        (status = 409, description = "Payslip is no longer pending"),
    ),
    tag = "Payslips"
)]
pub async fn update_payslip(
    State(state): State<AppState>,
    Path(payslip_id): Path<Uuid>,
    Json(body): Json<UpdatePayslipRequest>,
) -> AppResult<Json<Payslip>> {
    Ok(Json(state.payroll.update_payslip(payslip_id, body).await?))
}

/// Delete a pending or rejected payslip
#[utoipa::path(
    delete,
    path = "/api/v1/payslips/{payslip_id}",
    params(("payslip_id" = Uuid, Path, description = "Payslip ID")),
    responses(
        (status = 204, description = "Payslip deleted"),
        (status = 404, description = "Payslip not found"),
        (status = 409, description = "Approved and paid payslips cannot be deleted"),
    ),
    tag = "Payslips"
)]
pub async fn delete_payslip(
    State(state): State<AppState>,
    Path(payslip_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.payroll.delete_payslip(payslip_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Approve a pending payslip
#[utoipa::path(
    post,
    path = "/api/v1/payslips/{payslip_id}/approve",
    params(("payslip_id" = Uuid, Path, description = "Payslip ID")),
    responses(
        (status = 200, description = "Payslip approved", body = Payslip),
        (status = 404, description = "Payslip not found"),
        (status = 409, description = "Payslip is not pending"),
    ),
    tag = "Payslips"
)]
pub async fn approve_payslip(
    State(state): State<AppState>,
    Path(payslip_id): Path<Uuid>,
) -> AppResult<Json<Payslip>> {
    Ok(Json(state.payroll.approve_payslip(payslip_id).await?))
}

/// Reject a pending payslip
#[utoipa::path(
    post,
    path = "/api/v1/payslips/{payslip_id}/reject",
    params(("payslip_id" = Uuid, Path, description = "Payslip ID")),
    responses(
        (status = 200, description = "Payslip rejected", body = Payslip),
        (status = 404, description = "Payslip not found"),
        (status = 409, description = "Payslip is not pending"),
    ),
    tag = "Payslips"
)]
pub async fn reject_payslip(
    State(state): State<AppState>,
    Path(payslip_id): Path<Uuid>,
) -> AppResult<Json<Payslip>> {
    Ok(Json(state.payroll.reject_payslip(payslip_id).await?))
}

/// Mark an approved payslip as paid and email it to the employee
#[utoipa::path(
    post,
    path = "/api/v1/payslips/{payslip_id}/pay",
    params(("payslip_id" = Uuid, Path, description = "Payslip ID")),
    responses(
        (status = 200, description = "Payslip paid", body = Payslip),
        (status = 404, description = "Payslip not found"),
        (status = 409, description = "Payslip is not approved"),
    ),
    tag = "Payslips"
)]
pub async fn pay_payslip(
    State(state): State<AppState>,
    Path(payslip_id): Path<Uuid>,
) -> AppResult<Json<Payslip>> {
    Ok(Json(state.payroll.mark_paid(payslip_id).await?))
}

/// Payslip history of one employee, newest period first
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}/payslips",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses((status = 200, description = "Employee payslips", body = Vec<Payslip>)),
    tag = "Payslips"
)]
pub async fn list_employee_payslips(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<Vec<Payslip>>> {
    Ok(Json(state.payroll.list_employee_payslips(employee_id).await?))
}
