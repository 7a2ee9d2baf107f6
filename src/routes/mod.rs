// src/routes/mod.rs

use crate::{
    handlers::{
        payroll::{approve_period, generate_batch, generate_payslip, period_summary},
        payslip::{
            approve_payslip, delete_payslip, get_payslip, list_employee_payslips, list_payslips,
            pay_payslip, reject_payslip, update_payslip,
        },
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{get, post},
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // ─── Payroll runs ─────────────────────────────────────
        .route("/payroll/generate", post(generate_payslip))
        .route("/payroll/generate/batch", post(generate_batch))
        .route("/payroll/approve", post(approve_period))
        .route("/payroll/summary", get(period_summary))
        // ─── Payslips ─────────────────────────────────────────
        .route("/payslips", get(list_payslips))
        .route(
            "/payslips/{payslip_id}",
            get(get_payslip)
                .patch(update_payslip)
                .delete(delete_payslip),
        )
        .route("/payslips/{payslip_id}/approve", post(approve_payslip))
        .route("/payslips/{payslip_id}/reject", post(reject_payslip))
        .route("/payslips/{payslip_id}/pay", post(pay_payslip))
        // ─── Employees ────────────────────────────────────────
        .route(
            "/employees/{employee_id}/payslips",
            get(list_employee_payslips),
        )
}
