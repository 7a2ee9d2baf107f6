// src/openapi.rs

use crate::models::{
    BatchGenerationReport, GeneratePayslipRequest, GenerateBatchRequest, GenerationFailure,
    Payslip, PayslipStatus, PeriodRequest, PeriodSummary, UpdatePayslipRequest,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll Engine API",
        version = "1.0.0",
        description = "Payslip generation, approval and payment for an HR/payroll backend. \
            Calculates allowances, statutory deductions and income tax from each employee's \
            active employment, keeps one payslip per employee and month, and emails payslips \
            once they are paid.",
        license(name = "MIT")
    ),
    paths(
        // Payroll
        crate::handlers::payroll::generate_payslip,
        crate::handlers::payroll::generate_batch,
        crate::handlers::payroll::approve_period,
        crate::handlers::payroll::period_summary,
        // Payslips
        crate::handlers::payslip::list_payslips,
        crate::handlers::payslip::get_payslip,
        crate::handlers::payslip::update_payslip,
        crate::handlers::payslip::delete_payslip,
        crate::handlers::payslip::approve_payslip,
        crate::handlers::payslip::reject_payslip,
        crate::handlers::payslip::pay_payslip,
        crate::handlers::payslip::list_employee_payslips,
    ),
    components(
        schemas(
            GeneratePayslipRequest, GenerateBatchRequest, PeriodRequest, UpdatePayslipRequest,
            Payslip, PayslipStatus, BatchGenerationReport, GenerationFailure, PeriodSummary,
        )
    ),
    tags(
        (name = "Payroll", description = "Generate and approve payslips for a period"),
        (name = "Payslips", description = "Inspect and move individual payslips through their lifecycle"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/payroll/generate",
            "/api/v1/payroll/generate/batch",
            "/api/v1/payroll/approve",
            "/api/v1/payroll/summary",
            "/api/v1/payslips",
            "/api/v1/payslips/{payslip_id}",
            "/api/v1/payslips/{payslip_id}/approve",
            "/api/v1/payslips/{payslip_id}/reject",
            "/api/v1/payslips/{payslip_id}/pay",
            "/api/v1/employees/{employee_id}/payslips",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }
}
