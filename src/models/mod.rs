// src/models/mod.rs

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// ─── Period ───────────────────────────────────────────────────────────────────

pub const MIN_PAYROLL_YEAR: i32 = 2020;

/// A payroll period: one calendar month of one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    pub month: i32,
    pub year: i32,
}

impl Period {
    pub fn new(month: i32, year: i32) -> AppResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::Validation(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        if year < MIN_PAYROLL_YEAR {
            return Err(AppError::Validation(format!(
                "Year must be {} or later, got {}",
                MIN_PAYROLL_YEAR, year
            )));
        }
        Ok(Self { month, year })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ─── Employee (read-only, owned by the HR store) ──────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "employee_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    Terminated,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: EmployeeStatus,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The employment record currently marked active for an employee.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EmploymentSnapshot {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub department: String,
    pub position: String,
    pub base_salary: Decimal,
    pub is_active: bool,
}

// ─── Payslip ──────────────────────────────────────────────────────────────────

// Postgres enum, same pattern as the other status columns: type_name on the enum
// and the variants stored upper-case.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq, Hash)]
#[sqlx(type_name = "payslip_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayslipStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl PayslipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayslipStatus::Pending => "PENDING",
            PayslipStatus::Approved => "APPROVED",
            PayslipStatus::Rejected => "REJECTED",
            PayslipStatus::Paid => "PAID",
        }
    }
}

impl fmt::Display for PayslipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monetary components derived from a base salary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayslipBreakdown {
    pub base_salary: Decimal,
    pub house_amount: Decimal,
    pub transport_amount: Decimal,
    pub gross_salary: Decimal,
    pub employee_tax: Decimal,
    pub pension_amount: Decimal,
    pub medical_insurance: Decimal,
    pub other_tax: Decimal,
    pub total_deductions: Decimal,
    pub net_salary: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Payslip {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub base_salary: Decimal,
    pub house_amount: Decimal,
    pub transport_amount: Decimal,
    pub gross_salary: Decimal,
    pub employee_tax: Decimal,
    pub pension_amount: Decimal,
    pub medical_insurance: Decimal,
    pub other_tax: Decimal,
    pub total_deductions: Decimal,
    pub net_salary: Decimal,
    pub status: PayslipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl Payslip {
    /// A fresh PENDING payslip for `employee_id` in `period`.
    pub fn pending(employee_id: Uuid, period: Period, breakdown: PayslipBreakdown) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            employee_id,
            month: period.month,
            year: period.year,
            base_salary: breakdown.base_salary,
            house_amount: breakdown.house_amount,
            transport_amount: breakdown.transport_amount,
            gross_salary: breakdown.gross_salary,
            employee_tax: breakdown.employee_tax,
            pension_amount: breakdown.pension_amount,
            medical_insurance: breakdown.medical_insurance,
            other_tax: breakdown.other_tax,
            total_deductions: breakdown.total_deductions,
            net_salary: breakdown.net_salary,
            status: PayslipStatus::Pending,
            created_at: now,
            updated_at: now,
            approved_at: None,
        }
    }

    pub fn period(&self) -> Period {
        Period {
            month: self.month,
            year: self.year,
        }
    }

    pub fn apply_breakdown(&mut self, breakdown: PayslipBreakdown) {
        self.base_salary = breakdown.base_salary;
        self.house_amount = breakdown.house_amount;
        self.transport_amount = breakdown.transport_amount;
        self.gross_salary = breakdown.gross_salary;
        self.employee_tax = breakdown.employee_tax;
        self.pension_amount = breakdown.pension_amount;
        self.medical_insurance = breakdown.medical_insurance;
        self.other_tax = breakdown.other_tax;
        self.total_deductions = breakdown.total_deductions;
        self.net_salary = breakdown.net_salary;
    }
}

// ─── Requests ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct GeneratePayslipRequest {
    pub employee_id: Uuid,
    pub month: i32,
    pub year: i32,
    #[serde(default)]
    pub force_regenerate: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenerateBatchRequest {
    pub month: i32,
    pub year: i32,
    /// Explicit targets; when absent or empty every active employee is payrolled
    #[serde(default)]
    pub employee_ids: Option<Vec<Uuid>>,
    /// Only used when `employee_ids` is absent
    #[serde(default)]
    pub departments: Option<Vec<String>>,
    #[serde(default)]
    pub force_regenerate: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PeriodRequest {
    pub month: i32,
    pub year: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PeriodQuery {
    pub month: i32,
    pub year: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPayslipsQuery {
    pub month: i32,
    pub year: i32,
    /// PENDING, APPROVED, REJECTED or PAID
    pub status: Option<PayslipStatus>,
}

/// Edits allowed on a PENDING payslip. Every derived amount is recomputed.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePayslipRequest {
    pub base_salary: Option<Decimal>,
    pub other_tax: Option<Decimal>,
}

// ─── Responses ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenerationFailure {
    pub employee_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct BatchGenerationReport {
    pub generated: Vec<Payslip>,
    /// Employees that already had a payslip for the period and were left untouched
    pub already_existing: Vec<Uuid>,
    pub failures: Vec<GenerationFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PeriodSummary {
    pub month: i32,
    pub year: i32,
    pub payslip_count: i64,
    pub total_gross: Decimal,
    pub total_net: Decimal,
    pub total_deductions: Decimal,
}
