// src/repository/mod.rs

use crate::{
    errors::AppResult,
    models::{Employee, EmploymentSnapshot, Payslip, PayslipStatus, Period, PeriodSummary},
};
use async_trait::async_trait;
use uuid::Uuid;

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// Read-only view over the HR store's employees and employment records.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// NotFound unless the employee exists and is ACTIVE.
    async fn get_active_employee(&self, id: Uuid) -> AppResult<Employee>;

    /// Any employee regardless of status, for addressing payslips already issued.
    async fn get_employee(&self, id: Uuid) -> AppResult<Employee>;

    /// NotFound unless the employee has an employment record marked active.
    async fn get_active_employment(&self, employee_id: Uuid) -> AppResult<EmploymentSnapshot>;

    /// ACTIVE employees holding an active employment, optionally restricted to the
    /// given departments (case-insensitive).
    async fn list_active_employees_with_active_employment(
        &self,
        departments: Option<&[String]>,
    ) -> AppResult<Vec<Employee>>;
}

/// Payslip persistence.
///
/// Implementations must keep (employee_id, month, year) unique: `insert` fails with
/// Conflict on a duplicate key. `update` and `delete` are compare-and-set on the
/// status the caller read, failing with Conflict if the record moved in between.
#[async_trait]
pub trait PayslipRepository: Send + Sync {
    async fn ping(&self) -> AppResult<()>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payslip>>;

    async fn find_for_employee(
        &self,
        employee_id: Uuid,
        period: Period,
    ) -> AppResult<Option<Payslip>>;

    async fn insert(&self, payslip: &Payslip) -> AppResult<Payslip>;

    /// Delete `superseded` (if its status is unchanged) and insert `payslip` atomically.
    async fn replace(
        &self,
        superseded: &Payslip,
        payslip: &Payslip,
    ) -> AppResult<Payslip>;

    async fn update(&self, payslip: &Payslip, expected: PayslipStatus) -> AppResult<Payslip>;

    async fn delete(&self, id: Uuid, expected: PayslipStatus) -> AppResult<()>;

    async fn list_for_period(
        &self,
        period: Period,
        status: Option<PayslipStatus>,
    ) -> AppResult<Vec<Payslip>>;

    async fn list_for_employee(&self, employee_id: Uuid) -> AppResult<Vec<Payslip>>;

    async fn summarize_period(&self, period: Period) -> AppResult<PeriodSummary>;
}

/// Case-insensitive department filter shared by the directory adapters.
pub fn department_matches(department: &str, filter: Option<&[String]>) -> bool {
    match filter {
        None => true,
        Some(wanted) if wanted.is_empty() => true,
        Some(wanted) => wanted
            .iter()
            .any(|d| d.trim().eq_ignore_ascii_case(department.trim())),
    }
}
