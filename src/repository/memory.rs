// src/repository/memory.rs

use crate::{
    errors::{AppError, AppResult},
    models::{
        Employee, EmployeeStatus, EmploymentSnapshot, Payslip, PayslipStatus, Period,
        PeriodSummary,
    },
    repository::{EmployeeDirectory, PayslipRepository, department_matches},
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};
use uuid::Uuid;

/// In-process HR store and payslip table. Every operation holds one lock, so
/// check-and-insert on the (employee, month, year) key is atomic.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    employees: Vec<Employee>,
    employments: Vec<EmploymentSnapshot>,
    payslips: HashMap<Uuid, Payslip>,
}

impl Tables {
    fn key_taken(&self, payslip: &Payslip) -> bool {
        self.payslips.values().any(|p| {
            p.employee_id == payslip.employee_id
                && p.month == payslip.month
                && p.year == payslip.year
        })
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::Internal("in-memory store lock poisoned".to_string())
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.inner.lock().map_err(poisoned)
    }

    /// Adds an ACTIVE employee, with an active employment when `department` is given.
    pub fn add_employee(
        &self,
        first_name: &str,
        last_name: &str,
        department: Option<&str>,
        base_salary: Decimal,
    ) -> Employee {
        let employee = Employee {
            id: Uuid::new_v4(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: format!(
                "{}.{}@example.com",
                first_name.to_lowercase(),
                last_name.to_lowercase()
            ),
            status: EmployeeStatus::Active,
        };
        let mut tables = self.inner.lock().unwrap();
        tables.employees.push(employee.clone());
        if let Some(department) = department {
            tables.employments.push(EmploymentSnapshot {
                id: Uuid::new_v4(),
                employee_id: employee.id,
                department: department.to_string(),
                position: "Staff".to_string(),
                base_salary,
                is_active: true,
            });
        }
        employee
    }

    pub fn set_employee_status(&self, employee_id: Uuid, status: EmployeeStatus) {
        let mut tables = self.inner.lock().unwrap();
        for employee in tables.employees.iter_mut().filter(|e| e.id == employee_id) {
            employee.status = status;
        }
    }

    pub fn set_base_salary(&self, employee_id: Uuid, base_salary: Decimal) {
        let mut tables = self.inner.lock().unwrap();
        for employment in tables
            .employments
            .iter_mut()
            .filter(|e| e.employee_id == employee_id && e.is_active)
        {
            employment.base_salary = base_salary;
        }
    }

    pub fn payslip_count(&self) -> usize {
        self.inner.lock().unwrap().payslips.len()
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryStore {
    async fn get_active_employee(&self, id: Uuid) -> AppResult<Employee> {
        self.lock()?
            .employees
            .iter()
            .find(|e| e.id == id && e.status == EmployeeStatus::Active)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Active employee {} not found", id)))
    }

    async fn get_employee(&self, id: Uuid) -> AppResult<Employee> {
        self.lock()?
            .employees
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id)))
    }

    async fn get_active_employment(&self, employee_id: Uuid) -> AppResult<EmploymentSnapshot> {
        self.lock()?
            .employments
            .iter()
            .find(|e| e.employee_id == employee_id && e.is_active)
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No active employment found for employee {}",
                    employee_id
                ))
            })
    }

    async fn list_active_employees_with_active_employment(
        &self,
        departments: Option<&[String]>,
    ) -> AppResult<Vec<Employee>> {
        let tables = self.lock()?;
        Ok(tables
            .employees
            .iter()
            .filter(|e| e.status == EmployeeStatus::Active)
            .filter(|e| {
                tables.employments.iter().any(|m| {
                    m.employee_id == e.id
                        && m.is_active
                        && department_matches(&m.department, departments)
                })
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PayslipRepository for InMemoryStore {
    async fn ping(&self) -> AppResult<()> {
        self.lock().map(|_| ())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payslip>> {
        Ok(self.lock()?.payslips.get(&id).cloned())
    }

    async fn find_for_employee(
        &self,
        employee_id: Uuid,
        period: Period,
    ) -> AppResult<Option<Payslip>> {
        Ok(self
            .lock()?
            .payslips
            .values()
            .find(|p| p.employee_id == employee_id && p.period() == period)
            .cloned())
    }

    async fn insert(&self, payslip: &Payslip) -> AppResult<Payslip> {
        let mut tables = self.lock()?;
        if tables.key_taken(payslip) {
            return Err(AppError::Conflict(format!(
                "Payslip already exists for employee {} in {}",
                payslip.employee_id,
                payslip.period()
            )));
        }
        tables.payslips.insert(payslip.id, payslip.clone());
        Ok(payslip.clone())
    }

    async fn replace(&self, superseded: &Payslip, payslip: &Payslip) -> AppResult<Payslip> {
        let mut tables = self.lock()?;
        match tables.payslips.get(&superseded.id) {
            Some(current) if current.status == superseded.status => {}
            _ => {
                return Err(AppError::Conflict(format!(
                    "Payslip {} is no longer {}; it was modified concurrently",
                    superseded.id, superseded.status
                )));
            }
        }
        tables.payslips.remove(&superseded.id);
        if tables.key_taken(payslip) {
            tables.payslips.insert(superseded.id, superseded.clone());
            return Err(AppError::Conflict(format!(
                "Payslip already exists for employee {} in {}",
                payslip.employee_id,
                payslip.period()
            )));
        }
        tables.payslips.insert(payslip.id, payslip.clone());
        Ok(payslip.clone())
    }

    async fn update(&self, payslip: &Payslip, expected: PayslipStatus) -> AppResult<Payslip> {
        let mut tables = self.lock()?;
        match tables.payslips.get_mut(&payslip.id) {
            Some(current) if current.status == expected => {
                *current = payslip.clone();
                Ok(payslip.clone())
            }
            _ => Err(AppError::Conflict(format!(
                "Payslip {} is no longer {}; it was modified concurrently",
                payslip.id, expected
            ))),
        }
    }

    async fn delete(&self, id: Uuid, expected: PayslipStatus) -> AppResult<()> {
        let mut tables = self.lock()?;
        match tables.payslips.get(&id) {
            Some(current) if current.status == expected => {
                tables.payslips.remove(&id);
                Ok(())
            }
            _ => Err(AppError::Conflict(format!(
                "Payslip {} is no longer {}; it was modified concurrently",
                id, expected
            ))),
        }
    }

    async fn list_for_period(
        &self,
        period: Period,
        status: Option<PayslipStatus>,
    ) -> AppResult<Vec<Payslip>> {
        let mut payslips: Vec<Payslip> = self
            .lock()?
            .payslips
            .values()
            .filter(|p| p.period() == period)
            .filter(|p| status.is_none_or(|s| p.status == s))
            .cloned()
            .collect();
        payslips.sort_by_key(|p| (p.created_at, p.id));
        Ok(payslips)
    }

    async fn list_for_employee(&self, employee_id: Uuid) -> AppResult<Vec<Payslip>> {
        let mut payslips: Vec<Payslip> = self
            .lock()?
            .payslips
            .values()
            .filter(|p| p.employee_id == employee_id)
            .cloned()
            .collect();
        payslips.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
        Ok(payslips)
    }

    async fn summarize_period(&self, period: Period) -> AppResult<PeriodSummary> {
        let tables = self.lock()?;
        let mut summary = PeriodSummary {
            month: period.month,
            year: period.year,
            payslip_count: 0,
            total_gross: Decimal::ZERO,
            total_net: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
        };
        for payslip in tables.payslips.values().filter(|p| p.period() == period) {
            summary.payslip_count += 1;
            summary.total_gross += payslip.gross_salary;
            summary.total_net += payslip.net_salary;
            summary.total_deductions += payslip.total_deductions;
        }
        Ok(summary)
    }
}
