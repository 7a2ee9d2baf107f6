// src/services/payroll.rs

use crate::{
    errors::{AppError, AppResult},
    models::{
        BatchGenerationReport, GenerationFailure, Payslip, PayslipStatus, Period, PeriodSummary,
        UpdatePayslipRequest,
    },
    repository::{EmployeeDirectory, PayslipRepository},
    services::{
        calculator::PayslipCalculator,
        lifecycle::{self, PayslipAction},
        notify::{PayslipNotifier, PayslipSummary},
    },
};
use chrono::Utc;
use std::{collections::HashSet, sync::Arc};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Result of generating one employee's payslip.
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    Generated(Payslip),
    /// A payslip for the period was already there and force was not requested
    AlreadyExists(Payslip),
}

pub struct PayrollService {
    directory: Arc<dyn EmployeeDirectory>,
    payslips: Arc<dyn PayslipRepository>,
    calculator: PayslipCalculator,
    notifier: Arc<dyn PayslipNotifier>,
    company_name: String,
}

impl PayrollService {
    pub fn new(
        directory: Arc<dyn EmployeeDirectory>,
        payslips: Arc<dyn PayslipRepository>,
        calculator: PayslipCalculator,
        notifier: Arc<dyn PayslipNotifier>,
        company_name: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            payslips,
            calculator,
            notifier,
            company_name: company_name.into(),
        }
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.payslips.ping().await
    }

    // ─── Generation ───────────────────────────────────────────────────────────

    /// Generate the payslip of one employee for `period`.
    ///
    /// With `force`, an existing PENDING, REJECTED or APPROVED payslip is replaced by a
    /// freshly calculated PENDING one. PAID payslips are never replaced.
    pub async fn generate_for_employee(
        &self,
        employee_id: Uuid,
        period: Period,
        force: bool,
    ) -> AppResult<GenerationOutcome> {
        let employee = self.directory.get_active_employee(employee_id).await?;
        let employment = self.directory.get_active_employment(employee.id).await?;

        let existing = self.payslips.find_for_employee(employee.id, period).await?;
        if let Some(existing) = &existing {
            if !force {
                info!(
                    "Payslip {} already exists for employee {} in {}",
                    existing.id, employee.id, period
                );
                return Ok(GenerationOutcome::AlreadyExists(existing.clone()));
            }
            lifecycle::next_status(existing.status, PayslipAction::Supersede)?;
        }

        let breakdown = self.calculator.calculate(employment.base_salary, period)?;
        let payslip = Payslip::pending(employee.id, period, breakdown);

        let saved = match existing {
            Some(superseded) => {
                let saved = self.payslips.replace(&superseded, &payslip).await?;
                info!(
                    "Regenerated payslip for employee {} in {} (replaced {} in status {})",
                    employee.id, period, superseded.id, superseded.status
                );
                saved
            }
            None => match self.payslips.insert(&payslip).await {
                Ok(saved) => saved,
                Err(AppError::Conflict(msg)) => {
                    // Lost the race against a concurrent generation for the same key
                    return match self.payslips.find_for_employee(employee.id, period).await? {
                        Some(winner) => Ok(GenerationOutcome::AlreadyExists(winner)),
                        None => Err(AppError::Conflict(msg)),
                    };
                }
                Err(e) => return Err(e),
            },
        };

        info!(
            "Generated payslip {} for employee {} in {}: gross {} net {}",
            saved.id, employee.id, period, saved.gross_salary, saved.net_salary
        );
        Ok(GenerationOutcome::Generated(saved))
    }

    /// Generate payslips for a set of employees.
    ///
    /// Targets are `employee_ids` when given, otherwise every active employee with an
    /// active employment in one of `departments` (all departments when `None`).
    /// One employee's failure never aborts the batch.
    pub async fn generate_for_period(
        &self,
        period: Period,
        employee_ids: Option<Vec<Uuid>>,
        departments: Option<Vec<String>>,
        force: bool,
    ) -> AppResult<BatchGenerationReport> {
        let targets = self.resolve_targets(employee_ids, departments).await?;
        info!(
            "Generating payslips for {} employees in {} (force: {})",
            targets.len(),
            period,
            force
        );

        let mut report = BatchGenerationReport::default();
        for employee_id in targets {
            match self.generate_for_employee(employee_id, period, force).await {
                Ok(GenerationOutcome::Generated(payslip)) => report.generated.push(payslip),
                Ok(GenerationOutcome::AlreadyExists(_)) => {
                    report.already_existing.push(employee_id)
                }
                Err(e) => {
                    if e.is_recoverable() {
                        warn!("Skipping employee {} for {}: {}", employee_id, period, e);
                    } else {
                        error!(
                            "Failed to generate payslip for employee {} in {}: {}",
                            employee_id, period, e
                        );
                    }
                    report.failures.push(GenerationFailure {
                        employee_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Payroll generation for {} complete: {} generated, {} already existing, {} failed",
            period,
            report.generated.len(),
            report.already_existing.len(),
            report.failures.len()
        );
        Ok(report)
    }

    async fn resolve_targets(
        &self,
        employee_ids: Option<Vec<Uuid>>,
        departments: Option<Vec<String>>,
    ) -> AppResult<Vec<Uuid>> {
        if let Some(ids) = employee_ids.filter(|ids| !ids.is_empty()) {
            let mut seen = HashSet::new();
            return Ok(ids.into_iter().filter(|id| seen.insert(*id)).collect());
        }

        let employees = self
            .directory
            .list_active_employees_with_active_employment(departments.as_deref())
            .await?;
        Ok(employees.into_iter().map(|e| e.id).collect())
    }

    // ─── Lifecycle ────────────────────────────────────────────────────────────

    pub async fn get_payslip(&self, id: Uuid) -> AppResult<Payslip> {
        self.payslips
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Payslip {} not found", id)))
    }

    async fn apply(&self, id: Uuid, action: PayslipAction) -> AppResult<Payslip> {
        let current = self.get_payslip(id).await?;
        let next = lifecycle::transition(&current, action, Utc::now())?;
        let saved = self.payslips.update(&next, current.status).await?;
        info!(
            "Payslip {} moved from {} to {}",
            saved.id, current.status, saved.status
        );
        Ok(saved)
    }

    pub async fn approve_payslip(&self, id: Uuid) -> AppResult<Payslip> {
        self.apply(id, PayslipAction::Approve).await
    }

    pub async fn reject_payslip(&self, id: Uuid) -> AppResult<Payslip> {
        self.apply(id, PayslipAction::Reject).await
    }

    /// Mark an approved payslip as paid and send the employee their payslip.
    /// Delivery problems are logged; the payslip stays PAID.
    pub async fn mark_paid(&self, id: Uuid) -> AppResult<Payslip> {
        let paid = self.apply(id, PayslipAction::MarkPaid).await?;
        self.notify_paid(&paid).await;
        Ok(paid)
    }

    async fn notify_paid(&self, payslip: &Payslip) {
        let employee = match self.directory.get_employee(payslip.employee_id).await {
            Ok(employee) => employee,
            Err(e) => {
                warn!(
                    "Not sending payslip {} to employee {}: {}",
                    payslip.id, payslip.employee_id, e
                );
                return;
            }
        };

        let summary = PayslipSummary::render(&employee, payslip, &self.company_name);
        if let Err(e) = self.notifier.send_payslip(&summary).await {
            warn!("Payslip notification failed for {}: {}", employee.email, e);
        }
    }

    /// Approve every PENDING payslip of `period`. Returns the ones that were approved.
    pub async fn approve_period(&self, period: Period) -> AppResult<Vec<Payslip>> {
        let pending = self
            .payslips
            .list_for_period(period, Some(PayslipStatus::Pending))
            .await?;

        let mut approved = Vec::with_capacity(pending.len());
        for payslip in pending {
            let result = match lifecycle::transition(&payslip, PayslipAction::Approve, Utc::now()) {
                Ok(next) => self.payslips.update(&next, payslip.status).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(saved) => approved.push(saved),
                Err(e) => warn!("Could not approve payslip {}: {}", payslip.id, e),
            }
        }

        info!("Approved {} payslips for {}", approved.len(), period);
        Ok(approved)
    }

    // ─── Editing & queries ────────────────────────────────────────────────────

    /// Change the base salary and/or other deduction of a PENDING payslip.
    pub async fn update_payslip(
        &self,
        id: Uuid,
        changes: UpdatePayslipRequest,
    ) -> AppResult<Payslip> {
        let current = self.get_payslip(id).await?;
        lifecycle::ensure_editable(&current)?;

        let breakdown = self.calculator.calculate_with_other(
            changes.base_salary.unwrap_or(current.base_salary),
            changes.other_tax.unwrap_or(current.other_tax),
        )?;

        let mut next = current.clone();
        next.apply_breakdown(breakdown);
        next.updated_at = Utc::now();

        let saved = self.payslips.update(&next, current.status).await?;
        info!("Updated payslip {}: net {}", saved.id, saved.net_salary);
        Ok(saved)
    }

    pub async fn delete_payslip(&self, id: Uuid) -> AppResult<()> {
        let current = self.get_payslip(id).await?;
        lifecycle::ensure_deletable(&current)?;
        self.payslips.delete(id, current.status).await?;
        info!("Deleted payslip {} ({})", id, current.status);
        Ok(())
    }

    pub async fn list_payslips(
        &self,
        period: Period,
        status: Option<PayslipStatus>,
    ) -> AppResult<Vec<Payslip>> {
        self.payslips.list_for_period(period, status).await
    }

    pub async fn list_employee_payslips(&self, employee_id: Uuid) -> AppResult<Vec<Payslip>> {
        self.payslips.list_for_employee(employee_id).await
    }

    pub async fn summarize_period(&self, period: Period) -> AppResult<PeriodSummary> {
        self.payslips.summarize_period(period).await
    }
}
