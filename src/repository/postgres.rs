// src/repository/postgres.rs

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
use sqlx::{FromRow, PgPool, postgres::PgExecutor};
use uuid::Uuid;

const PAYSLIP_COLUMNS: &str = "id, employee_id, month, year, base_salary, house_amount, \
    transport_amount, gross_salary, employee_tax, pension_amount, medical_insurance, \
    other_tax, total_deductions, net_salary, status, created_at, updated_at, approved_at";

// ─── Employee directory ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgEmployeeDirectory {
    db: PgPool,
}

impl PgEmployeeDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(FromRow)]
struct ActiveEmployeeRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    status: EmployeeStatus,
    department: String,
}

#[async_trait]
impl EmployeeDirectory for PgEmployeeDirectory {
    async fn get_active_employee(&self, id: Uuid) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>(
            "SELECT id, first_name, last_name, email, status
             FROM employees
             WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(EmployeeStatus::Active)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Active employee {} not found", id)))
    }

    async fn get_employee(&self, id: Uuid) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>(
            "SELECT id, first_name, last_name, email, status FROM employees WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id)))
    }

    async fn get_active_employment(&self, employee_id: Uuid) -> AppResult<EmploymentSnapshot> {
        sqlx::query_as::<_, EmploymentSnapshot>(
            "SELECT id, employee_id, department, position, base_salary, is_active
             FROM employments
             WHERE employee_id = $1 AND is_active = true",
        )
        .bind(employee_id)
        .fetch_optional(&self.db)
        .await?
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
        let rows = sqlx::query_as::<_, ActiveEmployeeRow>(
            "SELECT e.id, e.first_name, e.last_name, e.email, e.status, m.department
             FROM employees e
             JOIN employments m ON m.employee_id = e.id AND m.is_active = true
             WHERE e.status = $1
             ORDER BY e.last_name, e.first_name, e.id",
        )
        .bind(EmployeeStatus::Active)
        .fetch_all(&self.db)
        .await?;

        // Department lives on the employment record, so filter after the join.
        Ok(rows
            .into_iter()
            .filter(|row| department_matches(&row.department, departments))
            .map(|row| Employee {
                id: row.id,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                status: row.status,
            })
            .collect())
    }
}

// ─── Payslips ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgPayslipRepository {
    db: PgPool,
}

impl PgPayslipRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_insert_error(err: sqlx::Error, payslip: &Payslip) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(format!(
                "Payslip already exists for employee {} in {}",
                payslip.employee_id,
                payslip.period()
            ))
        }
        _ => AppError::Database(err),
    }
}

fn concurrent_modification(id: Uuid, expected: PayslipStatus) -> AppError {
    AppError::Conflict(format!(
        "Payslip {} is no longer {}; it was modified concurrently",
        id, expected
    ))
}

async fn insert_payslip<'e, E>(executor: E, payslip: &Payslip) -> AppResult<Payslip>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "INSERT INTO payslips ({PAYSLIP_COLUMNS})
         VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18)
         RETURNING {PAYSLIP_COLUMNS}"
    );
    sqlx::query_as::<_, Payslip>(&sql)
        .bind(payslip.id)
        .bind(payslip.employee_id)
        .bind(payslip.month)
        .bind(payslip.year)
        .bind(payslip.base_salary)
        .bind(payslip.house_amount)
        .bind(payslip.transport_amount)
        .bind(payslip.gross_salary)
        .bind(payslip.employee_tax)
        .bind(payslip.pension_amount)
        .bind(payslip.medical_insurance)
        .bind(payslip.other_tax)
        .bind(payslip.total_deductions)
        .bind(payslip.net_salary)
        .bind(payslip.status)
        .bind(payslip.created_at)
        .bind(payslip.updated_at)
        .bind(payslip.approved_at)
        .fetch_one(executor)
        .await
        .map_err(|e| map_insert_error(e, payslip))
}

#[async_trait]
impl PayslipRepository for PgPayslipRepository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payslip>> {
        let sql = format!("SELECT {PAYSLIP_COLUMNS} FROM payslips WHERE id = $1");
        let payslip = sqlx::query_as::<_, Payslip>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(payslip)
    }

    async fn find_for_employee(
        &self,
        employee_id: Uuid,
        period: Period,
    ) -> AppResult<Option<Payslip>> {
        let sql = format!(
            "SELECT {PAYSLIP_COLUMNS} FROM payslips
             WHERE employee_id = $1 AND month = $2 AND year = $3"
        );
        let payslip = sqlx::query_as::<_, Payslip>(&sql)
            .bind(employee_id)
            .bind(period.month)
            .bind(period.year)
            .fetch_optional(&self.db)
            .await?;
        Ok(payslip)
    }

    async fn insert(&self, payslip: &Payslip) -> AppResult<Payslip> {
        insert_payslip(&self.db, payslip).await
    }

    async fn replace(&self, superseded: &Payslip, payslip: &Payslip) -> AppResult<Payslip> {
        let mut tx = self.db.begin().await?;

        let deleted = sqlx::query("DELETE FROM payslips WHERE id = $1 AND status = $2")
            .bind(superseded.id)
            .bind(superseded.status)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            // Dropping the transaction rolls it back
            return Err(concurrent_modification(superseded.id, superseded.status));
        }

        let inserted = insert_payslip(&mut *tx, payslip).await?;
        tx.commit().await?;
        Ok(inserted)
    }

    async fn update(&self, payslip: &Payslip, expected: PayslipStatus) -> AppResult<Payslip> {
        let sql = format!(
            "UPDATE payslips SET
                base_salary = $3, house_amount = $4, transport_amount = $5,
                gross_salary = $6, employee_tax = $7, pension_amount = $8,
                medical_insurance = $9, other_tax = $10, total_deductions = $11,
                net_salary = $12, status = $13, updated_at = $14, approved_at = $15
             WHERE id = $1 AND status = $2
             RETURNING {PAYSLIP_COLUMNS}"
        );
        sqlx::query_as::<_, Payslip>(&sql)
            .bind(payslip.id)
            .bind(expected)
            .bind(payslip.base_salary)
            .bind(payslip.house_amount)
            .bind(payslip.transport_amount)
            .bind(payslip.gross_salary)
            .bind(payslip.employee_tax)
            .bind(payslip.pension_amount)
            .bind(payslip.medical_insurance)
            .bind(payslip.other_tax)
            .bind(payslip.total_deductions)
            .bind(payslip.net_salary)
            .bind(payslip.status)
            .bind(payslip.updated_at)
            .bind(payslip.approved_at)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| concurrent_modification(payslip.id, expected))
    }

    async fn delete(&self, id: Uuid, expected: PayslipStatus) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM payslips WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(expected)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(concurrent_modification(id, expected));
        }
        Ok(())
    }

    async fn list_for_period(
        &self,
        period: Period,
        status: Option<PayslipStatus>,
    ) -> AppResult<Vec<Payslip>> {
        let sql = format!(
            "SELECT {PAYSLIP_COLUMNS} FROM payslips
             WHERE month = $1 AND year = $2 AND ($3::payslip_status IS NULL OR status = $3)
             ORDER BY created_at, id"
        );
        let payslips = sqlx::query_as::<_, Payslip>(&sql)
            .bind(period.month)
            .bind(period.year)
            .bind(status)
            .fetch_all(&self.db)
            .await?;
        Ok(payslips)
    }

    async fn list_for_employee(&self, employee_id: Uuid) -> AppResult<Vec<Payslip>> {
        let sql = format!(
            "SELECT {PAYSLIP_COLUMNS} FROM payslips
             WHERE employee_id = $1
             ORDER BY year DESC, month DESC"
        );
        let payslips = sqlx::query_as::<_, Payslip>(&sql)
            .bind(employee_id)
            .fetch_all(&self.db)
            .await?;
        Ok(payslips)
    }

    async fn summarize_period(&self, period: Period) -> AppResult<PeriodSummary> {
        let (payslip_count, total_gross, total_net, total_deductions) =
            sqlx::query_as::<_, (i64, Decimal, Decimal, Decimal)>(
                "SELECT COUNT(*),
                        COALESCE(SUM(gross_salary), 0),
                        COALESCE(SUM(net_salary), 0),
                        COALESCE(SUM(total_deductions), 0)
                 FROM payslips
                 WHERE month = $1 AND year = $2",
            )
            .bind(period.month)
            .bind(period.year)
            .fetch_one(&self.db)
            .await?;

        Ok(PeriodSummary {
            month: period.month,
            year: period.year,
            payslip_count,
            total_gross,
            total_net,
            total_deductions,
        })
    }
}
