// src/services/calculator.rs

use crate::{
    errors::{AppError, AppResult},
    models::{PayslipBreakdown, Period},
    services::rates::{DeductionRates, MAX_AMOUNT, round_money},
};
use rust_decimal::Decimal;
use tracing::debug;

/// Derives every monetary component of a payslip from a base salary.
#[derive(Debug, Clone, Default)]
pub struct PayslipCalculator {
    rates: DeductionRates,
}

impl PayslipCalculator {
    pub fn new(rates: DeductionRates) -> Self {
        Self { rates }
    }

    /// Calculate a payslip for `base_salary`. The period is only used for tracing.
    pub fn calculate(&self, base_salary: Decimal, period: Period) -> AppResult<PayslipBreakdown> {
        let breakdown = self.calculate_with_other(base_salary, Decimal::ZERO)?;
        debug!(
            "Calculated payslip for {}: base {} gross {} net {}",
            period, breakdown.base_salary, breakdown.gross_salary, breakdown.net_salary
        );
        Ok(breakdown)
    }

    /// Same as [`calculate`](Self::calculate) with an extra `other_tax` deduction.
    pub fn calculate_with_other(
        &self,
        base_salary: Decimal,
        other_tax: Decimal,
    ) -> AppResult<PayslipBreakdown> {
        if base_salary <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Base salary must be greater than zero".to_string(),
            ));
        }
        if other_tax < Decimal::ZERO {
            return Err(AppError::Validation(
                "Other tax cannot be negative".to_string(),
            ));
        }
        if base_salary > MAX_AMOUNT || other_tax > MAX_AMOUNT {
            return Err(AppError::Validation(format!(
                "Amounts cannot exceed {}",
                MAX_AMOUNT
            )));
        }

        let base_salary = round_money(base_salary);
        let other_tax = round_money(other_tax);

        let house_amount = round_money(base_salary * self.rates.house_rate);
        let transport_amount = round_money(base_salary * self.rates.transport_rate);
        let gross_salary = round_money(base_salary + house_amount + transport_amount);
        if gross_salary > MAX_AMOUNT {
            return Err(AppError::Validation(format!(
                "Gross salary {} exceeds the largest payable amount {}",
                gross_salary, MAX_AMOUNT
            )));
        }

        // Contributions are on base, not gross
        let pension_amount = round_money(base_salary * self.rates.pension_rate);
        let medical_insurance = round_money(base_salary * self.rates.medical_rate);
        let employee_tax = self.rates.progressive_tax(gross_salary);

        let total_deductions =
            round_money(employee_tax + pension_amount + medical_insurance + other_tax);
        let net_salary = round_money(gross_salary - total_deductions);

        if net_salary <= Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "Deductions of {} leave no net salary from gross {}",
                total_deductions, gross_salary
            )));
        }

        Ok(PayslipBreakdown {
            base_salary,
            house_amount,
            transport_amount,
            gross_salary,
            employee_tax,
            pension_amount,
            medical_insurance,
            other_tax,
            total_deductions,
            net_salary,
        })
    }
}
