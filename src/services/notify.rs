// src/services/notify.rs

use crate::{
    errors::AppResult,
    models::{Employee, Payslip},
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

/// Rendered payslip, ready for whatever channel delivers it.
#[derive(Debug, Clone)]
pub struct PayslipSummary {
    pub recipient_name: String,
    pub recipient_email: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl PayslipSummary {
    pub fn render(employee: &Employee, slip: &Payslip, company_name: &str) -> Self {
        let employee_name = employee.full_name();
        Self {
            subject: format!("Your Payslip for {} - {}", slip.period(), company_name),
            text: build_payslip_text(&employee_name, company_name, slip),
            html: build_payslip_html(&employee_name, company_name, slip),
            recipient_name: employee_name,
            recipient_email: employee.email.clone(),
        }
    }
}

/// Delivers payslip summaries to employees.
#[async_trait]
pub trait PayslipNotifier: Send + Sync {
    async fn send_payslip(&self, summary: &PayslipSummary) -> AppResult<()>;
}

/// Used when no SMTP relay is configured: the summary is only logged.
pub struct LogNotifier;

#[async_trait]
impl PayslipNotifier for LogNotifier {
    async fn send_payslip(&self, summary: &PayslipSummary) -> AppResult<()> {
        info!(
            "Payslip ready for {} <{}>: {}",
            summary.recipient_name, summary.recipient_email, summary.subject
        );
        Ok(())
    }
}

fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

fn build_payslip_html(employee_name: &str, company_name: &str, slip: &Payslip) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <style>
    body {{ font-family: Arial, sans-serif; background: #f4f4f4; color: #333; }}
    .container {{ max-width: 600px; margin: 30px auto; background: #fff; border-radius: 8px; overflow: hidden; }}
    .header {{ background: #1a56db; color: #fff; padding: 24px 32px; }}
    .body {{ padding: 24px 32px; }}
    table {{ width: 100%; border-collapse: collapse; margin-bottom: 16px; }}
    td {{ padding: 8px 4px; border-bottom: 1px solid #f1f1f1; }}
    td:last-child {{ text-align: right; font-weight: 600; }}
    .total-row td {{ color: #1a56db; border-top: 2px solid #1a56db; }}
    .deductions td {{ color: #dc2626; }}
  </style>
</head>
<body>
<div class="container">
  <div class="header">
    <h1>{company_name}</h1>
    <p>Payslip for {period}</p>
  </div>
  <div class="body">
    <p>Dear <strong>{employee_name}</strong>,</p>
    <p>Your salary for <strong>{period}</strong> has been paid.</p>

    <h2>Earnings</h2>
    <table>
      <tr><td>Base Salary</td><td>{base_salary}</td></tr>
      <tr><td>House Allowance</td><td>{house}</td></tr>
      <tr><td>Transport Allowance</td><td>{transport}</td></tr>
      <tr class="total-row"><td>Gross Salary</td><td>{gross_salary}</td></tr>
    </table>

    <h2>Deductions</h2>
    <table class="deductions">
      <tr><td>Income Tax</td><td>- {tax}</td></tr>
      <tr><td>Pension</td><td>- {pension}</td></tr>
      <tr><td>Medical Insurance</td><td>- {medical}</td></tr>
      <tr><td>Other</td><td>- {other}</td></tr>
      <tr class="total-row"><td>Total Deductions</td><td>- {total_deductions}</td></tr>
    </table>

    <h2>Net Pay</h2>
    <table>
      <tr class="total-row"><td>Net Salary</td><td>{net_salary}</td></tr>
    </table>
  </div>
</div>
</body>
</html>"#,
        company_name = company_name,
        period = slip.period(),
        employee_name = employee_name,
        base_salary = format_amount(slip.base_salary),
        house = format_amount(slip.house_amount),
        transport = format_amount(slip.transport_amount),
        gross_salary = format_amount(slip.gross_salary),
        tax = format_amount(slip.employee_tax),
        pension = format_amount(slip.pension_amount),
        medical = format_amount(slip.medical_insurance),
        other = format_amount(slip.other_tax),
        total_deductions = format_amount(slip.total_deductions),
        net_salary = format_amount(slip.net_salary),
    )
}

fn build_payslip_text(employee_name: &str, company_name: &str, slip: &Payslip) -> String {
    format!(
        "Dear {employee_name},\n\n\
        Your salary for {period} has been paid by {company_name}.\n\n\
        EARNINGS\n\
        Base Salary:          {base_salary}\n\
        House Allowance:      {house}\n\
        Transport Allowance:  {transport}\n\
        Gross Salary:         {gross_salary}\n\n\
        DEDUCTIONS\n\
        Income Tax:           {tax}\n\
        Pension:              {pension}\n\
        Medical Insurance:    {medical}\n\
        Other:                {other}\n\
        Total Deductions:     {total_deductions}\n\n\
        NET PAY:              {net_salary}\n\n\
        This is an automated message from {company_name}'s payroll system.",
        employee_name = employee_name,
        period = slip.period(),
        company_name = company_name,
        base_salary = format_amount(slip.base_salary),
        house = format_amount(slip.house_amount),
        transport = format_amount(slip.transport_amount),
        gross_salary = format_amount(slip.gross_salary),
        tax = format_amount(slip.employee_tax),
        pension = format_amount(slip.pension_amount),
        medical = format_amount(slip.medical_insurance),
        other = format_amount(slip.other_tax),
        total_deductions = format_amount(slip.total_deductions),
        net_salary = format_amount(slip.net_salary),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{EmployeeStatus, Period},
        services::calculator::PayslipCalculator,
    };
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn summary_carries_every_amount() {
        let employee = Employee {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            email: "ada@example.com".to_string(),
            status: EmployeeStatus::Active,
        };
        let period = Period::new(4, 2025).unwrap();
        let breakdown = PayslipCalculator::default()
            .calculate(dec!(100000), period)
            .unwrap();
        let slip = Payslip::pending(employee.id, period, breakdown);

        let summary = PayslipSummary::render(&employee, &slip, "Acme");

        assert_eq!(summary.subject, "Your Payslip for 2025-04 - Acme");
        assert_eq!(summary.recipient_name, "Ada Obi");
        assert_eq!(summary.recipient_email, "ada@example.com");
        assert!(summary.text.contains("Gross Salary:         125000.00"));
        assert!(summary.text.contains("NET PAY:              95500.00"));
        assert!(summary.html.contains("<td>- 19000.00</td>"));
    }
}
