pub mod general;
pub mod payroll;
pub mod payslip;
