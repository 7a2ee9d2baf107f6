pub mod calculator;
pub mod email;
pub mod lifecycle;
pub mod notify;
pub mod payroll;
pub mod rates;
