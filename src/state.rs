use crate::{config::Config, services::payroll::PayrollService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub payroll: Arc<PayrollService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(payroll: PayrollService, config: Config) -> Self {
        Self {
            payroll: Arc::new(payroll),
            config: Arc::new(config),
        }
    }
}
