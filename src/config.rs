// src/config.rs

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_name: String,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub company_name: String,
    /// Payslip emails are only sent when an SMTP relay is configured
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
            company_name: env::var("COMPANY_NAME").unwrap_or_else(|_| "Payroll".to_string()),
            smtp: SmtpConfig::from_env()?,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl SmtpConfig {
    fn from_env() -> Result<Option<Self>> {
        let Ok(host) = env::var("SMTP_HOST") else {
            return Ok(None);
        };

        Ok(Some(Self {
            host,
            port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .context("SMTP_PORT must be a number")?,
            username: env::var("SMTP_USERNAME").context("SMTP_USERNAME must be set")?,
            password: env::var("SMTP_PASSWORD").context("SMTP_PASSWORD must be set")?,
            from_name: env::var("EMAIL_FROM_NAME")
                .unwrap_or_else(|_| "Payroll System".to_string()),
            from_address: env::var("EMAIL_FROM_ADDRESS")
                .context("EMAIL_FROM_ADDRESS must be set")?,
        }))
    }
}
