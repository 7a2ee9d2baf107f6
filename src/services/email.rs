// src/services/email.rs

use crate::{
    config::SmtpConfig,
    errors::{AppError, AppResult},
    services::notify::{PayslipNotifier, PayslipSummary},
};
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::{error, info};

/// Sends payslip summaries over SMTP.
#[derive(Clone)]
pub struct EmailService {
    config: SmtpConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailService {
    pub fn new(config: SmtpConfig) -> AppResult<Self> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::Notification(e.to_string()))?
            .credentials(creds)
            .port(config.port)
            .build();

        Ok(Self { config, transport })
    }

    fn build_message(&self, summary: &PayslipSummary) -> AppResult<Message> {
        let from_mailbox = format!("{} <{}>", self.config.from_name, self.config.from_address)
            .parse()
            .map_err(|e: lettre::address::AddressError| AppError::Notification(e.to_string()))?;

        let to_mailbox = format!("{} <{}>", summary.recipient_name, summary.recipient_email)
            .parse()
            .map_err(|e: lettre::address::AddressError| AppError::Notification(e.to_string()))?;

        Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(summary.subject.clone())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(summary.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(summary.html.clone()),
                    ),
            )
            .map_err(|e| AppError::Notification(e.to_string()))
    }
}

#[async_trait]
impl PayslipNotifier for EmailService {
    async fn send_payslip(&self, summary: &PayslipSummary) -> AppResult<()> {
        let email = self.build_message(summary)?;

        match self.transport.send(email).await {
            Ok(_) => {
                info!("Payslip email sent to {}", summary.recipient_email);
                Ok(())
            }
            Err(e) => {
                error!(
                    "Failed to send payslip email to {}: {}",
                    summary.recipient_email, e
                );
                Err(AppError::Notification(e.to_string()))
            }
        }
    }
}
