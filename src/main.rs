use anyhow::Context;
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod handlers;
mod models;
mod openapi;
mod repository;
mod routes;
mod services;
mod state;

use config::Config;
use handlers::general::{health_handler, root_handler};
use openapi::ApiDoc;
use repository::postgres::{PgEmployeeDirectory, PgPayslipRepository};
use routes::api_routes;
use services::{
    calculator::PayslipCalculator,
    email::EmailService,
    notify::{LogNotifier, PayslipNotifier},
    payroll::PayrollService,
    rates::DeductionRates,
};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ─── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("payroll_engine=debug,tower_http=info")),
        )
        .with_max_level(Level::TRACE)
        .init();

    // ─── Config ───────────────────────────────────────────────────────────────
    let config = Config::from_env()?;
    let addr = config.server_addr();

    // ─── Database ─────────────────────────────────────────────────────────────
    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to Postgres")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("Failed to run database migrations")?;

    info!("Database connected and migrations applied ✓");

    // ─── Payroll engine ───────────────────────────────────────────────────────
    let notifier: Arc<dyn PayslipNotifier> = match config.smtp.clone() {
        Some(smtp) => Arc::new(EmailService::new(smtp)?),
        None => {
            warn!("SMTP_HOST not set; payslips will be logged instead of emailed");
            Arc::new(LogNotifier)
        }
    };

    let payroll = PayrollService::new(
        Arc::new(PgEmployeeDirectory::new(db.clone())),
        Arc::new(PgPayslipRepository::new(db)),
        PayslipCalculator::new(DeductionRates::default()),
        notifier,
        config.company_name.clone(),
    );

    // ─── App State ────────────────────────────────────────────────────────────
    let state = AppState::new(payroll, config);

    // ─── Router ───────────────────────────────────────────────────────────────
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", api_routes())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // ─── Start Server ─────────────────────────────────────────────────────────
    info!("🚀 Payroll Engine API listening on http://{}", addr);
    info!("📖 Swagger UI:  http://{}/docs", addr);
    info!("❤️  Health:      http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
