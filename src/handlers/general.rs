use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde_json::json;

/// Root handler: returns an HTML landing page with the route map
pub async fn root_handler() -> impl IntoResponse {
    Html(r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
  <title>Payroll Engine API</title>
  <style>
    body { font-family: 'Segoe UI', system-ui, sans-serif; background: #0f172a; color: #e2e8f0; padding: 40px 20px; }
    .container { max-width: 860px; margin: 0 auto; }
    h1 { font-size: 2.4rem; color: #60a5fa; }
    a { color: #38bdf8; }
    .route-item { display: flex; gap: 12px; padding: 6px 0; border-bottom: 1px solid #1e293b; }
    .method { font-family: monospace; font-weight: 700; min-width: 60px; }
    .route-path { font-family: monospace; flex: 1; }
    .route-desc { color: #94a3b8; font-size: 0.85rem; }
  </style>
</head>
<body>
<div class="container">
  <h1>Payroll Engine API</h1>
  <p>Payslip generation, approval and payment. <a href="/docs">Swagger UI</a> · <a href="/health">Health</a></p>

  <h3>Payroll</h3>
  <div class="route-item"><span class="method">POST</span><span class="route-path">/api/v1/payroll/generate</span><span class="route-desc">Generate one employee's payslip</span></div>
  <div class="route-item"><span class="method">POST</span><span class="route-path">/api/v1/payroll/generate/batch</span><span class="route-desc">Generate payslips for a period</span></div>
  <div class="route-item"><span class="method">POST</span><span class="route-path">/api/v1/payroll/approve</span><span class="route-desc">Approve all pending payslips of a period</span></div>
  <div class="route-item"><span class="method">GET</span><span class="route-path">/api/v1/payroll/summary</span><span class="route-desc">Count and totals for a period</span></div>

  <h3>Payslips</h3>
  <div class="route-item"><span class="method">GET</span><span class="route-path">/api/v1/payslips</span><span class="route-desc">List payslips of a period</span></div>
  <div class="route-item"><span class="method">GET</span><span class="route-path">/api/v1/payslips/:id</span><span class="route-desc">Get a payslip</span></div>
  <div class="route-item"><span class="method">PATCH</span><span class="route-path">/api/v1/payslips/:id</span><span class="route-desc">Edit a pending payslip</span></div>
  <div class="route-item"><span class="method">DELETE</span><span class="route-path">/api/v1/payslips/:id</span><span class="route-desc">Delete a pending or rejected payslip</span></div>
  <div class="route-item"><span class="method">POST</span><span class="route-path">/api/v1/payslips/:id/approve</span><span class="route-desc">Approve</span></div>
  <div class="route-item"><span class="method">POST</span><span class="route-path">/api/v1/payslips/:id/reject</span><span class="route-desc">Reject</span></div>
  <div class="route-item"><span class="method">POST</span><span class="route-path">/api/v1/payslips/:id/pay</span><span class="route-desc">Mark paid and email the payslip</span></div>
  <div class="route-item"><span class="method">GET</span><span class="route-path">/api/v1/employees/:id/payslips</span><span class="route-desc">Employee payslip history</span></div>
</div>
</body>
</html>"#)
}

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.payroll.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "service": "payroll-engine",
                "company": state.config.company_name,
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "database": "disconnected",
                "error": e.to_string()
            })),
        ),
    }
}
