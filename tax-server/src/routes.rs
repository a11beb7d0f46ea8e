//! HTTP routes for the calculator.
//!
//! | Method  | Path      | Input                           |
//! |---------|-----------|---------------------------------|
//! | GET     | `/tax`    | `?income=..&year=..`            |
//! | POST    | `/tax`    | `{"income": .., "year": ..}`    |
//! | OPTIONS | `/tax`    | none, answers 204 with `Allow`  |
//! | GET     | `/health` | none                            |
//!
//! POST fields may be JSON strings or numbers. Any other method on `/tax`
//! gets 405. A calculation that outlives the request timeout answers 408.

use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tax_core::{TaxResult, TaxService};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::error::ApiError;

pub type SharedService = Arc<dyn TaxService>;

#[derive(Clone)]
pub struct AppState {
    pub service: SharedService,
    pub request_timeout: Duration,
}

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

#[derive(Debug, Default, Deserialize)]
pub struct TaxQuery {
    pub income: Option<String>,
    pub year: Option<String>,
}

/// A POST body field given either as a JSON string or a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Text(String),
    Number(serde_json::Number),
}

impl RawField {
    fn into_text(self) -> String {
        match self {
            RawField::Text(s) => s,
            RawField::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TaxRequest {
    pub income: Option<RawField>,
    pub year: Option<RawField>,
}

pub fn router(
    service: SharedService,
    request_timeout: Duration,
) -> Router {
    Router::new()
        .route("/tax", get(tax_query).post(tax_body).options(tax_options))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState {
            service,
            request_timeout,
        })
}

/// Both fields must be present and non-empty.
fn required(
    income: Option<String>,
    year: Option<String>,
) -> Result<(String, String), ApiError> {
    match (income, year) {
        (Some(income), Some(year)) if !income.is_empty() && !year.is_empty() => Ok((income, year)),
        _ => {
            warn!("tax request missing income or year");
            Err(ApiError::missing_fields())
        }
    }
}

async fn calculate(
    state: &AppState,
    income: String,
    year: String,
) -> Result<Json<TaxResult>, ApiError> {
    debug!(%income, %year, "tax request");
    let result = tokio::time::timeout(
        state.request_timeout,
        state.service.calculate_tax(&income, &year),
    )
    .await
    .map_err(|_| {
        warn!(%income, %year, timeout = ?state.request_timeout, "tax request timed out");
        ApiError::timed_out(state.request_timeout)
    })??;
    Ok(Json(result))
}

async fn tax_query(
    State(state): State<AppState>,
    Query(query): Query<TaxQuery>,
) -> Result<Json<TaxResult>, ApiError> {
    let (income, year) = required(query.income, query.year)?;
    calculate(&state, income, year).await
}

async fn tax_body(
    State(state): State<AppState>,
    body: Result<Json<TaxRequest>, JsonRejection>,
) -> Result<Json<TaxResult>, ApiError> {
    let Json(request) = body.map_err(|e| {
        warn!(error = %e, "rejected tax request body");
        ApiError::bad_request(format!("Invalid request body: {}", e.body_text()))
    })?;
    let (income, year) = required(
        request.income.map(RawField::into_text),
        request.year.map(RawField::into_text),
    )?;
    calculate(&state, income, year).await
}

async fn tax_options() -> impl IntoResponse {
    (StatusCode::NO_CONTENT, [(header::ALLOW, ALLOWED_METHODS)])
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
