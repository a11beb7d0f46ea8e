//! Schedule API: serves bracket schedules over HTTP.
//!
//! `GET /tax-calculator/tax-year/{year}` answers with
//! `{"tax_brackets": [...]}`, the format the calculator's HTTP bracket
//! source consumes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde_json::json;
use tax_core::{BracketSource, ScheduleResponse, SourceError};
use tracing::warn;

pub fn router(source: Arc<dyn BracketSource>) -> Router {
    Router::new()
        .route("/tax-calculator/tax-year/:year", get(get_schedule))
        .with_state(source)
}

async fn get_schedule(
    State(source): State<Arc<dyn BracketSource>>,
    Path(year): Path<i32>,
) -> Result<Json<ScheduleResponse>, (StatusCode, Json<serde_json::Value>)> {
    match source.fetch_brackets(year).await {
        Ok(tax_brackets) => Ok(Json(ScheduleResponse { tax_brackets })),
        Err(err) => {
            warn!(year, error = %err, "schedule lookup failed");
            let status = match err {
                SourceError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(json!({ "error": err.to_string() }))))
        }
    }
}
