use crate::io;
use crate::models::{MatchCandidate, MatchStats, ProductRecord};
use crate::service::MatcherService;
use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request body: the two vendor price lists, with an optional
/// per-run threshold override.
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub left: Vec<ProductRecord>,
    pub right: Vec<ProductRecord>,
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Response body: candidates plus run statistics.
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub success: bool,
    pub message: String,
    pub completed_at: chrono::DateTime<chrono::Utc>,
    pub stats: Option<MatchStats>,
    pub candidates: Vec<MatchCandidate>,
}

/// Health check
pub async fn health_check() -> &'static str {
    "OK"
}

fn validate_threshold(threshold: Option<f64>) -> Result<(), String> {
    match threshold {
        Some(t) if !(0.0..=1.0).contains(&t) || t.is_nan() => {
            Err(format!("threshold {} is outside [0, 1]", t))
        }
        _ => Ok(()),
    }
}

/// Run one match batch. A completed run always succeeds and reports a
/// candidate count, possibly zero; empty inputs are not an error.
pub async fn match_lists(
    State(service): State<Arc<MatcherService>>,
    Json(req): Json<MatchRequest>,
) -> Response {
    if let Err(message) = validate_threshold(req.threshold) {
        let response = MatchResponse {
            success: false,
            message,
            completed_at: chrono::Utc::now(),
            stats: None,
            candidates: Vec::new(),
        };
        return (StatusCode::BAD_REQUEST, Json(response)).into_response();
    }

    let (candidates, stats) = service.match_with_threshold(&req.left, &req.right, req.threshold);
    let response = MatchResponse {
        success: true,
        message: format!(
            "Matched {} x {} records: {} candidates",
            stats.left_count, stats.right_count, stats.candidates
        ),
        completed_at: chrono::Utc::now(),
        stats: Some(stats),
        candidates,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Same run, returned as the CSV export body.
pub async fn match_lists_csv(
    State(service): State<Arc<MatcherService>>,
    Json(req): Json<MatchRequest>,
) -> Response {
    if let Err(message) = validate_threshold(req.threshold) {
        return (StatusCode::BAD_REQUEST, message).into_response();
    }

    let (candidates, _) = service.match_with_threshold(&req.left, &req.right, req.threshold);
    match io::csv_string(&candidates) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("CSV export failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e)).into_response()
        }
    }
}
