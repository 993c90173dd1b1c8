use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use crate::AppState;

// Analytics have no backing aggregation yet; the endpoints hold the response
// shapes the frontend consumes.

pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/api/analytics/summary", get(summary))
        .route("/api/analytics/time-based", get(time_based))
        .route("/api/analytics/tags", get(tag_breakdown))
        .route("/api/analytics/export", get(export))
}

async fn summary() -> Json<Value> {
    Json(json!({ "total_trades": 0, "win_rate": 0.0 }))
}

async fn time_based() -> Json<Value> {
    Json(json!({ "daily": [], "monthly": [] }))
}

async fn tag_breakdown() -> Json<Value> {
    Json(json!({ "tags": [] }))
}

async fn export() -> Json<Value> {
    Json(json!({ "exported_at": Utc::now().to_rfc3339() }))
}
