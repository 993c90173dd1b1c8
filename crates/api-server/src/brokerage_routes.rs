use axum::{
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::AppState;

// Generic brokerage-connection surface. The OAuth connect/callback flow and
// trade sync are not wired to a real brokerage; the endpoints return the
// agreed placeholder payloads.

pub fn brokerage_routes() -> Router<AppState> {
    Router::new()
        .route("/api/brokerage/accounts", get(list_accounts))
        .route("/api/brokerage/connect", post(connect))
        .route("/api/brokerage/callback", get(callback))
        .route("/api/brokerage/disconnect", post(disconnect))
        .route("/api/brokerage/sync", post(sync))
        .route("/api/brokerage/positions", get(list_positions))
}

async fn list_accounts() -> Json<Value> {
    Json(json!({ "accounts": [] }))
}

async fn connect() -> Json<Value> {
    Json(json!({ "auth_url": "https://example.com/auth", "state": "dummy" }))
}

async fn callback() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn disconnect() -> Json<Value> {
    Json(json!({ "status": "disconnected" }))
}

async fn sync() -> Json<Value> {
    Json(json!({ "trades_synced": 0, "last_sync_date": Utc::now() }))
}

async fn list_positions() -> Json<Value> {
    Json(json!({ "positions": [] }))
}
