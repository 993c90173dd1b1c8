use axum::{
    extract::Path,
    routing::{get, put},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::AppState;

// Journal entries carry no backing model yet; every endpoint returns a fixed
// placeholder shape.

pub fn journal_routes() -> Router<AppState> {
    Router::new()
        .route("/api/journal-entries/", get(list_entries).post(create_entry))
        .route("/api/journal-entries/calendar", get(calendar))
        .route("/api/journal-entries/search", get(search))
        .route(
            "/api/journal-entries/:entry_id",
            put(update_entry).delete(delete_entry),
        )
}

async fn list_entries() -> Json<Value> {
    Json(json!({ "entries": [] }))
}

async fn create_entry() -> Json<Value> {
    Json(json!({ "id": Uuid::new_v4(), "created_at": Utc::now() }))
}

async fn update_entry(Path(entry_id): Path<String>) -> Json<Value> {
    Json(json!({ "id": entry_id, "updated": true }))
}

async fn delete_entry(Path(entry_id): Path<String>) -> Json<Value> {
    Json(json!({ "id": entry_id, "deleted": true }))
}

async fn calendar() -> Json<Value> {
    Json(json!({ "entries": [] }))
}

async fn search() -> Json<Value> {
    Json(json!({ "results": [] }))
}
