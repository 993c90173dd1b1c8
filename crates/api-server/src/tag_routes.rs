use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use journal_core::Tag;

use crate::AppState;

#[derive(Deserialize)]
pub struct TagName {
    pub name: String,
}

pub fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tags/", get(list_tags).post(create_tag))
        .route("/api/tags/:tag_id", put(update_tag).delete(delete_tag))
}

async fn list_tags(State(state): State<AppState>) -> Json<Value> {
    let tags: Vec<Tag> = state.tags.iter().map(|entry| entry.value().clone()).collect();
    Json(json!({ "tags": tags }))
}

async fn create_tag(State(state): State<AppState>, Query(query): Query<TagName>) -> Json<Tag> {
    let tag = Tag {
        id: Uuid::new_v4(),
        name: query.name,
    };
    state.tags.insert(tag.id, tag.clone());
    Json(tag)
}

/// Rename a tag, creating it under the given id if it does not exist yet.
async fn update_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<Uuid>,
    Query(query): Query<TagName>,
) -> Json<Tag> {
    let mut tag = state.tags.entry(tag_id).or_insert_with(|| Tag {
        id: tag_id,
        name: String::new(),
    });
    tag.name = query.name;
    Json(tag.clone())
}

/// Remove a tag. Succeeds whether or not the id was present.
async fn delete_tag(State(state): State<AppState>, Path(tag_id): Path<Uuid>) -> Json<Value> {
    state.tags.remove(&tag_id);
    Json(json!({ "id": tag_id, "deleted": true }))
}
