use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use journal_core::Profile;

use crate::{ApiError, AppState};

#[derive(Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub timezone: Option<String>,
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/api/profile/", get(get_profile).put(update_profile))
}

async fn get_profile(State(state): State<AppState>) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .profile
        .read()
        .map_err(|_| anyhow::anyhow!("profile lock poisoned"))?
        .clone();
    Ok(Json(profile))
}

/// Update the profile in place; only supplied fields change, and the update
/// timestamp is bumped either way.
async fn update_profile(
    State(state): State<AppState>,
    Query(update): Query<ProfileUpdate>,
) -> Result<Json<Profile>, ApiError> {
    let mut profile = state
        .profile
        .write()
        .map_err(|_| anyhow::anyhow!("profile lock poisoned"))?;

    if let Some(display_name) = update.display_name {
        profile.display_name = display_name;
    }
    if let Some(timezone) = update.timezone {
        profile.timezone = timezone;
    }
    profile.updated_at = Utc::now();

    Ok(Json(profile.clone()))
}
