use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{ApiError, AppState};

#[derive(Serialize)]
pub struct AccountList {
    pub accounts: Vec<String>,
}

pub fn tastytrade_routes() -> Router<AppState> {
    Router::new().route("/api/tastytrade/accounts", get(get_accounts))
}

/// Account numbers for the connected Tastytrade user.
///
/// 400 when credentials are not configured; upstream failures keep their
/// upstream status code; a malformed upstream response maps to 500.
async fn get_accounts(State(state): State<AppState>) -> Result<Json<AccountList>, ApiError> {
    let accounts = state.tastytrade.list_accounts().await?;
    Ok(Json(AccountList { accounts }))
}
