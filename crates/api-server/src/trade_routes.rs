use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use journal_core::{NewTrade, Trade};

use crate::{ApiError, AppState};

pub fn trade_routes() -> Router<AppState> {
    Router::new().route("/api/trades/", get(list_trades).post(create_trade))
}

/// List every recorded trade.
async fn list_trades(State(state): State<AppState>) -> Result<Json<Vec<Trade>>, ApiError> {
    let trades = state.trades.list_trades().await?;
    Ok(Json(trades))
}

/// Record a trade. The identifier and timestamps come back server-assigned.
async fn create_trade(
    State(state): State<AppState>,
    Json(new_trade): Json<NewTrade>,
) -> Result<Json<Trade>, ApiError> {
    if new_trade.symbol.trim().is_empty() {
        return Err(ApiError::Validation("symbol must not be empty".to_string()));
    }

    let trade = state.trades.create_trade(new_trade).await?;

    tracing::info!("Recorded trade {} ({})", trade.id, trade.symbol);

    Ok(Json(trade))
}
