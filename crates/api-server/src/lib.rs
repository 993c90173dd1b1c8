//! Trade Blotter HTTP API.
//!
//! Assembles the route groups, owns the shared application state, and maps
//! domain failures onto HTTP responses.

pub mod analytics_routes;
pub mod brokerage_routes;
pub mod journal_routes;
pub mod profile_routes;
pub mod tag_routes;
pub mod tastytrade_routes;
pub mod trade_routes;


use std::sync::{Arc, RwLock};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use dashmap::DashMap;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use journal_core::{Profile, Settings, Tag};
use journal_store::{JournalDb, TradeStore};
use tastytrade_broker::{TastytradeClient, TastytradeError};

/// Shared application state, injected into every handler.
///
/// The tag and profile stores are process-local and not persisted; the trade
/// store is the only component backed by the database.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub trades: Arc<TradeStore>,
    pub tastytrade: Arc<TastytradeClient>,
    pub tags: Arc<DashMap<Uuid, Tag>>,
    pub profile: Arc<RwLock<Profile>>,
}

impl AppState {
    pub fn new(settings: Settings, db: JournalDb, tastytrade: TastytradeClient) -> Self {
        Self {
            settings,
            trades: Arc::new(TradeStore::new(db)),
            tastytrade: Arc::new(tastytrade),
            tags: Arc::new(DashMap::new()),
            profile: Arc::new(RwLock::new(Profile::default())),
        }
    }
}

/// API-facing error type. Each failure class maps to a fixed status code;
/// the upstream classes keep the status they were given.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("{1}")]
    Upstream(u16, String),

    #[error("{0}")]
    BadUpstreamPayload(String),

    #[error("{0}")]
    Gateway(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Upstream(code, msg) => (
                StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY),
                msg,
            ),
            ApiError::BadUpstreamPayload(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Gateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(err) => {
                tracing::error!("internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<TastytradeError> for ApiError {
    fn from(err: TastytradeError) -> Self {
        let message = err.to_string();
        match err {
            TastytradeError::MissingCredentials => ApiError::BadRequest(message),
            TastytradeError::AuthFailed(status) | TastytradeError::AccountFetchFailed(status) => {
                ApiError::Upstream(status, message)
            }
            TastytradeError::MalformedTokenResponse => ApiError::BadUpstreamPayload(message),
            TastytradeError::Http(_) => ApiError::Gateway(message),
        }
    }
}

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(trade_routes::trade_routes())
        .merge(tastytrade_routes::tastytrade_routes())
        .merge(brokerage_routes::brokerage_routes())
        .merge(analytics_routes::analytics_routes())
        .merge(journal_routes::journal_routes())
        .merge(tag_routes::tag_routes())
        .merge(profile_routes::profile_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Load configuration, connect the database, and serve the API.
pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_server=info,tower_http=warn".into()),
        )
        .init();

    let settings = Settings::from_env();

    let db = JournalDb::new(&settings.database_url).await?;
    let tastytrade = TastytradeClient::new(
        settings.tasty_refresh_token.clone(),
        settings.tasty_client_secret.clone(),
        settings.tasty_base_url.clone(),
    )?;

    let state = AppState::new(settings, db, tastytrade);
    let app = app(state);

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let bind_addr = format!("{}:{}", host, port);

    tracing::info!("Trade Blotter API listening on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
