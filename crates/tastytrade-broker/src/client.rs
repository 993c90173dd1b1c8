use reqwest::Client;
use std::time::Duration;

use crate::error::TastytradeError;
use crate::models::{AccountsResponse, TokenResponse};

/// Bound on each upstream call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TastytradeClient {
    client: Client,
    refresh_token: Option<String>,
    client_secret: Option<String>,
    base_url: String,
}

impl TastytradeClient {
    /// Create a new Tastytrade client. Credentials may be absent; they are
    /// only required once a call actually needs to authenticate.
    pub fn new(
        refresh_token: Option<String>,
        client_secret: Option<String>,
        base_url: String,
    ) -> Result<Self, TastytradeError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            refresh_token,
            client_secret,
            base_url,
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, TastytradeError> {
        let base_url = std::env::var("TASTY_BASE_URL")
            .unwrap_or_else(|_| "https://api.tastytrade.com".to_string());

        Self::new(
            std::env::var("TASTY_REFRESH_TOKEN").ok(),
            std::env::var("TASTY_CLIENT_SECRET").ok(),
            base_url,
        )
    }

    /// Exchange the refresh token for a short-lived access token.
    ///
    /// Requires both the refresh token and the client secret; bails out
    /// before any network traffic if either is missing.
    async fn obtain_access_token(&self) -> Result<String, TastytradeError> {
        let (refresh_token, client_secret) =
            match (self.refresh_token.as_deref(), self.client_secret.as_deref()) {
                (Some(token), Some(secret)) => (token, secret),
                _ => return Err(TastytradeError::MissingCredentials),
            };

        let url = format!("{}/oauth/token", self.base_url);
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_secret", client_secret),
        ];

        let response = self.client.post(&url).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TastytradeError::AuthFailed(status.as_u16()));
        }

        let body = response
            .json::<TokenResponse>()
            .await
            .map_err(|_| TastytradeError::MalformedTokenResponse)?;

        body.access_token
            .filter(|token| !token.is_empty())
            .ok_or(TastytradeError::MalformedTokenResponse)
    }

    /// List the account numbers visible to the authenticated user.
    ///
    /// Runs the full token exchange on every call; the access token is not
    /// held across invocations, and neither step is retried. A failure at
    /// either step aborts the whole operation.
    pub async fn list_accounts(&self) -> Result<Vec<String>, TastytradeError> {
        let token = self.obtain_access_token().await?;

        let url = format!("{}/customers/me/accounts", self.base_url);
        let response = self.client.get(&url).bearer_auth(&token).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TastytradeError::AccountFetchFailed(status.as_u16()));
        }

        let body = response.json::<AccountsResponse>().await?;

        // Upstream order is preserved; entries without an account number are skipped.
        let accounts: Vec<String> = body
            .data
            .into_iter()
            .filter_map(|entry| entry.account_number)
            .collect();

        tracing::debug!("Fetched {} Tastytrade account(s)", accounts.len());

        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Form, State},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// In-process stand-in for the Tastytrade API. Counts hits and captures
    /// request details so tests can assert which endpoints were reached and
    /// with what.
    #[derive(Clone)]
    struct FakeUpstream {
        token_status: u16,
        token_body: Value,
        accounts_status: u16,
        accounts_body: Value,
        token_hits: Arc<AtomicUsize>,
        account_hits: Arc<AtomicUsize>,
        token_form: Arc<Mutex<Option<HashMap<String, String>>>>,
        auth_header: Arc<Mutex<Option<String>>>,
    }

    impl FakeUpstream {
        fn new(token_status: u16, token_body: Value, accounts_status: u16, accounts_body: Value) -> Self {
            Self {
                token_status,
                token_body,
                accounts_status,
                accounts_body,
                token_hits: Arc::new(AtomicUsize::new(0)),
                account_hits: Arc::new(AtomicUsize::new(0)),
                token_form: Arc::new(Mutex::new(None)),
                auth_header: Arc::new(Mutex::new(None)),
            }
        }

        fn healthy() -> Self {
            Self::new(
                200,
                json!({ "access_token": "abc" }),
                200,
                json!({ "data": [{ "account-number": "1234" }] }),
            )
        }
    }

    async fn token_endpoint(
        State(upstream): State<FakeUpstream>,
        Form(form): Form<HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        upstream.token_hits.fetch_add(1, Ordering::SeqCst);
        *upstream.token_form.lock().unwrap() = Some(form);
        (
            StatusCode::from_u16(upstream.token_status).unwrap(),
            Json(upstream.token_body.clone()),
        )
    }

    async fn accounts_endpoint(
        State(upstream): State<FakeUpstream>,
        headers: HeaderMap,
    ) -> (StatusCode, Json<Value>) {
        upstream.account_hits.fetch_add(1, Ordering::SeqCst);
        *upstream.auth_header.lock().unwrap() = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        (
            StatusCode::from_u16(upstream.accounts_status).unwrap(),
            Json(upstream.accounts_body.clone()),
        )
    }

    async fn spawn_upstream(upstream: FakeUpstream) -> String {
        let app = Router::new()
            .route("/oauth/token", post(token_endpoint))
            .route("/customers/me/accounts", get(accounts_endpoint))
            .with_state(upstream);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn client_with_credentials(base_url: String) -> TastytradeClient {
        TastytradeClient::new(
            Some("RTOKEN".to_string()),
            Some("SECRET".to_string()),
            base_url,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_credentials_fails_before_any_request() {
        let upstream = FakeUpstream::healthy();
        let base_url = spawn_upstream(upstream.clone()).await;

        let configs = [
            (None, None),
            (Some("RTOKEN".to_string()), None),
            (None, Some("SECRET".to_string())),
        ];

        for (refresh_token, client_secret) in configs {
            let client =
                TastytradeClient::new(refresh_token, client_secret, base_url.clone()).unwrap();
            let err = client.list_accounts().await.unwrap_err();
            assert!(matches!(err, TastytradeError::MissingCredentials));
        }

        assert_eq!(upstream.token_hits.load(Ordering::SeqCst), 0);
        assert_eq!(upstream.account_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_list_accounts_happy_path() {
        let upstream = FakeUpstream::healthy();
        let base_url = spawn_upstream(upstream.clone()).await;

        let client = client_with_credentials(base_url);
        let accounts = client.list_accounts().await.unwrap();

        assert_eq!(accounts, vec!["1234".to_string()]);

        let form = upstream.token_form.lock().unwrap().clone().unwrap();
        assert_eq!(form.get("grant_type").map(String::as_str), Some("refresh_token"));
        assert_eq!(form.get("refresh_token").map(String::as_str), Some("RTOKEN"));
        assert_eq!(form.get("client_secret").map(String::as_str), Some("SECRET"));

        let auth = upstream.auth_header.lock().unwrap().clone().unwrap();
        assert_eq!(auth, "Bearer abc");
    }

    #[tokio::test]
    async fn test_token_failure_surfaces_status_and_skips_fetch() {
        let upstream = FakeUpstream::new(
            401,
            json!({ "error": "invalid_grant" }),
            200,
            json!({ "data": [] }),
        );
        let base_url = spawn_upstream(upstream.clone()).await;

        let client = client_with_credentials(base_url);
        let err = client.list_accounts().await.unwrap_err();

        assert!(matches!(err, TastytradeError::AuthFailed(401)));
        assert_eq!(upstream.token_hits.load(Ordering::SeqCst), 1);
        assert_eq!(upstream.account_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_token_response_without_access_token_is_malformed() {
        let upstream = FakeUpstream::new(
            200,
            json!({ "token_type": "Bearer" }),
            200,
            json!({ "data": [] }),
        );
        let base_url = spawn_upstream(upstream.clone()).await;

        let client = client_with_credentials(base_url);
        let err = client.list_accounts().await.unwrap_err();

        assert!(matches!(err, TastytradeError::MalformedTokenResponse));
        assert_eq!(upstream.account_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_account_fetch_failure_surfaces_status() {
        let upstream = FakeUpstream::new(
            200,
            json!({ "access_token": "abc" }),
            503,
            json!({ "error": "maintenance" }),
        );
        let base_url = spawn_upstream(upstream.clone()).await;

        let client = client_with_credentials(base_url);
        let err = client.list_accounts().await.unwrap_err();

        assert!(matches!(err, TastytradeError::AccountFetchFailed(503)));
    }

    #[tokio::test]
    async fn test_missing_data_array_yields_no_accounts() {
        let upstream = FakeUpstream::new(
            200,
            json!({ "access_token": "abc" }),
            200,
            json!({}),
        );
        let base_url = spawn_upstream(upstream.clone()).await;

        let client = client_with_credentials(base_url);
        let accounts = client.list_accounts().await.unwrap();

        assert!(accounts.is_empty());
    }

    #[tokio::test]
    async fn test_accounts_follow_upstream_order() {
        let upstream = FakeUpstream::new(
            200,
            json!({ "access_token": "abc" }),
            200,
            json!({ "data": [
                { "account-number": "A-2" },
                { "nickname": "no number here" },
                { "account-number": "A-1" },
            ] }),
        );
        let base_url = spawn_upstream(upstream.clone()).await;

        let client = client_with_credentials(base_url);
        let accounts = client.list_accounts().await.unwrap();

        assert_eq!(accounts, vec!["A-2".to_string(), "A-1".to_string()]);
    }
}
