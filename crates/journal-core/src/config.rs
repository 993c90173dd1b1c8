/// Process-wide configuration, read once at startup and handed to the
/// components that need it. Tests build values directly instead of going
/// through the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub secret_key: String,
    pub tasty_refresh_token: Option<String>,
    pub tasty_client_id: Option<String>,
    pub tasty_client_secret: Option<String>,
    pub tasty_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite:app.db".to_string(),
            secret_key: "CHANGE_ME".to_string(), // Default for dev, override via env
            tasty_refresh_token: None,
            tasty_client_id: None,
            tasty_client_secret: None,
            tasty_base_url: "https://api.tastytrade.com".to_string(),
        }
    }
}

impl Settings {
    /// Read settings from the environment, falling back to the defaults.
    /// `.env` loading is the binary's job (dotenvy), not this function's.
    pub fn from_env() -> Self {
        let defaults = Settings::default();

        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            secret_key: std::env::var("SECRET_KEY").unwrap_or(defaults.secret_key),
            tasty_refresh_token: std::env::var("TASTY_REFRESH_TOKEN").ok(),
            tasty_client_id: std::env::var("TASTY_CLIENT_ID").ok(),
            tasty_client_secret: std::env::var("TASTY_CLIENT_SECRET").ok(),
            tasty_base_url: std::env::var("TASTY_BASE_URL").unwrap_or(defaults.tasty_base_url),
        }
    }
}
