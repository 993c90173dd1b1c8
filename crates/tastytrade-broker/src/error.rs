use thiserror::Error;

/// Failure classes for the Tastytrade OAuth2 flow.
///
/// Callers need to tell these apart: missing configuration is the caller's
/// problem, a non-success upstream status is forwarded as-is, and a success
/// response without the expected token is an upstream fault.
#[derive(Error, Debug)]
pub enum TastytradeError {
    #[error("Tastytrade credentials not configured")]
    MissingCredentials,

    #[error("Failed to authenticate with Tastytrade (status {0})")]
    AuthFailed(u16),

    #[error("Malformed authentication response")]
    MalformedTokenResponse,

    #[error("Failed to fetch accounts (status {0})")]
    AccountFetchFailed(u16),

    #[error("Tastytrade request failed: {0}")]
    Http(#[from] reqwest::Error),
}
