use serde::Deserialize;

/// Token endpoint response. Only the access token is of interest.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AccountsResponse {
    #[serde(default)]
    pub data: Vec<AccountEntry>,
}

#[derive(Debug, Deserialize)]
pub struct AccountEntry {
    #[serde(rename = "account-number")]
    pub account_number: Option<String>,
}
