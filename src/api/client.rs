use std::fmt;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use super::types::{Company, EsgRecord};

/// Marker error for a rejected token (HTTP 401). Callers downcast to this to
/// trigger a re-prompt instead of surfacing a generic failure.
#[derive(Debug)]
pub struct AuthError;

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Authentication failed. Your API token may be invalid or expired.")
    }
}

impl std::error::Error for AuthError {}

/// Client for the ESG reporting backend's REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Create a client for the backend at `base_url`, attaching `token` as a
/// bearer header when present (the backend may run unauthenticated in
/// development).
pub fn create_client(base_url: &str, token: Option<&str>) -> Result<ApiClient> {
    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .context("API token contains characters not valid in a header")?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    let http = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(15))
        .build()
        .context("Failed to create HTTP client")?;

    Ok(ApiClient {
        http,
        base_url: base_url.trim_end_matches('/').to_string(),
    })
}

impl ApiClient {
    /// GET a JSON collection, retrying transient failures with exponential
    /// backoff (3 attempts). Status codes are mapped to actionable errors;
    /// 401 is surfaced as a downcastable `AuthError`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(3);

        let response = Retry::spawn(retry_strategy, || async {
            self.http.get(&url).send().await.map_err(|e| {
                if e.is_timeout() {
                    anyhow!("Request to {} timed out", url)
                } else if e.is_connect() {
                    anyhow!(
                        "Could not reach the ESG backend at {}. Is it running?",
                        self.base_url
                    )
                } else {
                    anyhow!("Request to {} failed: {}", url, e)
                }
            })
        })
        .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(AuthError.into()),
            StatusCode::NOT_FOUND => Err(anyhow!("Not found: {}", url)),
            status if status.is_server_error() => {
                Err(anyhow!("Backend error {} from {}", status, url))
            }
            status if !status.is_success() => {
                Err(anyhow!("Unexpected status {} from {}", status, url))
            }
            _ => response
                .json::<T>()
                .await
                .with_context(|| format!("Failed to decode response from {}", url)),
        }
    }

    pub async fn companies(&self) -> Result<Vec<Company>> {
        self.get_json("/api/companies").await
    }

    pub async fn company(&self, company_id: u64) -> Result<Company> {
        self.get_json(&format!("/api/companies/{}", company_id)).await
    }

    pub async fn esg_data(&self) -> Result<Vec<EsgRecord>> {
        self.get_json("/api/esg-data").await
    }

    pub async fn company_esg_data(&self, company_id: u64) -> Result<Vec<EsgRecord>> {
        self.get_json(&format!("/api/esg-data/company/{}", company_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_strips_trailing_slash() {
        let client = create_client("http://localhost:5000/", None).unwrap();
        assert_eq!(client.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_create_client_with_token() {
        assert!(create_client("http://localhost:5000", Some("abc123")).is_ok());
    }

    #[test]
    fn test_create_client_rejects_invalid_token() {
        let result = create_client("http://localhost:5000", Some("bad\ntoken"));
        assert!(result.is_err());
    }

    #[test]
    fn test_auth_error_downcast() {
        let err: anyhow::Error = AuthError.into();
        assert!(err.downcast_ref::<AuthError>().is_some());
    }
}
