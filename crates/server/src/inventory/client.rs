//! HTTP client for the inventory backend.

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::InventoryError;
use crate::config::InventoryApiConfig;

/// Typed client for the inventory backend REST API.
///
/// Cheap to clone; the underlying `reqwest::Client` is reference-counted.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    http: reqwest::Client,
    base_url: url::Url,
}

/// Error body shape the backend uses for non-success responses.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    error: String,
}

impl InventoryClient {
    /// Create a new client from backend configuration.
    ///
    /// # Panics
    ///
    /// Panics if the bearer token contains invalid header characters. This
    /// runs once at startup, before the server accepts traffic.
    #[must_use]
    pub fn new(config: &InventoryApiConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!(
            "Bearer {}",
            config.api_token.expose_secret()
        ))
        .expect("Invalid API token for header");
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            "x-tenant-id",
            HeaderValue::from_str(&config.tenant).expect("Invalid tenant for header"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        // Url::join treats "a/b" as a sibling of the last path segment unless
        // the base ends with a slash.
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Self { http, base_url }
    }

    /// GET `path` and deserialize the JSON response body.
    pub(super) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, InventoryError> {
        let response = self
            .http
            .get(self.endpoint(path)?)
            .header("x-request-id", Uuid::new_v4().to_string())
            .send()
            .await?;
        Self::decode(path, response).await
    }

    /// POST `body` to `path`, discarding any response body.
    pub(super) async fn post_unit<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), InventoryError> {
        let response = self
            .http
            .post(self.endpoint(path)?)
            .header("x-request-id", Uuid::new_v4().to_string())
            .json(body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::fail_with_body(path, response).await);
        }
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, InventoryError> {
        self.base_url
            .join(path)
            .map_err(|e| InventoryError::InvalidData(format!("bad endpoint path {path}: {e}")))
    }

    async fn decode<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, InventoryError> {
        Self::check_status(path, &response)?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn check_status(path: &str, response: &reqwest::Response) -> Result<(), InventoryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::NOT_FOUND {
            return Err(InventoryError::NotFound(path.to_string()));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            return Err(InventoryError::RateLimited(retry_after));
        }
        Err(InventoryError::Api {
            status: status.as_u16(),
            message: format!("request to {path} failed"),
        })
    }

    /// Map a non-success mutation response, reading the backend's error
    /// body for the message. The reason matters to the operator on
    /// mutations.
    async fn fail_with_body(path: &str, response: reqwest::Response) -> InventoryError {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return InventoryError::NotFound(path.to_string());
        }
        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<ApiErrorBody>(&body)
                .map_or_else(|_| format!("request to {path} failed"), |b| b.error),
            Err(_) => format!("request to {path} failed"),
        };
        InventoryError::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// Send a mutation, surfacing the backend's error message on failure.
    pub(super) async fn post_mutation<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, InventoryError> {
        let response = self
            .http
            .post(self.endpoint(path)?)
            .header("x-request-id", Uuid::new_v4().to_string())
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::fail_with_body(path, response).await);
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Ping the backend for readiness checks.
    pub async fn ping(&self) -> Result<(), InventoryError> {
        let response = self.http.get(self.endpoint("health")?).send().await?;
        Self::check_status("health", &response)
    }
}
