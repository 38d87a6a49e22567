//! Sales backend client
//!
//! A thin JSON-over-HTTP client plus the counter-sales and stock services built on it.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::{
    session::SharedSession,
    wire::{Envelope, backend_message},
};

mod errors;
pub mod sales;
pub mod session;
pub mod stock;
pub mod wire;

pub use errors::ApiError;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Configuration for connecting to the sales backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL, e.g. `"http://localhost:5000/api"`.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Path of the stock listing.
    pub stock_path: String,

    /// Path of the counter-sales collection.
    pub sales_path: String,
}

impl ClientConfig {
    /// Configuration with the default paths and a 30 second timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            stock_path: "/stock".to_string(),
            sales_path: "/counter-sales".to_string(),
        }
    }
}

/// HTTP client for the sales backend.
///
/// Every request carries a fresh `X-Request-Id`, and a bearer token when the session
/// holds one.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    http: Client,
    session: SharedSession,
}

impl ApiClient {
    /// Create a new client from the given configuration and session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig, session: SharedSession) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            config,
            http,
            session,
        })
    }

    /// Client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Session used to authenticate requests.
    #[must_use]
    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Absolute URL for a path relative to the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// `GET` a JSON resource.
    ///
    /// Responses wrapped in a `data` member are unwrapped.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, a non-2xx response, or an unexpected body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.http.get(self.url(path))).await
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, a non-2xx response, or an unexpected body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    /// `POST` without a body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, a non-2xx response, or an unexpected body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.http.post(self.url(path))).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let request_id = Uuid::now_v7();
        let mut request = request.header(REQUEST_ID_HEADER, request_id.to_string());

        if let Some(token) = self.session.read().await.bearer() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        debug!(%request_id, status = status.as_u16(), url = %response.url(), "backend responded");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = backend_message(&text)
                .unwrap_or_else(|| format!("request failed with status {status}"));

            warn!(%request_id, status = status.as_u16(), %message, "backend rejected request");

            return Err(ApiError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Envelope<T>>().await?.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::client::session::Session;

    use super::*;

    #[test]
    fn url_joins_without_doubled_slashes() -> TestResult {
        let client = ApiClient::new(
            ClientConfig::new("http://localhost:5000/api/"),
            Session::anonymous().shared(),
        )?;

        assert_eq!(
            client.url("/counter-sales"),
            "http://localhost:5000/api/counter-sales"
        );
        assert_eq!(client.url("stock"), "http://localhost:5000/api/stock");

        Ok(())
    }
}
