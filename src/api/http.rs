//! REST backend client.
//!
//! [`HttpClient`] is the single request-issuing object of the crate: one
//! `reqwest::Client` configured with a fixed base address, a client-wide timeout and
//! a JSON content-type header. Every backend call funnels through it.

use super::backend::MarketplaceApi;
use super::models::{Envelope, ErrorBody};
use crate::domain::{NewReview, NewService, Result, Review, Service, ServiceFinderError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::Instrument;

/// HTTP client bound to one backend base address.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a client for `base_url` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Config`] if the base URL cannot be parsed or
    /// cannot carry path segments, and if the TLS backend fails to initialize.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ServiceFinderError::Config(format!("invalid base_url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceFinderError::Config(format!(
                "base_url {base_url} cannot carry a path"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ServiceFinderError::Config(format!("failed to build HTTP client: {e}")))?;

        tracing::debug!(base_url = %base_url, timeout_ms = timeout.as_millis(), "http client created");

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Returns the configured base address.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an absolute URL from path segments, percent-encoding each one.
    ///
    /// A category tag containing `/` or spaces therefore stays a single segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ServiceFinderError::Config(format!("base_url {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        self.send::<(), T>(Method::GET, url, None).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(&self, segments: &[&str], body: &B) -> Result<T> {
        let url = self.endpoint(segments)?;
        self.send(Method::POST, url, Some(body)).await
    }

    /// Issues one request and unwraps the `{ "data": ... }` envelope.
    ///
    /// Non-success statuses map to [`ServiceFinderError::Status`] carrying the
    /// server's message when one is present.
    async fn send<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T> {
        let span = tracing::debug_span!("http_request", method = %method, url = %url);
        self.execute(method, url, body).instrument(span).await
    }

    async fn execute<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T> {
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.transport_error(&e))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.transport_error(&e))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
            tracing::debug!(status = status.as_u16(), message = %message, "request rejected");
            return Err(ServiceFinderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_slice(&bytes)
            .map_err(|e| ServiceFinderError::Decode(e.to_string()))?;

        tracing::debug!(status = status.as_u16(), bytes = bytes.len(), "request completed");
        Ok(envelope.data)
    }

    fn transport_error(&self, error: &reqwest::Error) -> ServiceFinderError {
        if error.is_timeout() {
            ServiceFinderError::Timeout(self.timeout)
        } else {
            ServiceFinderError::Network(error.to_string())
        }
    }
}

#[async_trait]
impl MarketplaceApi for HttpClient {
    async fn list_services(&self) -> Result<Vec<Service>> {
        self.get(&["api", "services"]).await
    }

    async fn list_services_by_category(&self, category: &str) -> Result<Vec<Service>> {
        self.get(&["api", "services", "category", category]).await
    }

    async fn get_service(&self, service_id: i64) -> Result<Service> {
        let id = service_id.to_string();
        self.get(&["api", "services", &id]).await
    }

    async fn create_service(&self, service: &NewService) -> Result<Service> {
        self.post(&["api", "services"], service).await
    }

    async fn list_reviews(&self, service_id: i64) -> Result<Vec<Review>> {
        let id = service_id.to_string();
        self.get(&["api", "services", &id, "reviews"]).await
    }

    async fn create_review(&self, review: &NewReview) -> Result<Review> {
        self.post(&["api", "services", "reviews"], review).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        HttpClient::new(base, Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn endpoint_joins_segments_onto_base() {
        let url = client("http://192.168.29.5:5000").endpoint(&["api", "services", "42"]).unwrap();
        assert_eq!(url.as_str(), "http://192.168.29.5:5000/api/services/42");
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let url = client("https://example.com/backend/").endpoint(&["api", "services"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/backend/api/services");
    }

    #[test]
    fn category_segment_is_percent_encoded() {
        let url = client("http://localhost:5000")
            .endpoint(&["api", "services", "category", "home care/repair"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/services/category/home%20care%2Frepair"
        );
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = HttpClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ServiceFinderError::Config(_)));

        let err = HttpClient::new("mailto:someone@example.com", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ServiceFinderError::Config(_)));
    }
}
