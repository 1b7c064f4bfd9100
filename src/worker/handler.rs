//! API worker: executes [`ApiRequest`]s against a [`MarketplaceApi`] backend.
//!
//! The worker owns the backend handle and turns every outcome into an
//! [`ApiResponse`], so the state layer only ever sees data, never a `Result`.

use crate::api::MarketplaceApi;
use crate::domain::Result;
use crate::worker::{ApiRequest, ApiResponse};
use tracing::Instrument;

/// Executes backend requests on behalf of the store.
///
/// Stateless apart from the backend handle; concurrent calls to
/// [`handle_message`](Self::handle_message) are independent requests.
#[derive(Debug, Clone)]
pub struct ApiWorker<A> {
    api: A,
}

impl<A: MarketplaceApi> ApiWorker<A> {
    /// Creates a worker around a backend.
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// Returns the backend this worker talks to.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Maps a backend result to a response with consistent logging.
    ///
    /// Failures keep only the display text of the error: that text is what ends up
    /// in a resource triple's `error` field or in an alert.
    fn handle_api_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> ApiResponse
    where
        F: FnOnce(T) -> ApiResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "api operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::debug!(operation = operation, error = %e, "api operation failed");
                ApiResponse::Error { message: e.to_string() }
            }
        }
    }

    /// Executes one request and returns its response.
    ///
    /// Never fails: backend errors become [`ApiResponse::Error`].
    pub async fn handle_message(&self, request: ApiRequest) -> ApiResponse {
        let span = tracing::debug_span!("worker_handle_message", operation = request.operation());
        self.dispatch(request).instrument(span).await
    }

    async fn dispatch(&self, request: ApiRequest) -> ApiResponse {
        let operation = request.operation();

        match request {
            ApiRequest::ListServices => {
                let result = self.api.list_services().await;
                Self::handle_api_result(operation, result, |services| {
                    tracing::debug!(service_count = services.len(), "services loaded");
                    ApiResponse::ServicesLoaded { services }
                })
            }

            ApiRequest::ListServicesByCategory { category } => {
                let result = self.api.list_services_by_category(&category).await;
                Self::handle_api_result(operation, result, |services| {
                    tracing::debug!(category = %category, service_count = services.len(), "category loaded");
                    ApiResponse::CategoryLoaded { category, services }
                })
            }

            ApiRequest::GetService { service_id } => {
                let result = self.api.get_service(service_id).await;
                Self::handle_api_result(operation, result, |service| ApiResponse::ServiceLoaded { service })
            }

            ApiRequest::CreateService { service } => {
                let result = self.api.create_service(&service).await;
                Self::handle_api_result(operation, result, |service| {
                    tracing::debug!(service_id = service.service_id, "service created");
                    ApiResponse::ServiceCreated { service }
                })
            }

            ApiRequest::ListReviews { service_id } => {
                let result = self.api.list_reviews(service_id).await;
                Self::handle_api_result(operation, result, |reviews| {
                    tracing::debug!(service_id, review_count = reviews.len(), "reviews loaded");
                    ApiResponse::ReviewsLoaded { service_id, reviews }
                })
            }

            ApiRequest::CreateReview { review } => {
                let result = self.api.create_review(&review).await;
                Self::handle_api_result(operation, result, |review| ApiResponse::ReviewCreated { review })
            }
        }
    }
}
