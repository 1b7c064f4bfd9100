//! Event handling and state transition logic.
//!
//! This module implements the reducer of the client: it turns store operations and
//! worker responses into state changes and follow-up [`Action`]s.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. A store operation arrives as an [`Event`]
//! 2. [`handle_event`] marks the matching resource as loading and emits an
//!    [`Action::Request`] carrying a ticket
//! 3. The worker's answer comes back as [`Event::ApiResponse`] with that ticket
//! 4. The handler settles the resource, or drops the answer if it was superseded
//!
//! # Example
//!
//! ```
//! use service_finder::app::{handle_event, Action, AppState, Event};
//!
//! let mut state = AppState::default();
//! let (changed, actions) = handle_event(&mut state, &Event::FetchAllServices)?;
//! assert!(changed);
//! assert!(state.services.loading);
//! assert!(matches!(actions[0], Action::Request { .. }));
//! # Ok::<(), service_finder::ServiceFinderError>(())
//! ```

use crate::app::resource::{ResourceKey, Ticket};
use crate::app::{Action, AppState};
use crate::domain::{NewReview, NewService, Result, ServiceFinderError};
use crate::worker::{ApiRequest, ApiResponse};

/// Store operations and worker responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Loads the full catalog into `services`.
    FetchAllServices,

    /// Loads one category into `category_services`.
    FetchServicesByCategory(String),

    /// Loads one service into `service`.
    FetchServiceById(i64),

    /// Loads the reviews of one service into `reviews`.
    FetchReviews(i64),

    /// Submits a new listing. Validated before any request is issued.
    CreateService(NewService),

    /// Submits a new review. Validated before any request is issued.
    CreateReview(NewReview),

    /// Wraps a response from the API worker.
    ApiResponse {
        /// Ticket of the request this answers; `None` for creates.
        ticket: Option<Ticket>,
        response: ApiResponse,
    },
}

/// Processes an event, mutates state, and returns actions to execute.
///
/// # Returns
///
/// `(changed, actions)`: whether observable state changed, and the side effects to
/// run in order.
///
/// # Errors
///
/// - [`ServiceFinderError::Validation`] if a create event carries invalid input;
///   no request is issued and state is untouched
/// - [`ServiceFinderError::Worker`] if a response does not match the resource its
///   ticket names; that resource is settled as failed with the same text
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

    match event {
        Event::FetchAllServices => Ok(request(state, ResourceKey::AllServices, ApiRequest::ListServices)),

        Event::FetchServicesByCategory(category) => Ok(request(
            state,
            ResourceKey::ServicesByCategory,
            ApiRequest::ListServicesByCategory {
                category: category.clone(),
            },
        )),

        Event::FetchServiceById(service_id) => Ok(request(
            state,
            ResourceKey::ServiceById,
            ApiRequest::GetService {
                service_id: *service_id,
            },
        )),

        Event::FetchReviews(service_id) => Ok(request(
            state,
            ResourceKey::Reviews,
            ApiRequest::ListReviews {
                service_id: *service_id,
            },
        )),

        Event::CreateService(service) => {
            service.validate()?;
            tracing::debug!(name = %service.name, category = %service.category, "submitting service");
            Ok((
                false,
                vec![Action::Request {
                    ticket: None,
                    request: ApiRequest::CreateService {
                        service: service.clone(),
                    },
                }],
            ))
        }

        Event::CreateReview(review) => {
            review.validate()?;
            tracing::debug!(service_id = review.service_id, rating = %review.rating, "submitting review");
            Ok((
                false,
                vec![Action::Request {
                    ticket: None,
                    request: ApiRequest::CreateReview { review: review.clone() },
                }],
            ))
        }

        Event::ApiResponse { ticket, response } => match ticket {
            Some(ticket) => settle(state, ticket, response),
            None => Ok(untracked(response)),
        },
    }
}

fn request(state: &mut AppState, key: ResourceKey, request: ApiRequest) -> (bool, Vec<Action>) {
    let ticket = state.issue(key);
    (
        true,
        vec![Action::Request {
            ticket: Some(ticket),
            request,
        }],
    )
}

/// Applies a response to the resource its ticket names.
fn settle(state: &mut AppState, ticket: &Ticket, response: &ApiResponse) -> Result<(bool, Vec<Action>)> {
    if state.is_superseded(ticket) {
        tracing::debug!(key = ?ticket.key, seq = ticket.seq, "discarding superseded response");
        return Ok((false, vec![]));
    }

    match (ticket.key, response) {
        (ResourceKey::AllServices, ApiResponse::ServicesLoaded { services }) => {
            state.services.succeed(services.clone());
        }
        (ResourceKey::ServicesByCategory, ApiResponse::CategoryLoaded { category, services }) => {
            state.category_services.succeed(services.clone());
            state.active_category = Some(category.clone());
        }
        (ResourceKey::ServiceById, ApiResponse::ServiceLoaded { service }) => {
            state.service.succeed(Some(service.clone()));
        }
        (ResourceKey::Reviews, ApiResponse::ReviewsLoaded { service_id, reviews }) => {
            state.reviews.succeed(reviews.clone());
            state.reviews_service_id = Some(*service_id);
        }
        (key, ApiResponse::Error { message }) => {
            tracing::debug!(key = ?key, error = %message, "resource failed");
            state.fail(key, message);
        }
        (key, other) => {
            let error = ServiceFinderError::Worker(format!(
                "response {} cannot settle {key:?}",
                response_name(other)
            ));
            state.fail(key, &error.to_string());
            return Err(error);
        }
    }

    tracing::debug!(key = ?ticket.key, seq = ticket.seq, "resource settled");
    Ok((true, vec![]))
}

/// Handles responses to create requests, which touch no resource.
fn untracked(response: &ApiResponse) -> (bool, Vec<Action>) {
    match response {
        ApiResponse::Error { message } => (false, vec![Action::Alert(message.clone())]),
        other => {
            tracing::debug!(response = response_name(other), "create acknowledged");
            (false, vec![])
        }
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::FetchAllServices => "fetch_all_services",
        Event::FetchServicesByCategory(_) => "fetch_services_by_category",
        Event::FetchServiceById(_) => "fetch_service_by_id",
        Event::FetchReviews(_) => "fetch_reviews",
        Event::CreateService(_) => "create_service",
        Event::CreateReview(_) => "create_review",
        Event::ApiResponse { .. } => "api_response",
    }
}

const fn response_name(response: &ApiResponse) -> &'static str {
    match response {
        ApiResponse::ServicesLoaded { .. } => "ServicesLoaded",
        ApiResponse::CategoryLoaded { .. } => "CategoryLoaded",
        ApiResponse::ServiceLoaded { .. } => "ServiceLoaded",
        ApiResponse::ServiceCreated { .. } => "ServiceCreated",
        ApiResponse::ReviewsLoaded { .. } => "ReviewsLoaded",
        ApiResponse::ReviewCreated { .. } => "ReviewCreated",
        ApiResponse::Error { .. } => "Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::CompletionPolicy;
    use crate::domain::Service;

    fn service(id: i64) -> Service {
        serde_json::from_value(serde_json::json!({
            "service_id": id,
            "name": format!("Service {id}"),
            "category": "cleaning",
        }))
        .unwrap()
    }

    fn ticket_of(actions: &[Action]) -> Ticket {
        match &actions[0] {
            Action::Request { ticket: Some(ticket), .. } => *ticket,
            other => panic!("expected tracked request, got {other:?}"),
        }
    }

    fn respond(state: &mut AppState, ticket: Ticket, response: ApiResponse) -> (bool, Vec<Action>) {
        handle_event(
            state,
            &Event::ApiResponse {
                ticket: Some(ticket),
                response,
            },
        )
        .unwrap()
    }

    #[test]
    fn successful_fetch_settles_triple() {
        let mut state = AppState::default();
        let (_, actions) = handle_event(&mut state, &Event::FetchAllServices).unwrap();
        let ticket = ticket_of(&actions);

        respond(&mut state, ticket, ApiResponse::ServicesLoaded { services: vec![service(1)] });

        assert!(!state.services.loading);
        assert_eq!(state.services.error, None);
        assert_eq!(state.services.data, vec![service(1)]);
    }

    #[test]
    fn failed_fetch_records_error_and_keeps_data() {
        let mut state = AppState::default();
        state.category_services.succeed(vec![service(1)]);

        let (_, actions) =
            handle_event(&mut state, &Event::FetchServicesByCategory("cleaning".into())).unwrap();
        respond(
            &mut state,
            ticket_of(&actions),
            ApiResponse::Error {
                message: "Request failed with status code 500".into(),
            },
        );

        assert!(!state.category_services.loading);
        assert_eq!(
            state.category_services.error.as_deref(),
            Some("Request failed with status code 500")
        );
        assert_eq!(state.category_services.data, vec![service(1)]);
        assert!(state.services.data.is_empty());
    }

    #[test]
    fn invalid_service_is_rejected_without_request() {
        let mut state = AppState::default();
        let draft = NewService {
            name: "Painter".into(),
            description: "Walls".into(),
            price: "30".into(),
            category: String::new(),
            image_urls: vec!["file:///a.jpg".into()],
            ..Default::default()
        };

        let err = handle_event(&mut state, &Event::CreateService(draft)).unwrap_err();
        assert!(matches!(err, ServiceFinderError::Validation(_)));
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn failed_create_raises_alert() {
        let mut state = AppState::default();
        let (changed, actions) = handle_event(
            &mut state,
            &Event::ApiResponse {
                ticket: None,
                response: ApiResponse::Error {
                    message: "Network error: connection refused".into(),
                },
            },
        )
        .unwrap();

        assert!(!changed);
        assert_eq!(actions, vec![Action::Alert("Network error: connection refused".into())]);
    }

    #[test]
    fn superseded_response_is_dropped_when_guarded() {
        let mut state = AppState::new(CompletionPolicy::LatestIssuedWins);
        let (_, first) = handle_event(&mut state, &Event::FetchServiceById(1)).unwrap();
        let (_, second) = handle_event(&mut state, &Event::FetchServiceById(2)).unwrap();

        respond(&mut state, ticket_of(&second), ApiResponse::ServiceLoaded { service: service(2) });
        let (changed, _) = respond(&mut state, ticket_of(&first), ApiResponse::ServiceLoaded { service: service(1) });

        assert!(!changed);
        assert_eq!(state.service.data, Some(service(2)));
    }

    #[test]
    fn mismatched_response_is_a_worker_error() {
        let mut state = AppState::default();
        let (_, actions) = handle_event(&mut state, &Event::FetchReviews(1)).unwrap();

        let err = handle_event(
            &mut state,
            &Event::ApiResponse {
                ticket: Some(ticket_of(&actions)),
                response: ApiResponse::ServicesLoaded { services: vec![] },
            },
        )
        .unwrap_err();
        assert!(matches!(err, ServiceFinderError::Worker(_)));
        assert!(!state.reviews.loading);
        assert_eq!(state.reviews.error, Some(err.to_string()));
    }
}
