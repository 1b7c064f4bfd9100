//! Async façade over the state container.
//!
//! [`Store`] is the object screens hold a reference to. Each operation feeds an
//! [`Event`] through [`handle_event`], executes the resulting actions (backend
//! requests through the [`ApiWorker`], alerts into the alert queue) and feeds the
//! responses back in, so the resource triples settle before the call returns.
//!
//! # Concurrency
//!
//! State sits behind a `std::sync::Mutex` that is only held while an event is being
//! handled, never across an await. Operations may therefore run concurrently from
//! the same task (`tokio::join!`) or from spawned tasks sharing an `Arc<Store<_>>`;
//! their responses settle independently as each one arrives.

use crate::api::MarketplaceApi;
use crate::app::{handle_event, Action, AppState, CompletionPolicy, Event};
use crate::domain::{NewReview, NewService, Result, Review, Service, ServiceFinderError};
use crate::worker::{ApiResponse, ApiWorker};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;

/// First response of an operation, and whether the handler applied it.
#[derive(Debug)]
struct Settled {
    response: ApiResponse,
    applied: bool,
}

/// State container for the catalog and review resources.
///
/// # Examples
///
/// ```
/// use service_finder::api::{FixtureApi, FixtureData};
/// use service_finder::app::{CompletionPolicy, Store};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = Store::new(FixtureApi::new(FixtureData::default()), CompletionPolicy::default());
/// store.fetch_all_services().await?;
///
/// let (loading, count) = store.read(|state| (state.services.loading, state.services.data.len()))?;
/// assert!(!loading);
/// assert_eq!(count, 0);
/// # Ok::<(), service_finder::ServiceFinderError>(())
/// # }).unwrap();
/// ```
#[derive(Debug)]
pub struct Store<A> {
    state: Mutex<AppState>,
    worker: ApiWorker<A>,
    revision: watch::Sender<u64>,
}

impl<A: MarketplaceApi> Store<A> {
    /// Creates a store with empty resources.
    pub fn new(api: A, policy: CompletionPolicy) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: Mutex::new(AppState::new(policy)),
            worker: ApiWorker::new(api),
            revision,
        }
    }

    /// Returns the backend the store issues requests to.
    pub const fn api(&self) -> &A {
        self.worker.api()
    }

    /// Runs `f` against the current state.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Worker`] if the state lock is poisoned.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> Result<R> {
        let state = self.lock()?;
        Ok(f(&state))
    }

    /// Returns a copy of the current state.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Worker`] if the state lock is poisoned.
    pub fn snapshot(&self) -> Result<AppState> {
        self.read(AppState::clone)
    }

    /// Subscribes to state changes.
    ///
    /// The value is a revision counter bumped after every observable change; a
    /// front-end re-renders when it moves.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Loads the full catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Request`] with the same text stored in
    /// `services.error` if the request fails.
    pub async fn fetch_all_services(&self) -> Result<()> {
        Self::outcome(self.run(Event::FetchAllServices).await?).map(drop)
    }

    /// Loads the services of one category, leaving the full catalog untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Request`] if the request fails.
    pub async fn fetch_services_by_category(&self, category: &str) -> Result<()> {
        Self::outcome(
            self.run(Event::FetchServicesByCategory(category.to_string()))
                .await?,
        )
        .map(drop)
    }

    /// Loads one service.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Request`] if the request fails.
    pub async fn fetch_service_by_id(&self, service_id: i64) -> Result<()> {
        Self::outcome(self.run(Event::FetchServiceById(service_id)).await?).map(drop)
    }

    /// Loads the reviews of one service, clearing the current list first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Request`] if the request fails.
    pub async fn fetch_reviews(&self, service_id: i64) -> Result<()> {
        Self::outcome(self.run(Event::FetchReviews(service_id)).await?).map(drop)
    }

    /// Submits a new listing and returns it as stored by the server.
    ///
    /// The listing is not inserted into any loaded list; re-fetch to observe it.
    ///
    /// # Errors
    ///
    /// - [`ServiceFinderError::Validation`] if a required field is missing; no
    ///   request is issued
    /// - [`ServiceFinderError::Request`] if the backend rejects it
    ///
    /// Both also raise an alert.
    pub async fn create_service(&self, service: NewService) -> Result<Service> {
        match self.submit(Event::CreateService(service)).await? {
            ApiResponse::ServiceCreated { service } => Ok(service),
            other => Err(Self::unexpected("create service", &other)),
        }
    }

    /// Submits a new review and returns it as stored by the server.
    ///
    /// The review list is not updated; re-fetch to observe it.
    ///
    /// # Errors
    ///
    /// Same as [`create_service`](Self::create_service).
    pub async fn create_review(&self, review: NewReview) -> Result<Review> {
        match self.submit(Event::CreateReview(review)).await? {
            ApiResponse::ReviewCreated { review } => Ok(review),
            other => Err(Self::unexpected("create review", &other)),
        }
    }

    /// Raises a blocking alert.
    pub fn notify(&self, message: impl Into<String>) {
        let message = message.into();
        match self.lock() {
            Ok(mut state) => {
                tracing::debug!(alert = %message, "alert raised");
                state.push_alert(message);
            }
            Err(e) => {
                tracing::warn!(alert = %message, error = %e, "alert dropped");
                return;
            }
        }
        self.bump_revision();
    }

    /// Drains pending alerts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceFinderError::Worker`] if the state lock is poisoned.
    pub fn take_alerts(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.take_alerts())
    }

    fn lock(&self) -> Result<MutexGuard<'_, AppState>> {
        self.state
            .lock()
            .map_err(|e| ServiceFinderError::Worker(format!("state lock poisoned: {e}")))
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    /// Handles one event under the lock and returns whether state changed, plus
    /// the follow-up actions.
    fn dispatch(&self, event: &Event) -> Result<(bool, Vec<Action>)> {
        let handled = {
            let mut state = self.lock()?;
            handle_event(&mut state, event)
        };

        match handled {
            Ok((changed, actions)) => {
                if changed {
                    self.bump_revision();
                }
                Ok((changed, actions))
            }
            Err(e) => {
                // A rejected response still settles its resource as failed.
                if matches!(event, Event::ApiResponse { ticket: Some(_), .. }) {
                    self.bump_revision();
                }
                Err(e)
            }
        }
    }

    /// Runs an event and all follow-up actions to completion.
    ///
    /// Returns the response of the first request the event issued.
    async fn run(&self, event: Event) -> Result<Option<Settled>> {
        let mut queue: VecDeque<Action> = self.dispatch(&event)?.1.into();
        let mut first = None;

        while let Some(action) = queue.pop_front() {
            match action {
                Action::Alert(message) => self.notify(message),
                Action::Request { ticket, request } => {
                    let response = self.worker.handle_message(request).await;
                    let tracked = ticket.is_some();
                    let (changed, actions) = self.dispatch(&Event::ApiResponse {
                        ticket,
                        response: response.clone(),
                    })?;
                    queue.extend(actions);
                    first.get_or_insert(Settled {
                        response,
                        applied: changed || !tracked,
                    });
                }
            }
        }

        Ok(first)
    }

    /// Runs a create event, alerting on validation failures.
    async fn submit(&self, event: Event) -> Result<ApiResponse> {
        match self.run(event).await {
            Err(e @ ServiceFinderError::Validation(_)) => {
                self.notify(e.to_string());
                Err(e)
            }
            other => Self::outcome(other?),
        }
    }

    /// Maps the first response to the operation's result.
    ///
    /// A failure the handler discarded as superseded left no error in the triple,
    /// so it is not reported either.
    fn outcome(settled: Option<Settled>) -> Result<ApiResponse> {
        match settled {
            Some(Settled {
                response: ApiResponse::Error { message },
                applied: true,
            }) => Err(ServiceFinderError::Request(message)),
            Some(Settled { response, applied }) => {
                if !applied && response.is_error() {
                    tracing::debug!("superseded failure ignored");
                }
                Ok(response)
            }
            None => Err(ServiceFinderError::Worker("no request was issued".to_string())),
        }
    }

    fn unexpected(operation: &str, response: &ApiResponse) -> ServiceFinderError {
        ServiceFinderError::Worker(format!("unexpected response to {operation}: {response:?}"))
    }
}
