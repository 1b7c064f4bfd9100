//! Central client state.
//!
//! [`AppState`] holds every resource triple the screens render from, plus the
//! pending alert queue. It is owned by a [`Store`](crate::app::Store) and mutated
//! only through [`handle_event`](crate::app::handle_event).

use crate::app::resource::{CompletionPolicy, Resource, ResourceKey, Ticket};
use crate::domain::{average_rating, Review, Service};

/// Client-side catalog and review state.
///
/// # Resources
///
/// - `services`: the "all services" listing (home screen)
/// - `category_services`: the listing of one category, independent from `services`
///   so a category view never disturbs the unscoped list
/// - `service`: one service by id; `None` until a fetch succeeds
/// - `reviews`: reviews of one service, cleared whenever a new fetch starts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub services: Resource<Vec<Service>>,

    pub category_services: Resource<Vec<Service>>,

    /// Category the `category_services` data belongs to.
    pub active_category: Option<String>,

    pub service: Resource<Option<Service>>,

    pub reviews: Resource<Vec<Review>>,

    /// Service the `reviews` data belongs to.
    pub reviews_service_id: Option<i64>,

    /// Reconciliation policy for out-of-order responses.
    pub policy: CompletionPolicy,

    /// Last sequence number handed out; shared by all keys.
    next_seq: u64,

    /// Alerts raised but not yet shown.
    alerts: Vec<String>,
}

impl AppState {
    /// Creates empty state with the given completion policy.
    #[must_use]
    pub fn new(policy: CompletionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Issues a ticket for `key` and marks the matching resource as loading.
    ///
    /// Starting a review fetch also clears the current review list so a screen
    /// never shows the reviews of a different service while loading.
    pub fn issue(&mut self, key: ResourceKey) -> Ticket {
        self.next_seq += 1;
        let seq = self.next_seq;

        match key {
            ResourceKey::AllServices => self.services.begin(seq),
            ResourceKey::ServicesByCategory => self.category_services.begin(seq),
            ResourceKey::ServiceById => self.service.begin(seq),
            ResourceKey::Reviews => {
                self.reviews.data.clear();
                self.reviews.begin(seq);
            }
        }

        tracing::trace!(key = ?key, seq, "ticket issued");
        Ticket { key, seq }
    }

    /// Returns `true` if the response for `ticket` must be dropped under the
    /// current policy.
    #[must_use]
    pub fn is_superseded(&self, ticket: &Ticket) -> bool {
        if self.policy == CompletionPolicy::LastSettledWins {
            return false;
        }

        match ticket.key {
            ResourceKey::AllServices => self.services.is_stale(ticket.seq),
            ResourceKey::ServicesByCategory => self.category_services.is_stale(ticket.seq),
            ResourceKey::ServiceById => self.service.is_stale(ticket.seq),
            ResourceKey::Reviews => self.reviews.is_stale(ticket.seq),
        }
    }

    /// Settles the resource behind `key` with a failure message.
    pub fn fail(&mut self, key: ResourceKey, message: &str) {
        match key {
            ResourceKey::AllServices => self.services.fail(message),
            ResourceKey::ServicesByCategory => self.category_services.fail(message),
            ResourceKey::ServiceById => self.service.fail(message),
            ResourceKey::Reviews => self.reviews.fail(message),
        }
    }

    /// Queues an alert.
    pub fn push_alert(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
    }

    /// Drains queued alerts in the order they were raised.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    /// Services in the "all services" listing sharing the loaded service's
    /// category, excluding the loaded service itself.
    ///
    /// Empty while no service is loaded.
    #[must_use]
    pub fn related_services(&self) -> Vec<&Service> {
        let Some(current) = self.service.data.as_ref() else {
            return Vec::new();
        };

        self.services
            .data
            .iter()
            .filter(|candidate| current.is_related_to(candidate))
            .collect()
    }

    /// Mean rating of the loaded reviews, `0.0` when there are none.
    #[must_use]
    pub fn average_rating(&self) -> f64 {
        average_rating(&self.reviews.data)
    }
}
