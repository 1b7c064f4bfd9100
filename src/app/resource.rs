//! Asynchronous resource triples and request sequencing.
//!
//! Every piece of fetched state lives in a [`Resource`]: the `{data, loading, error}`
//! triple a screen renders from. Requests that feed a resource carry a [`Ticket`]
//! so that, under [`CompletionPolicy::LatestIssuedWins`], responses older than the
//! newest request for the same resource can be recognized and dropped.

use crate::domain::ServiceFinderError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// `{data, loading, error}` state of one asynchronous read.
///
/// # Lifecycle
///
/// ```text
/// begin  → loading = true,  error = None      (data kept unless the caller clears it)
/// succeed → loading = false, error = None, data = payload
/// fail    → loading = false, error = message   (data untouched)
/// ```
///
/// There is no transition back to idle; a resource is reset only by a new request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource<T> {
    /// Last successfully loaded payload.
    pub data: T,

    /// `true` while a request for this resource is outstanding.
    pub loading: bool,

    /// Display text of the last failure, cleared when a new request starts.
    pub error: Option<String>,

    /// Sequence number of the newest request issued for this resource.
    latest_issued: Option<u64>,
}

impl<T> Resource<T> {
    /// Marks a request with sequence number `seq` as issued.
    pub fn begin(&mut self, seq: u64) {
        self.loading = true;
        self.error = None;
        self.latest_issued = Some(seq);
    }

    /// Settles the resource with a payload.
    pub fn succeed(&mut self, data: T) {
        self.loading = false;
        self.error = None;
        self.data = data;
    }

    /// Settles the resource with a failure message, leaving `data` as it was.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Returns `true` if a newer request than `seq` has been issued.
    #[must_use]
    pub fn is_stale(&self, seq: u64) -> bool {
        self.latest_issued.is_some_and(|latest| seq < latest)
    }

    /// Returns `true` once any request has been issued for this resource.
    #[must_use]
    pub const fn is_requested(&self) -> bool {
        self.latest_issued.is_some()
    }
}

/// Identifies which resource triple a request feeds.
///
/// The single-service triple is one key regardless of the id requested: two fetches
/// for different ids compete for the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKey {
    AllServices,
    ServicesByCategory,
    ServiceById,
    Reviews,
}

/// A request's claim on a resource: the key and its issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    pub key: ResourceKey,
    pub seq: u64,
}

/// How out-of-order responses for the same resource are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Every response is applied as it arrives; the last one to settle wins even if
    /// it answers an older request.
    #[default]
    LastSettledWins,

    /// Responses older than the latest issued request for the same key are dropped.
    LatestIssuedWins,
}

impl FromStr for CompletionPolicy {
    type Err = ServiceFinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "last_settled_wins" => Ok(Self::LastSettledWins),
            "latest_issued_wins" => Ok(Self::LatestIssuedWins),
            other => Err(ServiceFinderError::Config(format!(
                "unknown completion policy {other:?}"
            ))),
        }
    }
}
