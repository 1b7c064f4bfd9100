//! Side effects emitted by the event handler.
//!
//! [`handle_event`](crate::app::handle_event) never performs I/O itself; it returns
//! a list of [`Action`]s that the [`Store`](crate::app::Store) executes in order.

use crate::app::resource::Ticket;
use crate::worker::ApiRequest;

/// Commands executed by the store after an event has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Executes a backend request through the API worker.
    ///
    /// The response is fed back as [`Event::ApiResponse`](crate::app::Event::ApiResponse)
    /// with the same ticket.
    Request {
        /// Resource the response settles; `None` for create operations, which
        /// do not write to any triple.
        ticket: Option<Ticket>,
        /// Request to execute.
        request: ApiRequest,
    },

    /// Raises a blocking alert for the user.
    Alert(String),
}
