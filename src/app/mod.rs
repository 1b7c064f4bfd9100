//! Application layer: client state, events, and the store that drives them.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Store operation → Event → handle_event → State mutation → Actions → ApiWorker
//!                             ↑                                          ↓
//!                             └──────────── Event::ApiResponse ──────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: side effects emitted by the event handler
//! - [`handler`]: event processing and resource settlement
//! - [`resource`]: the `{data, loading, error}` triple, tickets and completion policy
//! - [`state`]: the resource triples and derived values
//! - [`store`]: async façade screens hold a reference to

pub mod actions;
pub mod handler;
pub mod resource;
pub mod state;
pub mod store;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use resource::{CompletionPolicy, Resource, ResourceKey, Ticket};
pub use state::AppState;
pub use store::Store;
