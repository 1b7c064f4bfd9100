//! Request execution for the state container.
//!
//! Every network operation the store needs is expressed as an [`ApiRequest`] and
//! executed by the [`ApiWorker`], which answers with an [`ApiResponse`].
//!
//! # Architecture
//!
//! - `messages`: request/response protocol types
//! - `handler`: worker implementation and request dispatch

pub mod handler;
pub mod messages;

pub use handler::ApiWorker;
pub use messages::{ApiRequest, ApiResponse};
