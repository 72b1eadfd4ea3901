//! Declarative REST endpoints over axum.
//!
//! Each route is described as a value (path pattern, method, body shape,
//! handler) and the whole set is registered and served in one step, so
//! endpoint authors never touch the framework's request/response types.
//! Handlers receive a [`HandlerRequest`] with normalized path and query
//! parameters plus the decoded body, and resolve to a [`Reply`] or a
//! [`Fault`]; faults are encoded as `{"message": "<text>"}` with the
//! handler-chosen status. Malformed request bodies are rejected with
//! axum's own error responses before a handler ever runs.

pub mod config;
mod dispatch;
pub mod endpoint;
pub mod logging;
pub mod registry;
pub mod request;
pub mod response;

pub use endpoint::Endpoint;
pub use registry::{RegistrationError, RestService};
pub use request::{HandlerRequest, RequestHead};
pub use response::{Fault, HandlerResult, Reply};
