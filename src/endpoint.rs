use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::http::Method;
use serde::de::DeserializeOwned;

use crate::dispatch::{self, DispatchFn};
use crate::request::HandlerRequest;
use crate::response::{Fault, Reply};

/// Declarative description of one route: path pattern, method, body shape,
/// and the handler invoked for matching requests.
///
/// The body shape `B` replaces a runtime type template: it is fixed at
/// construction and erased into the dispatch closure, so endpoints are
/// plain values that can be collected and registered together. `B` is
/// decoded for POST, PUT and PATCH endpoints only; GET and DELETE
/// endpoints never read a payload and conventionally use `()`.
pub struct Endpoint {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) dispatch: DispatchFn,
}

impl Endpoint {
    /// Describe one endpoint. `path` uses the router's placeholder syntax,
    /// e.g. `/notes/{id}`.
    ///
    /// Method support is checked at registration, not here.
    pub fn new<B, H, Fut>(method: Method, path: impl Into<String>, handler: H) -> Self
    where
        B: DeserializeOwned + Send + 'static,
        H: Fn(HandlerRequest<B>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply, Fault>> + Send + 'static,
    {
        let dispatch = dispatch::bind(&method, Arc::new(handler));
        Self {
            method,
            path: path.into(),
            dispatch,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
