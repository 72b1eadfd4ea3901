//! Per-request read model handed to handlers.
//!
//! Values are captured from the incoming request exactly as received: no
//! validation, coercion, or defaulting happens here.

use std::collections::HashMap;

use axum::extract::{RawPathParams, Request};
use axum::http::{HeaderMap, Method, StatusCode, Uri, Version};

use crate::response::Fault;

/// Normalized view of one incoming request: path parameters, multi-valued
/// query parameters, and the decoded body for methods that carry one.
///
/// Created fresh per request and owned by the single handler invocation
/// processing it.
#[derive(Debug)]
pub struct HandlerRequest<B> {
    /// One entry per named placeholder in the matched route.
    pub path_params: HashMap<String, String>,
    /// Query keys may repeat; values keep the order they arrived in.
    pub query_params: HashMap<String, Vec<String>>,
    /// Decoded request body. `None` for GET and DELETE endpoints.
    pub body: Option<B>,
    /// Raw request head, in case the fields above do not cover some
    /// special situation. Usually just ignore it.
    pub raw: RequestHead,
}

impl<B> HandlerRequest<B> {
    /// Value bound to a route placeholder, e.g. `id` in `/notes/{id}`.
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// First value for a query key, if any.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value for a query key, in arrival order.
    pub fn query_values(&self, name: &str) -> &[String] {
        self.query_params
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Take ownership of the decoded body. Faults with 500 when called on
    /// an endpoint whose method carries no body.
    pub fn into_body(self) -> Result<B, Fault> {
        self.body.ok_or_else(|| {
            Fault::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "request body is not available for this method",
            )
        })
    }
}

/// Copy of the incoming request head, taken before the body is consumed.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
}

impl RequestHead {
    pub(crate) fn capture(request: &Request) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            version: request.version(),
            headers: request.headers().clone(),
        }
    }
}

pub(crate) fn collect_path_params(params: &RawPathParams) -> HashMap<String, String> {
    params
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

pub(crate) fn collect_query_params(query: Option<&str>) -> HashMap<String, Vec<String>> {
    let mut collected: HashMap<String, Vec<String>> = HashMap::new();
    if let Some(query) = query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            collected
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_query_keys_keep_value_order() {
        let params = collect_query_params(Some("a=1&b=x&a=2&a=3"));
        assert_eq!(params["a"], vec!["1", "2", "3"]);
        assert_eq!(params["b"], vec!["x"]);
    }

    #[test]
    fn absent_query_yields_no_entries() {
        let params = collect_query_params(None);
        assert!(params.is_empty());
    }

    #[test]
    fn query_values_pass_through_as_strings() {
        let params = collect_query_params(Some("count=007&flag="));
        assert_eq!(params["count"], vec!["007"]);
        assert_eq!(params["flag"], vec![""]);
    }

    #[test]
    fn accessors_read_params_and_body() {
        let request = Request::builder()
            .uri("/notes/7?tag=a&tag=b")
            .body(axum::body::Body::empty())
            .expect("request build");

        let view = HandlerRequest {
            path_params: HashMap::from([("id".to_string(), "7".to_string())]),
            query_params: collect_query_params(Some("tag=a&tag=b")),
            body: Some(42u32),
            raw: RequestHead::capture(&request),
        };

        assert_eq!(view.path_param("id"), Some("7"));
        assert_eq!(view.query_param("tag"), Some("a"));
        assert_eq!(view.query_values("tag"), ["a", "b"]);
        assert!(view.query_values("missing").is_empty());
        assert_eq!(view.raw.uri.path(), "/notes/7");
        assert_eq!(view.into_body().expect("body present"), 42);
    }

    #[test]
    fn into_body_faults_when_absent() {
        let request = Request::builder()
            .uri("/notes")
            .body(axum::body::Body::empty())
            .expect("request build");

        let view: HandlerRequest<u32> = HandlerRequest {
            path_params: HashMap::new(),
            query_params: HashMap::new(),
            body: None,
            raw: RequestHead::capture(&request),
        };

        let fault = view.into_body().expect_err("expected missing body fault");
        assert_eq!(fault.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
