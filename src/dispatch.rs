//! Bridges axum's native request to the [`HandlerRequest`] a handler sees,
//! and turns the handler's outcome back into a wire response.
//!
//! Malformed or mistyped bodies are answered by axum's own rejection
//! response before the handler runs; only faults returned by a handler use
//! the `{"message": ...}` envelope. The two error shapes differ on
//! purpose: decode errors belong to the transport, faults to the handler.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{FromRequest, RawPathParams, Request};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::{Json, RequestExt};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::request::{self, HandlerRequest, RequestHead};
use crate::response::{Fault, Reply};

pub(crate) type DispatchFuture = Pin<Box<dyn Future<Output = Response> + Send>>;
pub(crate) type DispatchFn = Arc<dyn Fn(Request) -> DispatchFuture + Send + Sync>;

fn carries_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}

/// Build the per-endpoint dispatch closure. The branch on the method is
/// taken once here, not per request: GET and DELETE endpoints get a
/// closure that never touches the request payload.
pub(crate) fn bind<B, H, Fut>(method: &Method, handler: Arc<H>) -> DispatchFn
where
    B: DeserializeOwned + Send + 'static,
    H: Fn(HandlerRequest<B>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Reply, Fault>> + Send + 'static,
{
    if carries_body(method) {
        Arc::new(move |request: Request| -> DispatchFuture {
            let handler = Arc::clone(&handler);
            Box::pin(dispatch_with_body(handler, request))
        })
    } else {
        Arc::new(move |request: Request| -> DispatchFuture {
            let handler = Arc::clone(&handler);
            Box::pin(dispatch_without_body(handler, request))
        })
    }
}

async fn dispatch_without_body<B, H, Fut>(handler: Arc<H>, mut request: Request) -> Response
where
    B: DeserializeOwned + Send + 'static,
    H: Fn(HandlerRequest<B>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Reply, Fault>> + Send + 'static,
{
    let started_at = Instant::now();
    let head = RequestHead::capture(&request);
    let method = head.method.clone();
    let path = head.uri.path().to_string();

    let path_params = match request.extract_parts::<RawPathParams>().await {
        Ok(params) => request::collect_path_params(&params),
        Err(rejection) => return rejection.into_response(),
    };
    let query_params = request::collect_query_params(head.uri.query());

    let view = HandlerRequest {
        path_params,
        query_params,
        body: None,
        raw: head,
    };

    encode(handler(view).await, &method, &path, started_at)
}

async fn dispatch_with_body<B, H, Fut>(handler: Arc<H>, mut request: Request) -> Response
where
    B: DeserializeOwned + Send + 'static,
    H: Fn(HandlerRequest<B>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Reply, Fault>> + Send + 'static,
{
    let started_at = Instant::now();
    let head = RequestHead::capture(&request);
    let method = head.method.clone();
    let path = head.uri.path().to_string();

    let path_params = match request.extract_parts::<RawPathParams>().await {
        Ok(params) => request::collect_path_params(&params),
        Err(rejection) => return rejection.into_response(),
    };
    let query_params = request::collect_query_params(head.uri.query());

    // A fresh instance per request; the rejection path never reaches the
    // handler.
    let body = match Json::<B>::from_request(request, &()).await {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!(
                method = %method,
                path = %path,
                error = %rejection,
                "request body rejected"
            );
            return rejection.into_response();
        }
    };

    let view = HandlerRequest {
        path_params,
        query_params,
        body: Some(body),
        raw: head,
    };

    encode(handler(view).await, &method, &path, started_at)
}

fn encode(
    outcome: Result<Reply, Fault>,
    method: &Method,
    path: &str,
    started_at: Instant,
) -> Response {
    let response = match outcome {
        Ok(reply) => reply.into_response(),
        Err(fault) => {
            warn!(
                method = %method,
                path = %path,
                status = fault.status().as_u16(),
                message = %fault,
                "handler fault"
            );
            fault.into_response()
        }
    };

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = started_at.elapsed().as_millis() as u64,
        "request summary"
    );

    response
}
