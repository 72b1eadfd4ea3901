use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// What a handler resolves to: a payload-bearing reply or a fault.
pub type HandlerResult = Result<Reply, Fault>;

/// Successful handler outcome: a status code and an optional JSON payload.
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    body: Option<Value>,
}

impl Reply {
    /// Reply with `payload` serialized as the JSON response body.
    pub fn json(status: StatusCode, payload: impl Serialize) -> Result<Self, Fault> {
        match serde_json::to_value(payload) {
            Ok(body) => Ok(Self {
                status,
                body: Some(body),
            }),
            Err(err) => Err(Fault::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to serialize response payload: {err}"),
            )),
        }
    }

    /// Reply with the given status and no payload at all.
    pub fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Failed handler outcome, carrying the handler-chosen status code and a
/// message. Encodes as `{"message": "<text>"}`; a fault always wins over
/// any payload the handler might have computed.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct Fault {
    status: StatusCode,
    message: String,
}

impl Fault {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Serialize)]
struct FaultBody {
    message: String,
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}

impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(FaultBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use http_body_util::BodyExt;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn reply_with_payload_encodes_json() {
        let reply = Reply::json(StatusCode::OK, json!({"x": 1})).expect("serializable payload");
        let response = reply.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        assert_eq!(body, "{\"x\":1}");
    }

    #[tokio::test]
    async fn reply_without_payload_has_empty_body() {
        let response = Reply::empty(StatusCode::NOT_FOUND).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn fault_encodes_message_envelope() {
        let fault = Fault::new(StatusCode::BAD_REQUEST, "name is required");
        let response = fault.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        assert_eq!(body, "{\"message\":\"name is required\"}");
    }

    #[test]
    fn unserializable_payload_becomes_internal_fault() {
        let payload = HashMap::from([((1, 2), "value")]);
        let fault = Reply::json(StatusCode::OK, payload).expect_err("tuple keys cannot serialize");
        assert_eq!(fault.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(fault.message().contains("serialize"));
    }

    #[test]
    fn fault_displays_its_message() {
        let fault = Fault::new(StatusCode::CONFLICT, "note already exists");
        assert_eq!(fault.to_string(), "note already exists");
        assert_eq!(fault.status(), StatusCode::CONFLICT);
    }
}
