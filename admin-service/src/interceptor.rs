//! Maps failed backend requests to operator notifications.
//!
//! Every failure produces exactly one notification and is then handed back
//! to the caller as a [`ClientError`]; nothing is retried or swallowed.

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, error};

use crate::client::ClientError;
use crate::notify::{Notification, Notifier};

const NETWORK_ERROR: &str = "Unable to connect to the server. Please check your internet connection.";
const EXPORT_ERROR: &str = "Failed to export data. Please try again.";
const BAD_REQUEST: &str = "The request could not be processed.";
const UNAUTHORIZED: &str = "Your session has expired. Please log in again.";
const FORBIDDEN: &str = "You do not have permission to perform this action.";
const NOT_FOUND: &str = "The requested resource was not found.";
const VALIDATION_ERROR: &str = "The submitted data is invalid.";
const TOO_MANY_REQUESTS: &str = "Too many requests. Please wait a moment and try again.";
const SERVER_ERROR: &str = "An internal server error occurred. Please try again later.";
const BAD_GATEWAY: &str = "The server received an invalid response. Please try again later.";
const SERVICE_UNAVAILABLE: &str = "The service is temporarily unavailable. Please try again later.";
const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

/// What the caller expects the response body to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Json,
    Binary,
}

/// Error fields a backend may include in a failure body.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ErrorPayload {
    pub message: Option<String>,
    pub error: Option<String>,
    pub field_errors: Vec<String>,
}

impl ErrorPayload {
    /// Reads whatever error fields are present; unparseable bodies are empty.
    pub fn from_slice(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::default(),
        }
    }

    fn from_value(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
        };

        let field_errors: Vec<String> = value
            .get("errors")
            .and_then(Value::as_object)
            .map(|fields| {
                fields
                    .values()
                    .flat_map(|messages| match messages {
                        Value::Array(items) => items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect::<Vec<_>>(),
                        Value::String(message) => vec![message.clone()],
                        _ => Vec::new(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            message: text("message"),
            error: text("error"),
            field_errors,
        }
    }

    /// `message`, falling back to `error`.
    pub fn summary(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}

pub fn network_notification() -> Notification {
    Notification::new("Network Error", NETWORK_ERROR)
}

/// Notification for a response that arrived with a failure status.
///
/// `transport_text` is the generic description of the failed request.
pub fn notification_for_response(
    status: StatusCode,
    kind: ResponseKind,
    body: &[u8],
    transport_text: &str,
) -> Notification {
    let payload = ErrorPayload::from_slice(body);
    let or_fallback = |fallback: &str| payload.summary().unwrap_or(fallback).to_string();

    if kind == ResponseKind::Binary {
        return Notification::new("Export Error", or_fallback(EXPORT_ERROR));
    }

    match status.as_u16() {
        400 => Notification::new("Bad Request", or_fallback(BAD_REQUEST)),
        401 => Notification::new("Unauthorized", UNAUTHORIZED),
        403 => Notification::new("Forbidden", FORBIDDEN),
        404 => Notification::new("Not Found", NOT_FOUND),
        422 if !payload.field_errors.is_empty() => {
            Notification::new("Validation Error", payload.field_errors.join(", "))
        }
        422 => Notification::new("Validation Error", or_fallback(VALIDATION_ERROR)),
        429 => Notification::new("Too Many Requests", TOO_MANY_REQUESTS),
        500 => Notification::new("Server Error", SERVER_ERROR),
        502 => Notification::new("Bad Gateway", BAD_GATEWAY),
        503 => Notification::new("Service Unavailable", SERVICE_UNAVAILABLE),
        code => {
            let description = match payload.summary() {
                Some(summary) => summary.to_string(),
                None if !transport_text.is_empty() => transport_text.to_string(),
                None => UNEXPECTED_ERROR.to_string(),
            };
            Notification::new(format!("Error {code}"), description)
        }
    }
}

/// Status-only failure text; never carries the backend URL.
pub fn transport_text(status: StatusCode) -> String {
    format!("Request failed with status code {}", status.as_u16())
}

pub struct ErrorInterceptor {
    notifier: Arc<dyn Notifier>,
}

impl ErrorInterceptor {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Passes successful responses through; reports and returns failures.
    pub async fn intercept(
        &self,
        outcome: Result<reqwest::Response, reqwest::Error>,
        kind: ResponseKind,
    ) -> Result<reqwest::Response, ClientError> {
        let response = match outcome {
            Ok(response) if response.status().is_success() => return Ok(response),
            Ok(response) => response,
            Err(e) => {
                error!("Request to backend failed: {}", e);
                self.notifier.notify(network_notification());
                return Err(ClientError::Network(e));
            }
        };

        let status = response.status();
        let transport_text = transport_text(status);

        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                debug!("Could not read error body: {}", e);
                Vec::new()
            }
        };

        let notification = notification_for_response(status, kind, &body, &transport_text);
        error!(
            "Backend responded with {}: {}",
            status, notification.description
        );
        self.notifier.notify(notification);

        Err(ClientError::Status { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn notify_json(status: u16, body: Value) -> Notification {
        notification_for_response(
            StatusCode::from_u16(status).unwrap(),
            ResponseKind::Json,
            body.to_string().as_bytes(),
            "",
        )
    }

    #[test]
    fn test_network_notification() {
        let notification = network_notification();
        assert_eq!(notification.title, "Network Error");
        assert_eq!(notification.description, NETWORK_ERROR);
        assert_eq!(notification.duration, crate::notify::NOTIFICATION_DURATION);
    }

    #[test]
    fn test_bad_request_prefers_message_then_error() {
        let with_message = notify_json(400, json!({ "message": "Room number taken", "error": "dup" }));
        assert_eq!(with_message.title, "Bad Request");
        assert_eq!(with_message.description, "Room number taken");

        let with_error = notify_json(400, json!({ "error": "Malformed date" }));
        assert_eq!(with_error.description, "Malformed date");

        let empty_message = notify_json(400, json!({ "message": "", "error": "Malformed date" }));
        assert_eq!(empty_message.description, "Malformed date");

        let neither = notify_json(400, json!({}));
        assert_eq!(neither.description, BAD_REQUEST);
    }

    #[test]
    fn test_fixed_status_titles_ignore_server_message() {
        let cases = [
            (401, "Unauthorized", UNAUTHORIZED),
            (403, "Forbidden", FORBIDDEN),
            (404, "Not Found", NOT_FOUND),
            (429, "Too Many Requests", TOO_MANY_REQUESTS),
            (500, "Server Error", SERVER_ERROR),
            (502, "Bad Gateway", BAD_GATEWAY),
            (503, "Service Unavailable", SERVICE_UNAVAILABLE),
        ];

        for (status, title, description) in cases {
            let notification = notify_json(status, json!({ "message": "ignored" }));
            assert_eq!(notification.title, title, "status {status}");
            assert_eq!(notification.description, description, "status {status}");
        }
    }

    #[test]
    fn test_validation_errors_are_flattened_in_field_order() {
        let notification = notify_json(
            422,
            json!({
                "message": "The given data was invalid.",
                "errors": {
                    "number": ["The number field is required."],
                    "floor_id": ["The floor id must be an integer.", "The floor id is invalid."]
                }
            }),
        );

        assert_eq!(notification.title, "Validation Error");
        assert_eq!(
            notification.description,
            "The number field is required., The floor id must be an integer., The floor id is invalid."
        );
    }

    #[test]
    fn test_validation_without_field_errors_falls_back() {
        let with_message = notify_json(422, json!({ "message": "Dates overlap", "errors": {} }));
        assert_eq!(with_message.description, "Dates overlap");

        let bare = notify_json(422, json!({}));
        assert_eq!(bare.description, VALIDATION_ERROR);
    }

    #[test]
    fn test_other_status_uses_transport_text() {
        let from_server = notify_json(418, json!({ "error": "I'm a teapot" }));
        assert_eq!(from_server.title, "Error 418");
        assert_eq!(from_server.description, "I'm a teapot");

        let from_transport = notification_for_response(
            StatusCode::CONFLICT,
            ResponseKind::Json,
            b"<html>conflict</html>",
            "HTTP status client error (409 Conflict)",
        );
        assert_eq!(from_transport.title, "Error 409");
        assert_eq!(from_transport.description, "HTTP status client error (409 Conflict)");

        let fallback = notification_for_response(StatusCode::CONFLICT, ResponseKind::Json, b"", "");
        assert_eq!(fallback.description, UNEXPECTED_ERROR);
    }

    #[test]
    fn test_transport_text_omits_backend_url() {
        let text = transport_text(StatusCode::IM_A_TEAPOT);

        assert_eq!(text, "Request failed with status code 418");
        assert!(!text.contains("http"));
    }

    #[test]
    fn test_binary_requests_report_export_errors() {
        let embedded = notification_for_response(
            StatusCode::NOT_FOUND,
            ResponseKind::Binary,
            br#"{"message":"No reservations to export"}"#,
            "",
        );
        assert_eq!(embedded.title, "Export Error");
        assert_eq!(embedded.description, "No reservations to export");

        let opaque = notification_for_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ResponseKind::Binary,
            &[0x50, 0x4b, 0x03, 0x04],
            "",
        );
        assert_eq!(opaque.title, "Export Error");
        assert_eq!(opaque.description, EXPORT_ERROR);
    }

    #[test]
    fn test_payload_tolerates_odd_shapes() {
        let payload = ErrorPayload::from_slice(
            br#"{"message": 42, "error": "boom", "errors": {"a": "single", "b": [1, "two"]}}"#,
        );

        assert_eq!(payload.message, None);
        assert_eq!(payload.summary(), Some("boom"));
        assert_eq!(payload.field_errors, vec!["single", "two"]);
        assert_eq!(ErrorPayload::from_slice(b"not json"), ErrorPayload::default());
    }
}
