use serde::Serialize;

use crate::services::api::ApiClient;
use crate::services::storage::audit;

/// Submission failures, one variant per user-facing category. Raw transport
/// errors and server bodies never reach the user; they are folded into the
/// variant message here and rendered through `title`/`description`.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("network unreachable: {0}")]
    Network(String),
    #[error("submission rejected: {0}")]
    Validation(String),
    #[error("authorization rejected: {0}")]
    Unauthorized(String),
    #[error("server fault: {0}")]
    Server(String),
    #[error("unexpected failure: {0}")]
    Unknown(String),
}

impl GatewayError {
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Network(_) => "NETWORK_UNREACHABLE",
            GatewayError::Validation(_) => "VALIDATION_REJECTED",
            GatewayError::Unauthorized(_) => "UNAUTHORIZED",
            GatewayError::Server(_) => "SERVER_FAULT",
            GatewayError::Unknown(_) => "UNKNOWN",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GatewayError::Network(_) => "Connection Problem",
            GatewayError::Validation(_) => "Submission Rejected",
            GatewayError::Unauthorized(_) => "Authorization Required",
            GatewayError::Server(_) => "Server Error",
            GatewayError::Unknown(_) => "Something Went Wrong",
        }
    }

    pub fn description(&self) -> String {
        match self {
            GatewayError::Network(_) => {
                "Could not reach the Workbridge API. Check your connection and retry; \
                 your answers are kept."
                    .to_string()
            }
            GatewayError::Validation(msg) => format!("The server rejected the submission: {}", msg),
            GatewayError::Unauthorized(_) => {
                "Your session is not authorized for this action. Sign in again or pass a valid \
                 --token."
                    .to_string()
            }
            GatewayError::Server(_) => {
                "The Workbridge API hit an internal error. Nothing was lost; retry in a moment."
                    .to_string()
            }
            GatewayError::Unknown(msg) => format!("Unexpected failure: {}", msg),
        }
    }
}

/// Map an HTTP status + body to the failure taxonomy. The server's own
/// `message` field is surfaced for 4xx rejections when present.
pub fn classify_response(status: u16, body: &str) -> GatewayError {
    let server_message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str().map(String::from)))
        .unwrap_or_else(|| format!("status {}", status));

    match status {
        401 | 403 => GatewayError::Unauthorized(server_message),
        400..=499 => GatewayError::Validation(server_message),
        500..=599 => GatewayError::Server(server_message),
        _ => GatewayError::Unknown(server_message),
    }
}

pub fn classify_transport(err: &reqwest::Error) -> GatewayError {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        GatewayError::Network(err.to_string())
    } else {
        GatewayError::Unknown(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmissionReceipt {
    pub id: String,
}

/// Serialize the whole payload and issue exactly one POST. No partial
/// submission, no client-side idempotency key: a retry after failure re-sends
/// the full payload.
pub fn submit<T: Serialize>(
    api: &ApiClient,
    path: &str,
    payload: &T,
) -> Result<SubmissionReceipt, GatewayError> {
    let body = api.post_json(path, payload)?;
    let id = body
        .get("id")
        .map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| "n/a".to_string());

    audit(
        "submission",
        serde_json::json!({ "path": path, "id": id }),
    );
    Ok(SubmissionReceipt { id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_and_server_faults_are_distinct_categories() {
        let unauthorized = classify_response(401, "{}");
        let fault = classify_response(500, "{}");
        assert_eq!(unauthorized.code(), "UNAUTHORIZED");
        assert_eq!(fault.code(), "SERVER_FAULT");
        assert_ne!(unauthorized.title(), fault.title());
    }

    #[test]
    fn server_message_is_surfaced_for_rejections() {
        let err = classify_response(400, r#"{"message":"email already registered"}"#);
        assert_eq!(err.code(), "VALIDATION_REJECTED");
        assert!(err.description().contains("email already registered"));
    }

    #[test]
    fn forbidden_is_treated_as_unauthorized() {
        assert_eq!(classify_response(403, "").code(), "UNAUTHORIZED");
    }

    #[test]
    fn non_json_bodies_fall_back_to_status_text() {
        let err = classify_response(502, "<html>bad gateway</html>");
        assert_eq!(err.code(), "SERVER_FAULT");
        assert!(err.to_string().contains("status 502"));
    }

    #[test]
    fn unexpected_status_maps_to_unknown() {
        assert_eq!(classify_response(302, "").code(), "UNKNOWN");
    }
}
