//! Client error types

use motordesk_core::CoreError;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or request error (no usable response)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The call is unauthenticated and stays that way: no session exists,
    /// or the replay after a refresh was rejected again
    #[error("authentication required: {0}")]
    AuthRequired(String),

    /// The refresh call itself failed; the session has been cleared
    #[error("session expired: {0}")]
    SessionExpired(String),

    /// Bad request
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Server returned an error status
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session storage failure
    #[error("session storage: {0}")]
    Session(#[from] CoreError),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthRequired(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Create error from a failed response, extracting the server message
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let message = error_message(response).await;
        Self::from_status(status, message)
    }

    /// Whether this error means the caller should log in again
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthRequired(_) | Self::SessionExpired(_))
    }
}

/// Best human-readable message for a failed response: the body's `message`
/// field when present, the raw body otherwise, the status line as a last
/// resort.
pub(crate) async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) if !body.trim().is_empty() => serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_owned)
            })
            .unwrap_or(body),
        _ => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, String::new()),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, String::new()),
            ApiError::AuthRequired(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, String::new()),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, String::new()),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, String::new()),
            ApiError::Server { status: 500, .. }
        ));
    }

    #[test]
    fn auth_errors_are_flagged() {
        assert!(ApiError::AuthRequired("no token".into()).is_auth_error());
        assert!(ApiError::SessionExpired("refresh failed".into()).is_auth_error());
        assert!(!ApiError::NotFound("missing".into()).is_auth_error());
    }
}
