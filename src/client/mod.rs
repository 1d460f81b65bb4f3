//! Client-side state: the filter engine, notifications and the application
//! context that ties them to a signed-in session.

pub mod context;
pub mod notifications;
pub mod query;

use axum::http::StatusCode;

/// Failure of a call to the API, as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The request never got an HTTP response.
    #[error("connection error")]
    Connection,

    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
}

impl ClientError {
    /// Builds the error from a non-success response body of the form
    /// `{"error": "..."}`.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
        ClientError::Server {
            status: status.as_u16(),
            message,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Server { status: 401, .. })
    }

    /// Text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Connection => "Connection error. Check your network and try again.".into(),
            ClientError::Server { message, .. } => message.clone(),
        }
    }
}
