//! Errors that end a request early, and how they look on the wire.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::auth::SignatureError;

#[derive(Debug, Error)]
pub enum HandlerError {
    /// Signature missing or invalid. Nothing else about the request is
    /// looked at.
    #[error("invalid request signature: {0}")]
    Unauthorized(#[from] SignatureError),

    #[error("malformed interaction payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("unknown interaction type {0}")]
    UnknownType(i64),

    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    #[error("missing option {0:?}")]
    MissingOption(&'static str),

    #[error("completion failed: {0:#}")]
    Completion(anyhow::Error),
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::MalformedPayload(_)
            | Self::UnknownType(_)
            | Self::UnknownCommand(_)
            | Self::MissingOption(_) => StatusCode::BAD_REQUEST,
            Self::Completion(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message sent to the caller. Internal detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Unauthorized(_) => "Bad request signature".to_string(),
            Self::MalformedPayload(_) => "Malformed interaction payload".to_string(),
            Self::UnknownType(_) => "Unknown Type".to_string(),
            Self::UnknownCommand(_) => "Unknown Command".to_string(),
            Self::MissingOption(name) => format!("Missing {name} option"),
            Self::Completion(_) => "Error generating GPT-3 response".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_by_kind() {
        assert_eq!(
            HandlerError::Unauthorized(SignatureError::Mismatch).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(HandlerError::UnknownType(3).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            HandlerError::UnknownCommand("slap".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HandlerError::MissingOption("question").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HandlerError::Completion(anyhow::anyhow!("down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn public_message_hides_internal_detail() {
        let err = HandlerError::Completion(anyhow::anyhow!("sk-leaked in url"));
        assert_eq!(err.public_message(), "Error generating GPT-3 response");
        assert!(err.to_string().contains("sk-leaked"));
    }

    #[test]
    fn missing_option_names_the_option() {
        assert_eq!(
            HandlerError::MissingOption("question").public_message(),
            "Missing question option"
        );
    }

    #[test]
    fn display_names_the_command() {
        let err = HandlerError::UnknownCommand("slap".into());
        assert_eq!(err.to_string(), "unknown command \"slap\"");
    }
}
