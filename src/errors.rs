//! Typed error hierarchy for the agency back-office client.
//!
//! The backend failure taxonomy has three shapes, all handled the same way by
//! callers (abort the operation, show an error toast):
//! - transport failure → `ApiError::Transport` / `ApiError::Timeout`
//! - non-2xx response → `ApiError::Http`
//! - client-side form validation → `ApiError::Validation`

use thiserror::Error;

/// Fallback toast text when the backend gives no usable message.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// A client-side validation failure for a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors from talking to the agency REST backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {path} timed out")]
    Timeout { path: String },

    #[error("Backend returned {status} for {path}: {message}")]
    Http {
        status: u16,
        path: String,
        message: String,
    },

    #[error("Failed to decode response from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not signed in. Set AGENCY_API_TOKEN or api.token in desk.toml")]
    NotAuthenticated,

    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// The text to show in the error toast for this failure.
    pub fn toast_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Validation(err) => err.message.clone(),
            ApiError::NotAuthenticated => "Please sign in to continue.".to_string(),
            ApiError::Timeout { .. } => "The server took too long to respond.".to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    /// HTTP status for `Http` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"detail": ..}`, `{"error": ..}`, `{"message": ..}` and the
/// field-error maps Django REST returns (`{"email": ["Enter a valid email."]}`).
pub fn extract_server_message(body: &str) -> String {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return body.trim().chars().take(200).collect(),
    };

    for key in ["detail", "error", "message"] {
        if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
            return msg.to_string();
        }
    }

    if let Some(map) = value.as_object() {
        for (field, errors) in map {
            let first = match errors {
                serde_json::Value::Array(items) => items.first().and_then(|v| v.as_str()),
                serde_json::Value::String(s) => Some(s.as_str()),
                _ => None,
            };
            if let Some(msg) = first {
                return if field == "non_field_errors" {
                    msg.to_string()
                } else {
                    format!("{}: {}", field, msg)
                };
            }
        }
    }

    String::new()
}
