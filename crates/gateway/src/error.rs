//! Normalized errors for the gateway client.
//!
//! Every failure that leaves the gateway is one of these variants; raw
//! transport errors never cross the crate boundary.

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("unable to reach the server: {message}")]
    Transport { message: String },

    /// 401 on a credential exchange, or on a request sent without a token.
    #[error("{message}")]
    Unauthorized { message: String },

    /// 401 on a request that carried the session token.
    #[error("session expired: {message}")]
    SessionExpired { message: String },

    #[error("{message}")]
    Validation {
        status: u16,
        message: String,
        fields: BTreeMap<String, String>,
    },

    #[error("{message}")]
    NotFound { message: String },

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("unexpected response: {message}")]
    Decode { message: String },

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } | ApiError::SessionExpired { .. } => Some(401),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Validation { status, .. } | ApiError::Server { status, .. } => Some(*status),
            ApiError::Transport { .. } | ApiError::Decode { .. } | ApiError::Config(_) => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Transport { message }
            | ApiError::Unauthorized { message }
            | ApiError::SessionExpired { message }
            | ApiError::Validation { message, .. }
            | ApiError::NotFound { message }
            | ApiError::Server { message, .. }
            | ApiError::Decode { message } => message,
            ApiError::Config(message) => message,
        }
    }

    /// Per-field messages, when the backend named the offending fields.
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            ApiError::Validation { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired { .. })
    }

    /// Build the error for a non-2xx response.
    ///
    /// `session_request` is true when the request carried the session token
    /// and was not itself a credential exchange; only then does a 401 mean
    /// the session expired.
    pub fn from_response(status: StatusCode, body: &str, session_request: bool) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).ok();
        let message = parsed
            .as_ref()
            .and_then(ErrorBody::message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        match status {
            StatusCode::UNAUTHORIZED if session_request => ApiError::SessionExpired { message },
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized { message },
            StatusCode::NOT_FOUND => ApiError::NotFound { message },
            status if status.is_client_error() => ApiError::Validation {
                status: status.as_u16(),
                message,
                fields: parsed.map(ErrorBody::into_fields).unwrap_or_default(),
            },
            status => ApiError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode {
                message: error.to_string(),
            }
        } else {
            ApiError::Transport {
                message: error.to_string(),
            }
        }
    }
}

/// Error payload shapes the backend is known to send:
/// `{"error": "..."}`, `{"message": "..."}` and optional field maps under
/// `errors` or `fields`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, alias = "fields")]
    errors: Option<BTreeMap<String, Value>>,
}

impl ErrorBody {
    fn message(&self) -> Option<String> {
        match &self.error {
            Some(Value::String(text)) if !text.is_empty() => return Some(text.clone()),
            _ => {}
        }
        self.message.clone().filter(|text| !text.is_empty())
    }

    fn into_fields(self) -> BTreeMap<String, String> {
        self.errors
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(field, value)| first_text(value).map(|text| (field, text)))
            .collect()
    }
}

fn first_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Array(items) => items.into_iter().find_map(first_text),
        _ => None,
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, ApiError>;
