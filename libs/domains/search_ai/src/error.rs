use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use core_config::ConfigError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchAIError {
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Embedding provider fault: quota, auth, malformed or wrong-sized response.
    #[error("Embedding provider error: {message}")]
    Provider { message: String, transient: bool },

    /// Vector index fault: auth, schema mismatch, unexpected status.
    #[error("Search index error: {message}")]
    Store { message: String, transient: bool },

    /// Network-level failure talking to either upstream.
    #[error("Transport error: {message}")]
    Transport { message: String, transient: bool },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type SearchAIResult<T> = Result<T, SearchAIError>;

/// Statuses worth another attempt: throttling and server-side outages.
pub(crate) fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

impl SearchAIError {
    pub fn provider(message: impl Into<String>) -> Self {
        SearchAIError::Provider {
            message: message.into(),
            transient: false,
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        SearchAIError::Store {
            message: message.into(),
            transient: false,
        }
    }

    /// Provider error from a non-success HTTP response.
    pub fn provider_status(status: StatusCode, body: &str) -> Self {
        SearchAIError::Provider {
            message: format!("({}) {}", status, body),
            transient: is_transient_status(status),
        }
    }

    /// Store error from a non-success HTTP response.
    pub fn store_status(status: StatusCode, body: &str) -> Self {
        SearchAIError::Store {
            message: format!("({}) {}", status, body),
            transient: is_transient_status(status),
        }
    }

    /// Whether a bounded retry may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            SearchAIError::Provider { transient, .. }
            | SearchAIError::Store { transient, .. }
            | SearchAIError::Transport { transient, .. } => *transient,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SearchAIError {
    fn from(err: reqwest::Error) -> Self {
        let transient = err.is_timeout()
            || err.is_connect()
            || err.status().is_some_and(is_transient_status);
        SearchAIError::Transport {
            message: err.to_string(),
            transient,
        }
    }
}

impl From<serde_json::Error> for SearchAIError {
    fn from(err: serde_json::Error) -> Self {
        SearchAIError::Internal(format!("JSON error: {}", err))
    }
}

impl From<ConfigError> for SearchAIError {
    fn from(err: ConfigError) -> Self {
        SearchAIError::Config(err.to_string())
    }
}

/// Query-path mapping: upstream faults become 502, or 503 while transient.
impl From<SearchAIError> for AppError {
    fn from(err: SearchAIError) -> Self {
        let transient = err.is_transient();
        match err {
            SearchAIError::Validation(msg) => AppError::BadRequest(msg),
            e @ (SearchAIError::Provider { .. }
            | SearchAIError::Store { .. }
            | SearchAIError::Transport { .. }) => {
                if transient {
                    AppError::ServiceUnavailable(e.to_string())
                } else {
                    AppError::BadGateway(e.to_string())
                }
            }
            e @ SearchAIError::Config(_) => AppError::InternalServerError(e.to_string()),
            SearchAIError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for SearchAIError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
