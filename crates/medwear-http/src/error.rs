//! # HTTP Error Types
//!
//! Error types for store API calls.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  reqwest::Error / non-2xx response / bad JSON                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  HttpError (this module) ← Keeps the server's own message              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in app layer) ← Serialized for the notification             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Frontend shows the server message, or a generic fallback              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::config::ConfigError;

/// Store API errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network, TLS or timeout failure. Nothing reached the server, or no
    /// response came back.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 404 for a specific resource.
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Any other non-2xx response.
    ///
    /// ## When This Occurs
    /// - Stock changed on the server (another salesman sold the last unit)
    /// - Server-side validation rejected the body
    /// - 5xx
    #[error("Server returned {status}{}", message_suffix(.message))]
    Server {
        status: u16,
        /// `error` or `message` from the JSON body, when there was one.
        message: Option<String>,
    },

    /// Response body did not have the expected shape.
    #[error("Could not decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Base URL cannot carry a path.
    #[error("Invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Bad client configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {m}"),
        None => String::new(),
    }
}

impl HttpError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        HttpError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        HttpError::Decode {
            context: context.into(),
            source,
        }
    }

    /// The message the server wants shown to the user, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            HttpError::Server {
                message: Some(m), ..
            } => Some(m.as_str()),
            _ => None,
        }
    }

    /// True when the request never produced a usable response.
    pub fn is_network(&self) -> bool {
        matches!(self, HttpError::Transport(_))
    }
}

/// Convenience type alias for Results with HttpError.
pub type HttpResult<T> = Result<T, HttpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_message() {
        let err = HttpError::Server {
            status: 409,
            message: Some("Only 2 left in stock".to_string()),
        };
        assert_eq!(err.to_string(), "Server returned 409: Only 2 left in stock");
        assert_eq!(err.server_message(), Some("Only 2 left in stock"));

        let err = HttpError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "Server returned 500");
        assert_eq!(err.server_message(), None);
    }
}
