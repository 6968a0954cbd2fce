//! # API Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Medwear                                │
//! │                                                                         │
//! │  UI                          Rust                                       │
//! │  ──                          ────                                       │
//! │                                                                         │
//! │  completeSale()                                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Local rule broken? ── CoreError::InsufficientStock ──┐         │  │
//! │  │         │               (no network call made)        │         │  │
//! │  │         ▼                                             ▼         │  │
//! │  │  Server said no?  ──── HttpError::Server ──────────► ApiError ─►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  toast.error(e.message)     // server text, or a generic fallback      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error leaves application state exactly as it was before the
//! command ran.

use medwear_core::CoreError;
use medwear_http::HttpError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Shown when the server failed without telling us why.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Error returned from commands.
///
/// ## Serialization
/// This is what the UI receives when a command fails:
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for Classic Scrub Top (White / M): available 5, requested 6"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for the notification
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Store API unreachable or timed out
    NetworkError,

    /// Store API answered with an error status or an unreadable body
    ServerError,

    /// Business rule prevents the action
    BusinessLogic,

    /// Cart operation failed
    CartError,

    /// Insufficient stock
    InsufficientStock,

    /// Payment amount rejected
    PaymentError,

    /// The same submission is already running
    RequestInFlight,

    /// Unexpected failure
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a business rule error.
    pub fn business(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BusinessLogic, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }

    /// A second click while the first submission is still running.
    pub fn in_flight(action: &str) -> Self {
        ApiError::new(
            ErrorCode::RequestInFlight,
            format!("{} is already in progress", action),
        )
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::ProductUnavailable(_) => ApiError::business(message),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, message)
            }
            CoreError::UnknownVariant { .. } => ApiError::validation(message),
            CoreError::LineNotFound(_) | CoreError::CartTooLarge { .. } | CoreError::EmptyCart => {
                ApiError::cart(message)
            }
            CoreError::QuantityTooLarge { .. } => ApiError::validation(message),
            CoreError::InvalidPaymentAmount { .. } => {
                ApiError::new(ErrorCode::PaymentError, message)
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts store API errors to API errors.
///
/// The server's own message is passed through when it sent one; otherwise
/// the user sees [`GENERIC_FAILURE_MESSAGE`] and the details go to the log.
impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::NotFound { resource } => {
                ApiError::new(ErrorCode::NotFound, format!("{} not found", resource))
            }
            HttpError::Server {
                message: Some(message),
                ..
            } => ApiError::new(ErrorCode::ServerError, message),
            HttpError::Server {
                status,
                message: None,
            } => {
                error!(status, "Store API failed without a message");
                ApiError::new(ErrorCode::ServerError, GENERIC_FAILURE_MESSAGE)
            }
            HttpError::Transport(e) => {
                error!(error = %e, "Store API unreachable");
                ApiError::new(ErrorCode::NetworkError, GENERIC_FAILURE_MESSAGE)
            }
            HttpError::Decode { context, source } => {
                error!(%context, error = %source, "Unreadable store API response");
                ApiError::new(ErrorCode::ServerError, GENERIC_FAILURE_MESSAGE)
            }
            HttpError::InvalidUrl { .. } | HttpError::Config(_) => {
                error!(error = %err, "Store API client misconfigured");
                ApiError::internal(GENERIC_FAILURE_MESSAGE)
            }
        }
    }
}
