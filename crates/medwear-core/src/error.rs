//! # Error Types
//!
//! Domain-specific error types for medwear-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medwear-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  medwear-http errors (separate crate)                                  │
//! │  └── HttpError        - Network / server failures                      │
//! │                                                                         │
//! │  medwear-client errors (app layer)                                     │
//! │  └── ApiError         - What the UI notification shows (serialized)    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │                         HttpError ──┴─► ApiError → Toast               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error in this crate is recoverable: the caller shows it and the
//! user retries. Nothing here is fatal.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// A function returning one of these has left its receiver unchanged.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product exists but is switched off for sale.
    #[error("{0} is not available for sale")]
    ProductUnavailable(String),

    /// Not enough stock for the requested variant.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Cart (White / M, qty: 1)
    ///      │
    ///      ▼
    /// Check cell: available=5, already in cart=5
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Classic Scrub Top", variant: "White / M", available: 5, requested: 6 }
    ///      │
    ///      ▼
    /// Toast: "Only 5 of Classic Scrub Top (White / M) in stock"
    /// ```
    #[error("Insufficient stock for {product}{}: available {available}, requested {requested}", variant_suffix(.variant))]
    InsufficientStock {
        product: String,
        variant: Option<String>,
        available: u32,
        requested: u32,
    },

    /// A color or size that the product does not offer.
    #[error("{product} has no {dimension} '{value}'")]
    UnknownVariant {
        product: String,
        dimension: String,
        value: String,
    },

    /// Cart line does not exist.
    #[error("Item not in cart: {0}")]
    LineNotFound(String),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Checkout attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Tendered amount does not cover the sale.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn variant_suffix(variant: &Option<String>) -> String {
    match variant {
        Some(label) => format!(" ({label})"),
        None => String::new(),
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur before any business logic runs and before any network call.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., not a number, too many decimals).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Collection has fewer entries than required.
    #[error("{field} needs at least {min} entries")]
    TooFew { field: String, min: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
