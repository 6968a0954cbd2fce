//! # Validation Module
//!
//! Input validation utilities for Medwear.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web form                                                     │
//! │  ├── Required markers, input types                                     │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command (Rust)                                               │
//! │  └── THIS MODULE: reject before any network call                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store API (external)                                         │
//! │  └── Authoritative stock decrement, uniqueness                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invalid numeric input is always rejected with an error. Nothing in this
//! module floors a negative value to zero behind the caller's back.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Dimension;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_STOCK_PER_CELL};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an optional SKU.
///
/// ## Rules
/// - Between 1 and 50 characters once trimmed
/// - Only letters, digits, hyphens, underscores
///
/// ## Example
/// ```rust
/// use medwear_core::validation::validate_sku;
///
/// assert!(validate_sku("SCRB-TOP-01").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product or deal name (1..=200 characters).
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Example
/// ```rust
/// use medwear_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Classic Scrub Top").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

/// Validates a search query. Empty is allowed; the trimmed query is returned.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates and trims a new color or size value.
pub fn validate_dimension_value(dimension: Dimension, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: dimension.as_str().to_string(),
        });
    }

    if value.chars().count() > 40 {
        return Err(ValidationError::TooLong {
            field: dimension.as_str().to_string(),
            max: 40,
        });
    }

    Ok(value.to_string())
}

/// Validates a customer phone number (digits, spaces, `+`, `-`; 7-20 chars).
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !(7..=20).contains(&digits)
        || !phone
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '+' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be 7 to 20 digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Add Item                                                         │
/// │                                                                         │
/// │  Salesman enters quantity: 5                                           │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       └── OK → stock ceiling check (cart.rs)                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<u32> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(qty as u32)
}

/// Validates a stock count for a matrix cell or the scalar stock.
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<u32> {
    if !(0..=MAX_STOCK_PER_CELL).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_STOCK_PER_CELL,
        });
    }

    Ok(qty as u32)
}

/// Parses stock typed into an editor cell ("12", " 0 ").
///
/// ## Example
/// ```rust
/// use medwear_core::validation::parse_stock_input;
///
/// assert_eq!(parse_stock_input("12").unwrap(), 12);
/// assert!(parse_stock_input("-3").is_err());
/// assert!(parse_stock_input("2.5").is_err());
/// assert!(parse_stock_input("abc").is_err());
/// ```
pub fn parse_stock_input(input: &str) -> ValidationResult<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: "stock".to_string(),
        });
    }
    let qty: i64 = trimmed.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "stock".to_string(),
        reason: "must be a whole number".to_string(),
    })?;
    validate_stock_quantity(qty)
}

/// Validates a price (non-negative; zero is allowed for giveaways).
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of distinct lines) before adding one more.
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
