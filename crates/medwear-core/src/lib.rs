//! # medwear-core: Pure Business Logic for Medwear
//!
//! This crate holds the variant inventory model and the cart / sale
//! arithmetic shared by the storefront, the admin console and the POS
//! screen. Everything here is pure: no network, no file system, no clock
//! beyond timestamping new cart lines.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Medwear Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Web frontend (storefront / admin / POS screen)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  medwear-client (app layer)                     │   │
//! │  │    add_to_cart, complete_sale, place_order, save_product ...    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ medwear-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌───────┐ │   │
//! │  │  │inventory │ │   cart   │ │ pricing  │ │   sale   │ │ deal  │ │   │
//! │  │  │ matrix   │ │  lines   │ │ totals   │ │  drafts  │ │bundles│ │   │
//! │  │  └──────────┘ └──────────┘ └──────────┘ └──────────┘ └───────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO HTTP • PURE FUNCTIONS                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             medwear-http (store API adapter)                    │   │
//! │  │       JSON wire format, variant-field decoding, repositories    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, variant selection, percent, payment/discount kinds
//! - [`money`] - Money type with integer arithmetic
//! - [`inventory`] - The color × size stock matrix and its product operations
//! - [`cart`] - Cart lines gated by stock
//! - [`pricing`] - Storefront and POS totals, change, margin
//! - [`sale`] - Sale / order request bodies and their server responses
//! - [`deal`] - Bundle drafts
//! - [`barcode`] - Scanner input classification and catalog search
//! - [`error`] / [`validation`] - Domain errors and input rules
//!
//! ## Example Usage
//!
//! ```rust
//! use medwear_core::{AddRequest, Cart, Dimension, Money, Product, VariantSelection};
//!
//! let mut top = Product::new("p1", "Classic Scrub Top", Money::from_major(2500));
//! top.add_dimension_value(Dimension::Color, "White").unwrap();
//! top.add_dimension_value(Dimension::Size, "M").unwrap();
//! top.set_cell("White", "M", 5).unwrap();
//!
//! let mut cart = Cart::new();
//! let white_m = VariantSelection::new(Some("White"), Some("M"));
//! cart.add_item(&top, AddRequest::one(white_m)).unwrap();
//!
//! assert_eq!(cart.subtotal(), Money::from_major(2500));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod barcode;
pub mod cart;
pub mod deal;
pub mod error;
pub mod inventory;
pub mod money;
pub mod pricing;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use barcode::{BarcodeClassifier, EnterAction};
pub use cart::{AddOutcome, AddRequest, Cart, CartLine, Customization, LineKey, StockAdjustment};
pub use deal::{Deal, DealDraft, DealItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::StockMatrix;
pub use money::Money;
pub use pricing::{ChangeDue, Discount, Margin, PosTotals, ShippingPolicy, StorefrontTotals, Tender};
pub use sale::{
    CustomerInfo, Order, OrderDraft, OrderItemDraft, Sale, SaleDraft, SaleItemDraft, SaleLine,
    ShippingAddress,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Catches typos at the counter (1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Upper bound for one stock cell or the scalar stock.
pub const MAX_STOCK_PER_CELL: i64 = 100_000;

/// Longest embroidery text accepted on a line.
pub const MAX_CUSTOMIZATION_LEN: usize = 60;

/// Stock at or below this shows a "low stock" badge.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;
