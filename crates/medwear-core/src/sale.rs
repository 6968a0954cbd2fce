//! # Sale & Order Drafts
//!
//! Reduces a cart to the record submitted at checkout, and models what the
//! server sends back.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POS                                   Storefront                       │
//! │                                                                         │
//! │  Cart + Discount + Tender              Cart + ShippingPolicy + Address  │
//! │         │                                        │                      │
//! │         ▼                                        ▼                      │
//! │  SaleDraft::from_cart  ◄── validates ──► OrderDraft::from_cart          │
//! │         │                                        │                      │
//! │         ▼   POST sale (one request)              ▼   POST order         │
//! │  Sale { receipt_number, change_given }   Order { id, status }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A draft is a snapshot: building it does not touch the cart, so a failed
//! submission leaves the cart exactly as it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::{Discount, PosTotals, ShippingPolicy, StorefrontTotals, Tender};
use crate::types::{DiscountType, PaymentMethod};
use crate::validation::{validate_name, validate_phone};

/// Notes longer than this are rejected before submission.
const MAX_NOTES_LEN: usize = 500;

fn clean_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn clean_notes(notes: Option<&str>) -> CoreResult<Option<String>> {
    let notes = clean_optional(notes);
    if notes.as_ref().is_some_and(|n| n.chars().count() > MAX_NOTES_LEN) {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        }
        .into());
    }
    Ok(notes)
}

// =============================================================================
// Customer
// =============================================================================

/// Optional walk-in customer details on a POS sale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl CustomerInfo {
    /// Trims both fields and validates whatever was provided.
    pub fn new(name: Option<&str>, phone: Option<&str>) -> CoreResult<Self> {
        let name = clean_optional(name);
        let phone = clean_optional(phone);
        if let Some(name) = &name {
            validate_name("customer name", name)?;
        }
        if let Some(phone) = &phone {
            validate_phone(phone)?;
        }
        Ok(CustomerInfo { name, phone })
    }
}

/// Delivery address captured at storefront checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: String,
    pub city: String,
    pub postal_code: Option<String>,
}

impl ShippingAddress {
    /// Name, phone, street address and city are required.
    pub fn validate(&self) -> CoreResult<()> {
        validate_name("full name", &self.full_name)?;
        validate_phone(&self.phone)?;
        for (field, value) in [("address", &self.address), ("city", &self.city)] {
            if value.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: field.to_string(),
                }
                .into());
            }
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            if !email.contains('@') {
                return Err(ValidationError::InvalidFormat {
                    field: "email".to_string(),
                    reason: "must be an email address".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

// =============================================================================
// POS Sale
// =============================================================================

/// One line of a sale submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemDraft {
    pub product_id: String,
    pub quantity: u32,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// The POST sale body, plus the totals the client computed for it.
///
/// The server re-prices the lines; `totals` is what the salesman saw and is
/// used for logging and for the pre-submission cash check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleDraft {
    pub items: Vec<SaleItemDraft>,
    pub customer: CustomerInfo,
    pub discount: Discount,
    pub payment_method: PaymentMethod,
    pub amount_received: Option<Money>,
    pub notes: Option<String>,
    pub totals: PosTotals,
}

impl SaleDraft {
    /// Builds the sale record for the current cart.
    ///
    /// ## Rules
    /// - The cart must not be empty
    /// - The discount must be valid (no negatives, at most 100%)
    /// - Cash received, when entered, must cover the total
    /// - Card sales never carry an amount received
    pub fn from_cart(
        cart: &Cart,
        discount: Discount,
        tender: Tender,
        customer: CustomerInfo,
        notes: Option<&str>,
    ) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        discount.validate()?;

        let amount_received = match tender.method {
            PaymentMethod::Cash => tender.amount_received,
            PaymentMethod::Card => None,
        };
        let tender = Tender {
            method: tender.method,
            amount_received,
        };
        let totals = PosTotals::compute(cart, &discount, &tender);

        if let Some(received) = amount_received {
            if received.is_negative() {
                return Err(CoreError::InvalidPaymentAmount {
                    reason: "amount received cannot be negative".to_string(),
                });
            }
            if received < totals.total {
                return Err(CoreError::InvalidPaymentAmount {
                    reason: format!(
                        "received {} is less than the total {}",
                        received, totals.total
                    ),
                });
            }
        }

        let items = cart
            .items
            .iter()
            .map(|line| SaleItemDraft {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                size: line.size.clone(),
                color: line.color.clone(),
            })
            .collect();

        Ok(SaleDraft {
            items,
            customer,
            discount,
            payment_method: tender.method,
            amount_received,
            notes: clean_notes(notes)?,
            totals,
        })
    }

    pub fn discount_type(&self) -> DiscountType {
        self.discount.kind
    }
}

/// A sale line as returned by the server, enriched with name and price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub price: Money,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl SaleLine {
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// A completed sale. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub receipt_number: String,
    pub items: Vec<SaleLine>,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub amount_received: Option<Money>,
    pub change_given: Option<Money>,
    pub customer_name: Option<String>,
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Storefront Order
// =============================================================================

/// One line of a storefront order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDraft {
    pub product_id: String,
    pub quantity: u32,
    /// Unit price including any customization surcharge.
    pub price: Money,
    pub size: Option<String>,
    pub color: Option<String>,
    pub customization: Option<String>,
    pub customization_price: Option<Money>,
}

/// The POST order body. Payment is always cash on delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub items: Vec<OrderItemDraft>,
    pub subtotal: Money,
    pub shipping_fee: Money,
    pub total: Money,
    pub shipping_address: ShippingAddress,
    pub notes: Option<String>,
}

impl OrderDraft {
    /// Storefront orders only support cash on delivery.
    pub const PAYMENT_METHOD: &'static str = "COD";

    pub fn from_cart(
        cart: &Cart,
        policy: &ShippingPolicy,
        shipping_address: ShippingAddress,
        notes: Option<&str>,
    ) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        shipping_address.validate()?;

        let totals = StorefrontTotals::compute(cart, policy);
        let items = cart
            .items
            .iter()
            .map(|line| OrderItemDraft {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                price: line.unit_price,
                size: line.size.clone(),
                color: line.color.clone(),
                customization: line.customization.as_ref().map(|c| c.text.clone()),
                customization_price: line.customization.as_ref().map(|c| c.price),
            })
            .collect();

        Ok(OrderDraft {
            items,
            subtotal: totals.subtotal,
            shipping_fee: totals.shipping,
            total: totals.total,
            shipping_address,
            notes: clean_notes(notes)?,
        })
    }
}

/// A placed storefront order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub status: Option<String>,
    pub total: Option<Money>,
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================
