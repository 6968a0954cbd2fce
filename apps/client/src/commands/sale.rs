//! # Sale Commands
//!
//! POS summary panel and sale submission.
//!
//! ## Checkout at the Counter
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart ──► preview_sale_totals (every keystroke in discount / cash)     │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  Complete Sale ──► complete_sale                                        │
//! │              │                                                          │
//! │              ├── guard busy?           ──► REQUEST_IN_FLIGHT            │
//! │              ├── empty / short cash?   ──► error, nothing sent          │
//! │              ├── POST pos/sales fails  ──► server message, cart kept    │
//! │              └── 2xx                   ──► sold lines removed, receipt  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use medwear_core::{
    CustomerInfo, Discount, DiscountType, Money, PaymentMethod, PosTotals, Sale, SaleDraft, Tender,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::ApiError;
use crate::state::{CartState, ConfigState, RemoteState, SubmitGuard};

/// What the salesman has typed into the payment panel.
///
/// Amounts are the raw field text ("150", "12.5"); an empty field means
/// "nothing entered".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    #[serde(default)]
    pub discount_type: DiscountType,
    #[serde(default)]
    pub discount: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub amount_received: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SaleRequest {
    fn discount(&self) -> Result<Discount, ApiError> {
        Ok(Discount::parse(self.discount_type, &self.discount)?)
    }

    fn tender(&self) -> Result<Tender, ApiError> {
        match self.payment_method {
            PaymentMethod::Card => Ok(Tender::card()),
            PaymentMethod::Cash => {
                let received = match self.amount_received.as_deref().map(str::trim) {
                    Some(raw) if !raw.is_empty() => Some(
                        Money::parse_decimal(raw).map_err(medwear_core::CoreError::from)?,
                    ),
                    _ => None,
                };
                if received.is_some_and(|m| m.is_negative()) {
                    return Err(ApiError::new(
                        crate::error::ErrorCode::PaymentError,
                        "Amount received cannot be negative",
                    ));
                }
                Ok(Tender {
                    method: PaymentMethod::Cash,
                    amount_received: received,
                })
            }
        }
    }
}

/// Summary panel contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalePreview {
    pub totals: PosTotals,
    /// False while the cart is empty or the cash entered is short.
    pub can_complete: bool,
}

/// Recomputes the POS totals for what is in the cart and the panel.
///
/// Invalid discount or cash input is reported; the totals are never
/// computed from a silently corrected value.
pub fn preview_sale_totals(cart: &CartState, request: &SaleRequest) -> Result<SalePreview, ApiError> {
    let discount = request.discount()?;
    let tender = request.tender()?;

    Ok(cart.with_cart(|c| {
        let totals = PosTotals::compute(c, &discount, &tender);
        SalePreview {
            can_complete: !c.is_empty() && !totals.change.is_short(),
            totals,
        }
    }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub name: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Printable receipt for a completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub sale_id: String,
    pub receipt_number: String,
    pub store_name: String,
    pub timestamp: String,
    pub items: Vec<ReceiptItem>,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub amount_received: Option<Money>,
    pub change_given: Option<Money>,
    pub customer_name: Option<String>,
    /// `total` formatted in the store currency
    pub total_display: String,
}

impl ReceiptResponse {
    fn new(sale: Sale, config: &ConfigState) -> Self {
        ReceiptResponse {
            sale_id: sale.id,
            receipt_number: sale.receipt_number,
            store_name: config.store_name.clone(),
            timestamp: sale.created_at.unwrap_or_else(Utc::now).to_rfc3339(),
            items: sale
                .items
                .iter()
                .map(|line| ReceiptItem {
                    name: line.product_name.clone(),
                    color: line.color.clone(),
                    size: line.size.clone(),
                    quantity: line.quantity,
                    unit_price: line.price,
                    line_total: line.line_total(),
                })
                .collect(),
            subtotal: sale.subtotal,
            discount: sale.discount,
            total: sale.total,
            payment_method: sale.payment_method,
            amount_received: sale.amount_received,
            change_given: sale.change_given,
            customer_name: sale.customer_name,
            total_display: config.format_currency(sale.total.cents()),
        }
    }
}

/// Submits the sale for the current cart.
///
/// ## Behavior
/// - One network call; nothing is retried
/// - On success the sold quantities leave the cart and the receipt is
///   returned; anything added while the request was out stays
/// - On any failure the cart is left exactly as it was
pub async fn complete_sale(
    remote: &RemoteState,
    cart: &CartState,
    config: &ConfigState,
    guard: &SubmitGuard,
    request: SaleRequest,
) -> Result<ReceiptResponse, ApiError> {
    let _token = guard.try_begin()?;
    debug!(payment_method = ?request.payment_method, "complete_sale command");

    let discount = request.discount()?;
    let tender = request.tender()?;
    let customer = CustomerInfo::new(
        request.customer_name.as_deref(),
        request.customer_phone.as_deref(),
    )?;

    let (draft, submitted) = cart.with_cart(|c| {
        SaleDraft::from_cart(c, discount, tender, customer, request.notes.as_deref())
            .map(|draft| (draft, c.quantities()))
    })?;

    let sale = remote
        .inner()
        .sales()
        .create(&draft)
        .await
        .map_err(|err| {
            error!(error = %err, total = %draft.totals.total, "Sale submission failed");
            ApiError::from(err)
        })?;

    cart.with_cart_mut(|c| c.settle(&submitted));

    info!(
        sale_id = %sale.id,
        receipt_number = %sale.receipt_number,
        total = %sale.total,
        items = sale.items.len(),
        "Sale completed"
    );

    Ok(ReceiptResponse::new(sale, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use medwear_core::{AddRequest, ChangeDue, Product, VariantSelection};

    fn cart_with_subtotal_1000() -> CartState {
        let cart = CartState::new();
        let mut product = Product::new("p1", "Lab Coat", Money::from_major(1000));
        product.stock = 3;
        cart.with_cart_mut(|c| c.add_item(&product, AddRequest::one(VariantSelection::none())))
            .unwrap();
        cart
    }

    #[test]
    fn test_preview_percentage_discount_and_change() {
        let cart = cart_with_subtotal_1000();
        let request = SaleRequest {
            discount_type: DiscountType::Percentage,
            discount: "10".to_string(),
            amount_received: Some("1000".to_string()),
            ..SaleRequest::default()
        };

        let preview = preview_sale_totals(&cart, &request).unwrap();
        assert_eq!(preview.totals.discount_amount, Money::from_major(100));
        assert_eq!(preview.totals.total, Money::from_major(900));
        assert_eq!(preview.totals.change, ChangeDue::Due(Money::from_major(100)));
        assert!(preview.can_complete);
    }

    #[test]
    fn test_preview_short_cash_cannot_complete() {
        let cart = cart_with_subtotal_1000();
        let request = SaleRequest {
            discount_type: DiscountType::Percentage,
            discount: "10".to_string(),
            amount_received: Some("800".to_string()),
            ..SaleRequest::default()
        };

        let preview = preview_sale_totals(&cart, &request).unwrap();
        assert_eq!(preview.totals.change.amount(), None);
        assert!(!preview.can_complete);
    }

    #[test]
    fn test_preview_rejects_negative_discount() {
        let cart = cart_with_subtotal_1000();
        let request = SaleRequest {
            discount: "-5".to_string(),
            ..SaleRequest::default()
        };
        let err = preview_sale_totals(&cart, &request).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_card_ignores_amount_received() {
        let request = SaleRequest {
            payment_method: PaymentMethod::Card,
            amount_received: Some("5".to_string()),
            ..SaleRequest::default()
        };
        assert_eq!(request.tender().unwrap(), Tender::card());
    }
}
