//! # Checkout Commands
//!
//! Storefront cart totals and cash-on-delivery order placement.

use medwear_core::{Money, OrderDraft, ShippingAddress, StorefrontTotals};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::ApiError;
use crate::state::{CartState, ConfigState, RemoteState, SubmitGuard};

/// Storefront cart / checkout page totals.
///
/// `subtotal ≥ free_shipping_minimum` makes shipping free; otherwise the
/// configured fee applies.
pub fn preview_checkout(cart: &CartState, config: &ConfigState) -> StorefrontTotals {
    debug!("preview_checkout command");
    let policy = config.shipping_policy();
    cart.with_cart(|c| StorefrontTotals::compute(c, &policy))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: String,
    pub status: Option<String>,
    /// Server total when it sent one, else what the shopper saw.
    pub total: Money,
    pub payment_method: String,
}

/// Places a storefront order for the current cart.
///
/// The address is validated before anything is sent. The ordered lines
/// leave the cart only once the server has accepted the order; lines added
/// while it was in flight stay.
pub async fn place_order(
    remote: &RemoteState,
    cart: &CartState,
    config: &ConfigState,
    guard: &SubmitGuard,
    request: PlaceOrderRequest,
) -> Result<OrderConfirmation, ApiError> {
    let _token = guard.try_begin()?;
    debug!(city = %request.shipping_address.city, "place_order command");

    let policy = config.shipping_policy();
    let (draft, submitted) = cart.with_cart(|c| {
        OrderDraft::from_cart(
            c,
            &policy,
            request.shipping_address,
            request.notes.as_deref(),
        )
        .map(|draft| (draft, c.quantities()))
    })?;

    let order = remote
        .inner()
        .orders()
        .create(&draft)
        .await
        .map_err(|err| {
            error!(error = %err, total = %draft.total, "Order submission failed");
            ApiError::from(err)
        })?;

    cart.with_cart_mut(|c| c.settle(&submitted));
    info!(order_id = %order.id, total = %draft.total, "Order placed");

    Ok(OrderConfirmation {
        order_id: order.id,
        status: order.status,
        total: order.total.unwrap_or(draft.total),
        payment_method: OrderDraft::PAYMENT_METHOD.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use medwear_core::{AddRequest, Product, VariantSelection};

    #[test]
    fn test_free_shipping_threshold() {
        let cart = CartState::new();
        let config = ConfigState::default();
        let mut coat = Product::new("p1", "Lab Coat", Money::from_major(2500));
        coat.stock = 2;

        cart.with_cart_mut(|c| c.add_item(&coat, AddRequest::one(VariantSelection::none())))
            .unwrap();
        let totals = preview_checkout(&cart, &config);
        assert_eq!(totals.shipping, config.shipping_fee);
        assert_eq!(totals.amount_to_free_shipping, Money::from_major(2500));

        cart.with_cart_mut(|c| c.add_item(&coat, AddRequest::one(VariantSelection::none())))
            .unwrap();
        let totals = preview_checkout(&cart, &config);
        assert_eq!(totals.shipping, Money::zero());
        assert_eq!(totals.total, Money::from_major(5000));
    }
}
