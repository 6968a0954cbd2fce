//! # Cart Commands
//!
//! Cart manipulation for both the POS counter and the storefront.
//!
//! ## Line Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Line Lifecycle                                  │
//! │                                                                         │
//! │  ┌──────────┐  add   ┌──────────┐  add/update  ┌──────────┐            │
//! │  │  absent  │───────►│  qty = 1 │─────────────►│  qty = n │            │
//! │  └──────────┘        └──────────┘              └──────────┘            │
//! │       ▲                                              │                  │
//! │       └──────── update(qty ≤ 0) / remove / clear ────┘                  │
//! │                                                                         │
//! │  Every arrow is checked against the variant's stock first.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use medwear_core::{
    AddOutcome, AddRequest, Cart, CartLine, Customization, LineKey, Margin, Money,
    VariantSelection,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commands::product::current_product;
use crate::error::ApiError;
use crate::state::{CartState, CatalogState, ConfigState, RemoteState};

/// One cart line as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    /// Pass back to `update_cart_item` / `remove_from_cart`.
    pub key: LineKey,
    #[serde(flatten)]
    pub line: CartLine,
    pub line_total: Money,
    /// POS only; the storefront ignores it.
    pub margin: Margin,
}

/// Cart response including lines and summary counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: usize,
    pub total_quantity: u32,
    pub subtotal: Money,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        CartView {
            lines: cart
                .items
                .iter()
                .map(|line| CartLineView {
                    key: line.key(),
                    line: line.clone(),
                    line_total: line.line_total(),
                    margin: line.margin(),
                })
                .collect(),
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
        }
    }
}

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState) -> CartView {
    debug!("get_cart command");
    cart.with_cart(|c| CartView::from(c))
}

/// Add-to-cart request from a product card or the variant picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    /// Defaults to 1.
    #[serde(default)]
    pub quantity: Option<i64>,
    /// Embroidery text; empty means none.
    #[serde(default)]
    pub customization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartResponse {
    pub outcome: AddOutcome,
    /// Set when the UI must tell the user something (partial add).
    pub notice: Option<String>,
    pub cart: CartView,
}

/// Adds a product variant to the cart.
///
/// ## Behavior
/// - Product is refreshed from the store API (cached copy if offline)
/// - Missing color/size → `NeedsVariantSelection`, cart unchanged
/// - Variant sold out → `INSUFFICIENT_STOCK`, cart unchanged
/// - More requested than left → what is left is added, with a notice
/// - Customization adds the configured surcharge to the unit price
pub async fn add_to_cart(
    remote: &RemoteState,
    catalog: &CatalogState,
    cart: &CartState,
    config: &ConfigState,
    request: AddToCartRequest,
) -> Result<AddToCartResponse, ApiError> {
    debug!(
        product_id = %request.product_id,
        color = ?request.color,
        size = ?request.size,
        quantity = ?request.quantity,
        "add_to_cart command"
    );

    let product = current_product(remote, catalog, &request.product_id).await?;

    let customization = match request.customization.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => {
            Some(Customization::new(text, config.customization_price)?)
        }
        _ => None,
    };
    let add = AddRequest {
        selection: VariantSelection::new(request.color.as_deref(), request.size.as_deref()),
        quantity: request.quantity.unwrap_or(1),
        customization,
    };
    let variant = add.selection.label();

    let (outcome, view) = cart.with_cart_mut(|c| {
        let outcome = c.add_item(&product, add)?;
        Ok::<_, ApiError>((outcome, CartView::from(&*c)))
    })?;

    let notice = match &outcome {
        AddOutcome::Clamped {
            added, available, ..
        } => {
            info!(product_id = %product.id, added, available, "Add clamped to stock");
            Some(format!(
                "Only {} of {}{} in stock; added {}",
                available,
                product.name,
                variant.map(|v| format!(" ({v})")).unwrap_or_default(),
                added
            ))
        }
        _ => None,
    };

    Ok(AddToCartResponse {
        outcome,
        notice,
        cart: view,
    })
}

/// Updates the quantity of a line.
///
/// ## Behavior
/// - Quantity ≤ 0: removes the line (no-op if already gone)
/// - Above the variant's stock: `INSUFFICIENT_STOCK`, nothing changes
pub async fn update_cart_item(
    remote: &RemoteState,
    catalog: &CatalogState,
    cart: &CartState,
    key: LineKey,
    quantity: i64,
) -> Result<CartView, ApiError> {
    debug!(product_id = %key.product_id, quantity, "update_cart_item command");

    if quantity <= 0 {
        return Ok(remove_from_cart(cart, &key));
    }

    let product = current_product(remote, catalog, &key.product_id).await?;
    cart.with_cart_mut(|c| {
        c.update_quantity(&key, quantity, &product)?;
        Ok::<_, ApiError>(CartView::from(&*c))
    })
}

/// Removes a line. Removing a line that is not there is a no-op.
pub fn remove_from_cart(cart: &CartState, key: &LineKey) -> CartView {
    debug!(product_id = %key.product_id, "remove_from_cart command");
    cart.with_cart_mut(|c| {
        c.remove_item(key);
        CartView::from(&*c)
    })
}

/// Clears the cart.
///
/// There is no undo, so when the store requires confirmation the UI must
/// pass `confirmed = true` after asking the user.
pub fn clear_cart(
    cart: &CartState,
    config: &ConfigState,
    confirmed: bool,
) -> Result<CartView, ApiError> {
    debug!(confirmed, "clear_cart command");

    if config.require_clear_confirmation && !confirmed {
        return Err(ApiError::cart("Confirm to clear the cart"));
    }

    Ok(cart.with_cart_mut(|c| {
        c.clear();
        CartView::from(&*c)
    }))
}
