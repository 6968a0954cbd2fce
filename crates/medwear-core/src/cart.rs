//! # Cart
//!
//! Line items bound to a specific product variant, gated by stock on every
//! mutation. The same type backs the storefront cart and the POS cart; only
//! the totals differ (see [`crate::pricing`]).
//!
//! ## Line Lifecycle
//! ```text
//!   absent ──add──► present(qty=1) ──add/update──► present(qty=n)
//!     ▲                                                  │
//!     └────────── update(qty <= 0) / remove ─────────────┘
//! ```
//!
//! ## Stock Ceiling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  available  = product.available_for(color, size)                       │
//! │  in_cart    = Σ quantity of every line for (product, color, size)      │
//! │                                                                         │
//! │  add(n):     remaining = available - in_cart                           │
//! │              remaining == 0 → InsufficientStock, nothing changes       │
//! │              n > remaining  → add `remaining`, report Clamped          │
//! │                                                                         │
//! │  update(n):  in_cart - line + n > available → InsufficientStock        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Two lines can share a variant when their customization text differs, so
//! the ceiling is checked against the sum rather than a single line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::Margin;
use crate::types::{Dimension, Product, VariantSelection};
use crate::validation::{validate_cart_size, validate_price, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_CUSTOMIZATION_LEN, MAX_ITEM_QUANTITY};

// =============================================================================
// Customization
// =============================================================================

/// Embroidery / name printing requested for a line, with its surcharge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    pub text: String,
    pub price: Money,
}

impl Customization {
    /// Validates and trims the customization request.
    pub fn new(text: &str, price: Money) -> CoreResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::Required {
                field: "customization".to_string(),
            }
            .into());
        }
        if text.chars().count() > MAX_CUSTOMIZATION_LEN {
            return Err(ValidationError::TooLong {
                field: "customization".to_string(),
                max: MAX_CUSTOMIZATION_LEN,
            }
            .into());
        }
        validate_price("customization price", price)?;
        Ok(Customization {
            text: text.to_string(),
            price,
        })
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineKey {
    pub product_id: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub customization: Option<String>,
}

impl LineKey {
    pub fn new(product_id: impl Into<String>, selection: &VariantSelection) -> Self {
        LineKey {
            product_id: product_id.into(),
            color: selection.color.clone(),
            size: selection.size.clone(),
            customization: None,
        }
    }

    pub fn with_customization(mut self, text: Option<&str>) -> Self {
        self.customization = text.map(str::to_string);
        self
    }

    fn same_variant(&self, other: &LineKey) -> bool {
        self.product_id == other.product_id && self.color == other.color && self.size == other.size
    }

    fn describe(&self) -> String {
        match VariantSelection::new(self.color.as_deref(), self.size.as_deref()).label() {
            Some(label) => format!("{} ({})", self.product_id, label),
            None => self.product_id.clone(),
        }
    }
}

/// One product variant in the cart.
///
/// ## Design Notes
/// Name, prices and image are frozen when the line is created, so the cart
/// keeps showing what the customer agreed to even if the catalog changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub sku: Option<String>,
    pub image: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
    /// Product price at add time (sale price if any), without customization.
    pub base_price: Money,
    pub customization: Option<Customization>,
    /// `base_price` plus the customization surcharge.
    pub unit_price: Money,
    /// Cost at add time (POS margin display only).
    pub cost_price: Money,
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    fn from_product(
        product: &Product,
        selection: &VariantSelection,
        quantity: u32,
        customization: Option<Customization>,
    ) -> Self {
        let base_price = product.unit_price();
        let surcharge = customization
            .as_ref()
            .map(|c| c.price)
            .unwrap_or_default();
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            sku: product.sku.clone(),
            image: product.image_for(selection.color.as_deref()).map(str::to_string),
            color: selection.color.clone(),
            size: selection.size.clone(),
            quantity,
            base_price,
            customization,
            unit_price: base_price + surcharge,
            cost_price: product.cost_price,
            added_at: Utc::now(),
        }
    }

    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id.clone(),
            color: self.color.clone(),
            size: self.size.clone(),
            customization: self.customization.as_ref().map(|c| c.text.clone()),
        }
    }

    pub fn selection(&self) -> VariantSelection {
        VariantSelection::new(self.color.as_deref(), self.size.as_deref())
    }

    /// unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }

    /// cost price × quantity.
    pub fn line_cost(&self) -> Money {
        self.cost_price * self.quantity
    }

    /// Per-unit profit and margin for the POS display.
    pub fn margin(&self) -> Margin {
        Margin::for_unit(self.unit_price, self.cost_price)
    }
}

// =============================================================================
// Add Request / Outcome
// =============================================================================

/// What the caller wants to put in the cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AddRequest {
    #[serde(default)]
    pub selection: VariantSelection,
    /// Signed so that negative input reaches validation instead of wrapping.
    pub quantity: i64,
    #[serde(default)]
    pub customization: Option<Customization>,
}

impl AddRequest {
    pub fn one(selection: VariantSelection) -> Self {
        AddRequest {
            selection,
            quantity: 1,
            customization: None,
        }
    }
}

/// Result of an add that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AddOutcome {
    /// Everything requested was added; `quantity` is the line's new quantity.
    Added { quantity: u32 },
    /// Only part of the request fit in stock. The caller must notify.
    #[serde(rename_all = "camelCase")]
    Clamped {
        added: u32,
        requested: u32,
        available: u32,
        quantity: u32,
    },
    /// The product needs a color and/or size picked first. Nothing changed.
    #[serde(rename_all = "camelCase")]
    NeedsVariantSelection {
        missing: Vec<Dimension>,
        colors: Vec<String>,
        sizes: Vec<String>,
    },
}

/// A line changed by [`Cart::revalidate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    pub key: LineKey,
    pub name: String,
    pub previous: u32,
    /// 0 means the line was removed.
    pub now: u32,
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - For every (product, color, size), Σ line quantities ≤ available stock
///   as of the last mutation.
/// - Every line has quantity ≥ 1.
/// - At most `MAX_CART_ITEMS` lines, each at most `MAX_ITEM_QUANTITY`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartLine>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a product variant, or increases the matching line.
    ///
    /// ## Behavior
    /// - Missing color/size on a product that offers them →
    ///   `NeedsVariantSelection` (no change).
    /// - Nothing left for the variant → `InsufficientStock` (no change).
    /// - More requested than left → adds what is left, returns `Clamped`.
    pub fn add_item(&mut self, product: &Product, request: AddRequest) -> CoreResult<AddOutcome> {
        if !product.is_active {
            return Err(CoreError::ProductUnavailable(product.name.clone()));
        }

        let missing = product.check_selection(&request.selection)?;
        if !missing.is_empty() {
            return Ok(AddOutcome::NeedsVariantSelection {
                missing,
                colors: product.colors.clone(),
                sizes: product.sizes.clone(),
            });
        }

        let requested = validate_quantity(request.quantity)?;
        let key = LineKey::new(&product.id, &request.selection).with_customization(
            request.customization.as_ref().map(|c| c.text.as_str()),
        );

        let available = product.available_for(&request.selection);
        let in_cart = self.variant_quantity(&key);
        let remaining = available.saturating_sub(in_cart);

        if remaining == 0 {
            return Err(CoreError::InsufficientStock {
                product: product.name.clone(),
                variant: request.selection.label(),
                available: remaining,
                requested,
            });
        }

        let granted = requested.min(remaining);

        let quantity = match self.items.iter_mut().find(|line| line.key() == key) {
            Some(line) => {
                let new_qty = line.quantity + granted;
                if new_qty as i64 > MAX_ITEM_QUANTITY {
                    return Err(CoreError::QuantityTooLarge {
                        requested: new_qty as i64,
                        max: MAX_ITEM_QUANTITY,
                    });
                }
                line.quantity = new_qty;
                new_qty
            }
            None => {
                validate_cart_size(self.items.len())
                    .map_err(|_| CoreError::CartTooLarge { max: MAX_CART_ITEMS })?;
                self.items.push(CartLine::from_product(
                    product,
                    &request.selection,
                    granted,
                    request.customization,
                ));
                granted
            }
        };

        if granted < requested {
            Ok(AddOutcome::Clamped {
                added: granted,
                requested,
                available,
                quantity,
            })
        } else {
            Ok(AddOutcome::Added { quantity })
        }
    }

    /// Sets a line's quantity.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: removes the line (no-op if it is absent)
    /// - above stock: `InsufficientStock`, nothing changes
    /// - unknown line with a positive quantity: `LineNotFound`
    pub fn update_quantity(
        &mut self,
        key: &LineKey,
        quantity: i64,
        product: &Product,
    ) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove_item(key);
            return Ok(());
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        let quantity = quantity as u32;

        let current = self
            .find(key)
            .map(|line| line.quantity)
            .ok_or_else(|| CoreError::LineNotFound(key.describe()))?;

        let selection = VariantSelection::new(key.color.as_deref(), key.size.as_deref());
        let available = product.available_for(&selection);
        let others = self.variant_quantity(key) - current;
        let allowed = available.saturating_sub(others);

        if quantity > allowed {
            return Err(CoreError::InsufficientStock {
                product: product.name.clone(),
                variant: selection.label(),
                available: allowed,
                requested: quantity,
            });
        }

        if let Some(line) = self.items.iter_mut().find(|line| &line.key() == key) {
            line.quantity = quantity;
        }
        Ok(())
    }

    /// Removes a line. Returns whether anything was removed.
    pub fn remove_item(&mut self, key: &LineKey) -> bool {
        let before = self.items.len();
        self.items.retain(|line| &line.key() != key);
        self.items.len() != before
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Every line's key and quantity, as submitted at checkout.
    pub fn quantities(&self) -> Vec<(LineKey, u32)> {
        self.items
            .iter()
            .map(|line| (line.key(), line.quantity))
            .collect()
    }

    /// Takes a completed checkout out of the cart.
    ///
    /// Each submitted quantity is subtracted from its line; lines that reach
    /// zero are removed. Lines added after `submitted` was taken, and units
    /// added to a submitted line since, stay in the cart.
    pub fn settle(&mut self, submitted: &[(LineKey, u32)]) {
        for (key, sold) in submitted {
            if let Some(line) = self.items.iter_mut().find(|line| &line.key() == key) {
                line.quantity = line.quantity.saturating_sub(*sold);
            }
        }
        self.items.retain(|line| line.quantity > 0);
        if self.items.is_empty() {
            self.created_at = Utc::now();
        }
    }

    /// Re-checks every line against a fresh catalog.
    ///
    /// Lines are processed in cart order; each takes what it can from the
    /// remaining stock of its variant. Lines whose product vanished, went
    /// inactive, or has nothing left are removed.
    pub fn revalidate(&mut self, catalog: &[Product]) -> Vec<StockAdjustment> {
        let mut adjustments = Vec::new();
        let mut allocated: Vec<(LineKey, u32)> = Vec::new();

        self.items.retain_mut(|line| {
            let key = line.key();
            let available = catalog
                .iter()
                .find(|p| p.id == line.product_id && p.is_active)
                .map(|p| p.available_for(&line.selection()))
                .unwrap_or(0);
            let taken: u32 = allocated
                .iter()
                .filter(|(k, _)| k.same_variant(&key))
                .map(|(_, q)| *q)
                .sum();
            let allowed = available.saturating_sub(taken);

            if line.quantity > allowed {
                adjustments.push(StockAdjustment {
                    key: key.clone(),
                    name: line.name.clone(),
                    previous: line.quantity,
                    now: allowed,
                });
                line.quantity = allowed;
            }

            allocated.push((key, line.quantity));
            line.quantity > 0
        });

        adjustments
    }

    pub fn find(&self, key: &LineKey) -> Option<&CartLine> {
        self.items.iter().find(|line| &line.key() == key)
    }

    /// Quantity across every line of the same (product, color, size).
    pub fn variant_quantity(&self, key: &LineKey) -> u32 {
        self.items
            .iter()
            .filter(|line| line.key().same_variant(key))
            .map(|line| line.quantity)
            .sum()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Σ unit price × quantity (customization surcharges included).
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Σ cost price × quantity.
    pub fn total_cost(&self) -> Money {
        self.items.iter().map(CartLine::line_cost).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_product(stock: u32) -> Product {
        let mut p = Product::new("coat", "Lab Coat", Money::from_major(3000));
        p.cost_price = Money::from_major(1800);
        p.stock = stock;
        p
    }

    fn variant_product() -> Product {
        let mut p = Product::new("top", "Classic Scrub Top", Money::from_major(2500));
        p.add_dimension_value(Dimension::Color, "Black").unwrap();
        p.add_dimension_value(Dimension::Color, "White").unwrap();
        p.add_dimension_value(Dimension::Size, "S").unwrap();
        p.add_dimension_value(Dimension::Size, "M").unwrap();
        p.set_cell("Black", "S", 2).unwrap();
        p.set_cell("White", "M", 5).unwrap();
        p
    }

    fn qty(selection: VariantSelection, quantity: i64) -> AddRequest {
        AddRequest {
            selection,
            quantity,
            customization: None,
        }
    }

    #[test]
    fn test_settle_keeps_lines_added_after_checkout_began() {
        let mut cart = Cart::new();
        let white_m = VariantSelection::new(Some("White"), Some("M"));
        cart.add_item(&variant_product(), qty(white_m.clone(), 2)).unwrap();
        let submitted = cart.quantities();

        cart.add_item(&variant_product(), qty(white_m, 1)).unwrap();
        cart.add_item(&plain_product(5), qty(VariantSelection::none(), 1)).unwrap();
        cart.settle(&submitted);

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.items[0].quantity, 1);
        assert_eq!(cart.items[1].product_id, "coat");

        cart.settle(&cart.quantities());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_plain_product() {
        let mut cart = Cart::new();
        let outcome = cart.add_item(&plain_product(10), qty(VariantSelection::none(), 2)).unwrap();

        assert_eq!(outcome, AddOutcome::Added { quantity: 2 });
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.subtotal(), Money::from_major(6000));
        assert_eq!(cart.total_cost(), Money::from_major(3600));
    }

    #[test]
    fn test_add_same_variant_increases_quantity() {
        let mut cart = Cart::new();
        let product = plain_product(10);
        cart.add_item(&product, qty(VariantSelection::none(), 2)).unwrap();
        cart.add_item(&product, qty(VariantSelection::none(), 3)).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_add_requires_variant_selection() {
        let mut cart = Cart::new();
        let outcome = cart
            .add_item(&variant_product(), AddRequest::one(VariantSelection::none()))
            .unwrap();

        match outcome {
            AddOutcome::NeedsVariantSelection { missing, colors, sizes } => {
                assert_eq!(missing, vec![Dimension::Color, Dimension::Size]);
                assert_eq!(colors, vec!["Black", "White"]);
                assert_eq!(sizes, vec!["S", "M"]);
            }
            other => panic!("expected variant selection, got {other:?}"),
        }
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_clamps_to_remaining_stock() {
        let mut cart = Cart::new();
        let product = variant_product();
        let white_m = VariantSelection::new(Some("White"), Some("M"));

        cart.add_item(&product, qty(white_m.clone(), 3)).unwrap();
        let outcome = cart.add_item(&product, qty(white_m, 4)).unwrap();

        assert_eq!(
            outcome,
            AddOutcome::Clamped {
                added: 2,
                requested: 4,
                available: 5,
                quantity: 5
            }
        );
    }

    #[test]
    fn test_add_rejects_empty_cell() {
        let mut cart = Cart::new();
        let err = cart
            .add_item(
                &variant_product(),
                AddRequest::one(VariantSelection::new(Some("Black"), Some("M"))),
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { available: 0, .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_rejects_inactive_and_bad_quantity() {
        let mut cart = Cart::new();
        let mut product = plain_product(5);
        assert!(cart.add_item(&product, qty(VariantSelection::none(), 0)).is_err());
        assert!(cart.add_item(&product, qty(VariantSelection::none(), -2)).is_err());

        product.is_active = false;
        assert!(matches!(
            cart.add_item(&product, AddRequest::one(VariantSelection::none())),
            Err(CoreError::ProductUnavailable(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_customization_adds_surcharge_and_separate_line() {
        let mut cart = Cart::new();
        let product = plain_product(3);
        let custom = Customization::new("Dr. Ayesha", Money::from_major(300)).unwrap();

        cart.add_item(&product, AddRequest::one(VariantSelection::none())).unwrap();
        cart.add_item(
            &product,
            AddRequest {
                selection: VariantSelection::none(),
                quantity: 1,
                customization: Some(custom),
            },
        )
        .unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.items[1].unit_price, Money::from_major(3300));
        assert_eq!(cart.subtotal(), Money::from_major(6300));

        // both lines draw from the same 3 units
        let outcome = cart.add_item(&product, qty(VariantSelection::none(), 5)).unwrap();
        assert!(matches!(outcome, AddOutcome::Clamped { added: 1, .. }));
        assert!(cart
            .add_item(&product, AddRequest::one(VariantSelection::none()))
            .is_err());
    }

    #[test]
    fn test_update_quantity_checks_stock() {
        let mut cart = Cart::new();
        let product = plain_product(4);
        cart.add_item(&product, AddRequest::one(VariantSelection::none())).unwrap();
        let key = cart.items[0].key();

        cart.update_quantity(&key, 4, &product).unwrap();
        assert_eq!(cart.total_quantity(), 4);

        let err = cart.update_quantity(&key, 5, &product).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { available: 4, requested: 5, .. }));
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_update_to_zero_removes_and_is_idempotent() {
        let mut cart = Cart::new();
        let product = plain_product(4);
        cart.add_item(&product, AddRequest::one(VariantSelection::none())).unwrap();
        let key = cart.items[0].key();

        cart.update_quantity(&key, 0, &product).unwrap();
        assert!(cart.is_empty());
        cart.update_quantity(&key, -3, &product).unwrap();
        assert!(!cart.remove_item(&key));
    }

    #[test]
    fn test_update_unknown_line_with_positive_quantity_fails() {
        let mut cart = Cart::new();
        let product = plain_product(4);
        let key = LineKey::new("coat", &VariantSelection::none());
        assert!(matches!(
            cart.update_quantity(&key, 1, &product),
            Err(CoreError::LineNotFound(_))
        ));
    }

    #[test]
    fn test_revalidate_clamps_and_drops() {
        let mut cart = Cart::new();
        let mut product = plain_product(5);
        cart.add_item(&product, qty(VariantSelection::none(), 4)).unwrap();

        product.stock = 2;
        let adjustments = cart.revalidate(std::slice::from_ref(&product));
        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].previous, 4);
        assert_eq!(adjustments[0].now, 2);
        assert_eq!(cart.total_quantity(), 2);

        let adjustments = cart.revalidate(&[]);
        assert_eq!(adjustments[0].now, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(&plain_product(3), AddRequest::one(VariantSelection::none())).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.subtotal().is_zero());
    }

    #[test]
    fn test_line_margin() {
        let mut cart = Cart::new();
        cart.add_item(&plain_product(3), AddRequest::one(VariantSelection::none())).unwrap();
        let margin = cart.items[0].margin();
        assert_eq!(margin.per_unit_profit, Money::from_major(1200));
        assert_eq!(margin.margin_bps, Some(6667));
    }
}
