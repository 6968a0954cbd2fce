//! # Pricing
//!
//! Totals derived from a cart. Nothing here is stored: every total is
//! recomputed from the lines each time it is asked for.
//!
//! ## Storefront vs POS
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront                         POS                                 │
//! │  ──────────                         ───                                 │
//! │  subtotal = Σ unit × qty            subtotal = Σ unit × qty             │
//! │  shipping = subtotal ≥ minimum      discount = % of subtotal | fixed    │
//! │             ? 0 : fee               total    = max(0, subtotal - disc)  │
//! │  total    = subtotal + shipping     change   = received - total (cash)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{DiscountType, PaymentMethod, Percent};

// =============================================================================
// Storefront
// =============================================================================

/// Shipping configuration of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingPolicy {
    pub shipping_fee: Money,
    pub free_shipping_minimum: Money,
}

impl ShippingPolicy {
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal >= self.free_shipping_minimum {
            Money::zero()
        } else {
            self.shipping_fee
        }
    }
}

/// Totals shown on the storefront cart and checkout pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontTotals {
    pub item_count: usize,
    pub total_quantity: u32,
    pub subtotal: Money,
    pub shipping: Money,
    pub total: Money,
    /// How much more the shopper has to add for free shipping; zero once reached.
    pub amount_to_free_shipping: Money,
}

impl StorefrontTotals {
    pub fn compute(cart: &Cart, policy: &ShippingPolicy) -> Self {
        let subtotal = cart.subtotal();
        let shipping = policy.shipping_for(subtotal);
        StorefrontTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal,
            shipping,
            total: subtotal + shipping,
            amount_to_free_shipping: (policy.free_shipping_minimum - subtotal).floor_zero(),
        }
    }
}

// =============================================================================
// POS Discount
// =============================================================================

/// A discount typed by the salesman.
///
/// `value` is basis points for `Percentage` (1000 = 10%) and minor units
/// for `Fixed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub kind: DiscountType,
    pub value: i64,
}

impl Discount {
    pub fn none() -> Self {
        Discount::default()
    }

    pub fn percentage(rate: Percent) -> Self {
        Discount {
            kind: DiscountType::Percentage,
            value: rate.bps() as i64,
        }
    }

    pub fn fixed(amount: Money) -> Self {
        Discount {
            kind: DiscountType::Fixed,
            value: amount.cents(),
        }
    }

    /// Parses what was typed into the discount field for the given kind.
    ///
    /// Empty input means no discount.
    pub fn parse(kind: DiscountType, input: &str) -> CoreResult<Self> {
        if input.trim().is_empty() {
            return Ok(Discount { kind, value: 0 });
        }
        let discount = match kind {
            DiscountType::Percentage => Discount::percentage(Percent::parse_decimal(input)?),
            DiscountType::Fixed => Discount::fixed(Money::parse_decimal(input)?),
        };
        discount.validate()?;
        Ok(discount)
    }

    /// Negative values and percentages above 100% are rejected.
    pub fn validate(&self) -> CoreResult<()> {
        if self.value < 0 {
            return Err(ValidationError::MustBePositive {
                field: "discount".to_string(),
            }
            .into());
        }
        if self.kind == DiscountType::Percentage && self.value > Percent::FULL.bps() as i64 {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: 100,
            }
            .into());
        }
        Ok(())
    }

    /// Amount taken off `subtotal`, never more than the subtotal itself.
    pub fn amount_off(&self, subtotal: Money) -> Money {
        let raw = match self.kind {
            DiscountType::Percentage => {
                let bps = self.value.clamp(0, Percent::FULL.bps() as i64) as u32;
                subtotal.percentage(Percent::from_bps(bps))
            }
            DiscountType::Fixed => Money::from_cents(self.value).floor_zero(),
        };
        raw.min(subtotal.floor_zero())
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }
}

// =============================================================================
// Tender & Change
// =============================================================================

/// How the customer pays at the counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    pub method: PaymentMethod,
    /// Cash handed over. Ignored for card.
    pub amount_received: Option<Money>,
}

impl Tender {
    pub fn cash(amount_received: Money) -> Self {
        Tender {
            method: PaymentMethod::Cash,
            amount_received: Some(amount_received),
        }
    }

    pub fn card() -> Self {
        Tender {
            method: PaymentMethod::Card,
            amount_received: None,
        }
    }
}

/// Change to hand back.
///
/// `Short` is never a valid "change due" value: the UI shows it as the
/// amount still owed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", content = "amount", rename_all = "camelCase")]
pub enum ChangeDue {
    /// Card payment, or cash with nothing entered yet.
    NotApplicable,
    Due(Money),
    /// Customer still owes this much.
    Short(Money),
}

impl ChangeDue {
    pub fn compute(tender: &Tender, total: Money) -> Self {
        match (tender.method, tender.amount_received) {
            (PaymentMethod::Cash, Some(received)) => {
                let diff = received - total;
                if diff.is_negative() {
                    ChangeDue::Short(diff.abs())
                } else {
                    ChangeDue::Due(diff)
                }
            }
            _ => ChangeDue::NotApplicable,
        }
    }

    /// The change amount, only when it is a real change value.
    pub fn amount(&self) -> Option<Money> {
        match self {
            ChangeDue::Due(m) => Some(*m),
            _ => None,
        }
    }

    pub fn is_short(&self) -> bool {
        matches!(self, ChangeDue::Short(_))
    }
}

// =============================================================================
// POS Totals
// =============================================================================

/// Everything the POS summary panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PosTotals {
    pub item_count: usize,
    pub total_quantity: u32,
    pub subtotal: Money,
    pub discount_amount: Money,
    /// Never negative.
    pub total: Money,
    pub total_cost: Money,
    /// total - total cost; display only.
    pub gross_profit: Money,
    pub change: ChangeDue,
}

impl PosTotals {
    pub fn compute(cart: &Cart, discount: &Discount, tender: &Tender) -> Self {
        let subtotal = cart.subtotal();
        let discount_amount = discount.amount_off(subtotal);
        let total = (subtotal - discount_amount).floor_zero();
        let total_cost = cart.total_cost();
        PosTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal,
            discount_amount,
            total,
            total_cost,
            gross_profit: total - total_cost,
            change: ChangeDue::compute(tender, total),
        }
    }
}

// =============================================================================
// Margin
// =============================================================================

/// Per-unit profit shown next to a POS line. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Margin {
    pub per_unit_profit: Money,
    /// profit / cost in basis points; `None` when cost is zero.
    pub margin_bps: Option<i64>,
}

impl Margin {
    pub fn for_unit(unit_price: Money, cost_price: Money) -> Self {
        let per_unit_profit = unit_price - cost_price;
        let margin_bps = if cost_price.is_positive() {
            let num = per_unit_profit.cents() as i128 * 10_000;
            let den = cost_price.cents() as i128;
            // round half away from zero
            let half = den / 2;
            let rounded = if num >= 0 { (num + half) / den } else { (num - half) / den };
            Some(rounded as i64)
        } else {
            None
        };
        Margin {
            per_unit_profit,
            margin_bps,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
