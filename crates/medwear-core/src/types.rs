//! # Domain Types
//!
//! Core domain types used throughout Medwear.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌──────────────────┐  ┌──────────────────┐   │
//! │  │      Product        │  │ VariantSelection │  │     Percent      │   │
//! │  │  ─────────────────  │  │  ──────────────  │  │  ──────────────  │   │
//! │  │  id, name, slug     │  │  color: Option   │  │  bps (u32)       │   │
//! │  │  price, sale_price  │  │  size:  Option   │  │  1000 = 10%      │   │
//! │  │  colors, sizes      │  └──────────────────┘  └──────────────────┘   │
//! │  │  color_size_stock ──┼──► StockMatrix (inventory.rs)                 │
//! │  │  stock (scalar)     │                                               │
//! │  └─────────────────────┘                                               │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │ PaymentMethod   │   │  DiscountType   │                              │
//! │  │  Cash           │   │  Percentage     │                              │
//! │  │  Card           │   │  Fixed          │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Variant fields travel as JSON-encoded strings on the wire. That encoding
//! is handled by `medwear-http`; here they are plain structured types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::inventory::StockMatrix;
use crate::money::{parse_fixed_point, Money};

// =============================================================================
// Percent
// =============================================================================

/// A percentage in basis points (1 bps = 0.01%).
///
/// 1000 bps = 10%, 1250 bps = 12.5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(u32);

impl Percent {
    /// 100%.
    pub const FULL: Percent = Percent(10_000);

    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a percentage from a whole number of percent.
    #[inline]
    pub const fn from_whole(pct: u32) -> Self {
        Percent(pct * 100)
    }

    /// Parses "10" or "12.5" (percent) into basis points.
    pub fn parse_decimal(input: &str) -> Result<Percent, ValidationError> {
        let bps = parse_fixed_point(input, 2, "discount")?;
        if bps < 0 {
            return Err(ValidationError::MustBePositive {
                field: "discount".to_string(),
            });
        }
        u32::try_from(bps)
            .map(Percent)
            .map_err(|_| ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: 100,
            })
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

// =============================================================================
// Variant Dimensions
// =============================================================================

/// The two axes of the variant matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Color,
    Size,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Color => "color",
            Dimension::Size => "size",
        }
    }
}

/// The color/size a shopper or salesman picked for a product.
///
/// Either side is `None` when the product does not offer that dimension
/// (or when nothing has been picked yet).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VariantSelection {
    pub color: Option<String>,
    pub size: Option<String>,
}

impl VariantSelection {
    pub fn new(color: Option<&str>, size: Option<&str>) -> Self {
        VariantSelection {
            color: color.map(str::to_string),
            size: size.map(str::to_string),
        }
    }

    /// No variant at all (plain products).
    pub fn none() -> Self {
        VariantSelection::default()
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.size.is_none()
    }

    /// Human label used in notifications: "Black / M", "M", or `None`.
    pub fn label(&self) -> Option<String> {
        match (&self.color, &self.size) {
            (Some(c), Some(s)) => Some(format!("{c} / {s}")),
            (Some(c), None) => Some(c.clone()),
            (None, Some(s)) => Some(s.clone()),
            (None, None) => None,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// ## Stock Authority
/// ```text
/// colors non-empty AND sizes non-empty ?
///     │
///     ├── yes ──► color_size_stock is the truth; `stock` mirrors its sum
///     │
///     └── no ───► `stock` (scalar) is the truth
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub cost_price: Money,
    pub price: Money,
    /// Optional override; when set and positive it is what customers pay.
    pub sale_price: Option<Money>,
    /// Ordered image URLs; the first one is the cover.
    pub images: Vec<String>,
    pub barcode: Option<String>,
    pub sku: Option<String>,
    /// Brand / manufacturer.
    pub company: Option<String>,
    pub category: Option<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub color_images: BTreeMap<String, Vec<String>>,
    pub color_size_stock: StockMatrix,
    /// Scalar stock; authoritative only without a variant matrix.
    pub stock: u32,
    pub is_active: bool,
}

impl Product {
    /// Creates an active product with no variants.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        let name = name.into();
        Product {
            id: id.into(),
            slug: slugify(&name),
            name,
            description: None,
            cost_price: Money::zero(),
            price,
            sale_price: None,
            images: Vec::new(),
            barcode: None,
            sku: None,
            company: None,
            category: None,
            sizes: Vec::new(),
            colors: Vec::new(),
            color_images: BTreeMap::new(),
            color_size_stock: StockMatrix::default(),
            stock: 0,
            is_active: true,
        }
    }

    /// What a customer pays per unit before any customization:
    /// `sale_price` when present and positive, otherwise `price`.
    ///
    /// A zero or negative `sale_price` means "no sale". Clearing the sale
    /// field in the product form stores 0, and a product is never given away
    /// through its sale price.
    pub fn unit_price(&self) -> Money {
        match self.sale_price {
            Some(sale) if sale.is_positive() => sale,
            _ => self.price,
        }
    }

    /// Whether the product is currently discounted.
    pub fn is_on_sale(&self) -> bool {
        self.unit_price() < self.price
    }

    /// True when the product offers any color or size choice.
    pub fn has_variants(&self) -> bool {
        !self.colors.is_empty() || !self.sizes.is_empty()
    }

    /// True when stock is tracked per (color, size) cell.
    pub fn uses_variant_stock(&self) -> bool {
        !self.colors.is_empty() && !self.sizes.is_empty()
    }

    /// Cover image for the chosen color, falling back to the product cover.
    pub fn image_for(&self, color: Option<&str>) -> Option<&str> {
        color
            .and_then(|c| self.color_images.get(c))
            .and_then(|imgs| imgs.first())
            .or_else(|| self.images.first())
            .map(String::as_str)
    }
}

/// Builds a URL slug from a product name ("Classic Scrub Top" → "classic-scrub-top").
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

// =============================================================================
// Payment
// =============================================================================

/// How a POS sale is paid. Both are entered manually; there is no gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Physical cash; change is computed.
    Cash,
    /// Card on an external terminal.
    Card,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

/// How the POS discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl Default for DiscountType {
    fn default() -> Self {
        DiscountType::Fixed
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_parse() {
        assert_eq!(Percent::parse_decimal("10").unwrap().bps(), 1000);
        assert_eq!(Percent::parse_decimal("12.5").unwrap().bps(), 1250);
        assert!(Percent::parse_decimal("-5").is_err());
        assert!(Percent::parse_decimal("ten").is_err());
    }

    #[test]
    fn test_unit_price_prefers_positive_sale_price() {
        let mut product = Product::new("p1", "Classic Scrub Top", Money::from_major(2500));
        assert_eq!(product.unit_price(), Money::from_major(2500));
        assert!(!product.is_on_sale());

        product.sale_price = Some(Money::from_major(1999));
        assert_eq!(product.unit_price(), Money::from_major(1999));
        assert!(product.is_on_sale());

        product.sale_price = Some(Money::zero());
        assert_eq!(product.unit_price(), Money::from_major(2500));
        assert!(!product.is_on_sale());

        product.sale_price = Some(Money::from_cents(-100));
        assert_eq!(product.unit_price(), Money::from_major(2500));
    }

    #[test]
    fn test_variant_flags() {
        let mut product = Product::new("p1", "Lab Coat", Money::from_major(3000));
        assert!(!product.has_variants());
        assert!(!product.uses_variant_stock());

        product.sizes = vec!["S".into(), "M".into()];
        assert!(product.has_variants());
        assert!(!product.uses_variant_stock());

        product.colors = vec!["White".into()];
        assert!(product.uses_variant_stock());
    }

    #[test]
    fn test_selection_label() {
        assert_eq!(
            VariantSelection::new(Some("Black"), Some("M")).label().as_deref(),
            Some("Black / M")
        );
        assert_eq!(VariantSelection::new(None, Some("M")).label().as_deref(), Some("M"));
        assert_eq!(VariantSelection::none().label(), None);
    }

    #[test]
    fn test_image_for_color_falls_back_to_cover() {
        let mut product = Product::new("p1", "Scrub Pants", Money::from_major(1800));
        product.images = vec!["cover.jpg".into()];
        product
            .color_images
            .insert("Navy".into(), vec!["navy-1.jpg".into(), "navy-2.jpg".into()]);

        assert_eq!(product.image_for(Some("Navy")), Some("navy-1.jpg"));
        assert_eq!(product.image_for(Some("Teal")), Some("cover.jpg"));
        assert_eq!(product.image_for(None), Some("cover.jpg"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Classic Scrub Top"), "classic-scrub-top");
        assert_eq!(slugify("  Jogger (Women's) "), "jogger-women-s");
    }
}
