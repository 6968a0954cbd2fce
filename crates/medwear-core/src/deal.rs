//! # Deals
//!
//! A deal is a fixed bundle of at least two different products sold together
//! at one bundle price. The admin builds it with [`DealDraft`]; nothing is
//! sent until [`DealDraft::validate`] passes.
//!
//! ```text
//! original price = Σ unit_price(product) × quantity
//! savings        = original price - deal price
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_name, validate_quantity};

/// Fewest distinct products a deal may contain.
pub const MIN_DEAL_PRODUCTS: usize = 2;

/// One product in a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DealItem {
    pub product_id: String,
    pub quantity: u32,
}

/// A bundle being composed in the admin console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DealDraft {
    pub name: String,
    pub description: Option<String>,
    pub deal_price: Money,
    /// In the order products were picked.
    pub items: Vec<DealItem>,
}

impl DealDraft {
    pub fn new(name: impl Into<String>, deal_price: Money) -> Self {
        DealDraft {
            name: name.into(),
            deal_price,
            ..DealDraft::default()
        }
    }

    /// Adds one unit of a product; picking it again increments its quantity.
    pub fn add_product(&mut self, product_id: &str) {
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => item.quantity += 1,
            None => self.items.push(DealItem {
                product_id: product_id.to_string(),
                quantity: 1,
            }),
        }
    }

    /// Sets a product's quantity. Zero or negative is rejected; use
    /// [`DealDraft::remove_product`] instead.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        let quantity = validate_quantity(quantity)?;
        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        item.quantity = quantity;
        Ok(())
    }

    /// Returns whether the product was in the deal.
    pub fn remove_product(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    /// Takes a created deal out of the builder.
    ///
    /// Submitted quantities are subtracted and emptied products dropped. If
    /// nothing picked since submission is left, the builder starts over.
    pub fn settle(&mut self, submitted: &[DealItem]) {
        for done in submitted {
            if let Some(item) = self.items.iter_mut().find(|i| i.product_id == done.product_id) {
                item.quantity = item.quantity.saturating_sub(done.quantity);
            }
        }
        self.items.retain(|i| i.quantity > 0);
        if self.items.is_empty() {
            *self = DealDraft::default();
        }
    }

    pub fn product_count(&self) -> usize {
        self.items.len()
    }

    /// Checks everything required before the deal can be submitted.
    pub fn validate(&self) -> CoreResult<()> {
        validate_name("deal name", &self.name)?;

        if self.items.len() < MIN_DEAL_PRODUCTS {
            return Err(ValidationError::TooFew {
                field: "deal products".to_string(),
                min: MIN_DEAL_PRODUCTS,
            }
            .into());
        }

        if !self.deal_price.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "deal price".to_string(),
            }
            .into());
        }

        for item in &self.items {
            validate_quantity(item.quantity as i64)?;
        }

        Ok(())
    }

    /// Σ unit price × quantity over the bundle, using current catalog prices.
    pub fn original_price(&self, catalog: &[Product]) -> CoreResult<Money> {
        self.items.iter().try_fold(Money::zero(), |acc, item| {
            let product = catalog
                .iter()
                .find(|p| p.id == item.product_id)
                .ok_or_else(|| CoreError::ProductNotFound(item.product_id.clone()))?;
            Ok(acc + product.unit_price() * item.quantity)
        })
    }

    /// How much the bundle saves versus buying separately. Negative when the
    /// deal price is above the sum of its parts.
    pub fn savings(&self, catalog: &[Product]) -> CoreResult<Money> {
        Ok(self.original_price(catalog)? - self.deal_price)
    }
}

/// A saved deal as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub deal_price: Money,
    pub original_price: Option<Money>,
    pub items: Vec<DealItem>,
    pub is_active: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Product> {
        let mut top = Product::new("top", "Scrub Top", Money::from_major(2000));
        top.sale_price = Some(Money::from_major(1800));
        let pants = Product::new("pants", "Scrub Pants", Money::from_major(1500));
        vec![top, pants]
    }

    #[test]
    fn test_single_product_deal_is_rejected() {
        let mut deal = DealDraft::new("Starter Set", Money::from_major(3000));
        deal.add_product("top");
        deal.add_product("top");

        assert_eq!(deal.product_count(), 1);
        assert_eq!(deal.items[0].quantity, 2);
        let err = deal.validate().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::TooFew { min: 2, .. })
        ));

        deal.add_product("pants");
        assert!(deal.validate().is_ok());
    }

    #[test]
    fn test_settle_keeps_products_picked_during_submission() {
        let mut deal = DealDraft::new("Starter Set", Money::from_major(3000));
        deal.add_product("top");
        deal.add_product("pants");
        let submitted = deal.items.clone();

        deal.add_product("cap");
        deal.settle(&submitted);
        assert_eq!(deal.items.len(), 1);
        assert_eq!(deal.items[0].product_id, "cap");
        assert_eq!(deal.name, "Starter Set");

        deal.settle(&deal.items.clone());
        assert_eq!(deal, DealDraft::default());
    }

    #[test]
    fn test_deal_price_and_name_required() {
        let mut deal = DealDraft::new("", Money::from_major(3000));
        deal.add_product("top");
        deal.add_product("pants");
        assert!(deal.validate().is_err());

        deal.name = "Starter Set".to_string();
        deal.deal_price = Money::zero();
        assert!(deal.validate().is_err());
    }

    #[test]
    fn test_original_price_and_savings() {
        let mut deal = DealDraft::new("Starter Set", Money::from_major(3000));
        deal.add_product("top");
        deal.add_product("pants");
        deal.set_quantity("pants", 2).unwrap();

        assert_eq!(deal.original_price(&catalog()).unwrap(), Money::from_major(4800));
        assert_eq!(deal.savings(&catalog()).unwrap(), Money::from_major(1800));
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut deal = DealDraft::new("Starter Set", Money::from_major(3000));
        deal.add_product("top");
        assert!(deal.set_quantity("top", 0).is_err());
        assert!(deal.set_quantity("ghost", 1).is_err());
        assert!(deal.remove_product("top"));
        assert!(!deal.remove_product("top"));
    }

    #[test]
    fn test_original_price_unknown_product() {
        let mut deal = DealDraft::new("Starter Set", Money::from_major(3000));
        deal.add_product("ghost");
        assert!(matches!(
            deal.original_price(&catalog()),
            Err(CoreError::ProductNotFound(_))
        ));
    }
}
