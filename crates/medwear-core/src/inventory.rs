//! # Variant Inventory
//!
//! Stock for a product is either a single scalar count, or a matrix of
//! counts indexed by (color, size).
//!
//! ## Matrix Layout
//! ```text
//!              sizes ──►   S     M     L
//!   colors   ┌─────────┬─────┬─────┬─────┐
//!     │      │ Black   │  2  │  0  │  4  │  colorTotal(Black) = 6
//!     ▼      │ White   │  0  │  5  │  1  │  colorTotal(White) = 6
//!            └─────────┴─────┴─────┴─────┘
//!                                 totalStock = 12
//! ```
//!
//! ## Invariants
//! - Cells are non-negative integers (`u32`); negative input is rejected.
//! - Every key in the matrix names a color in `colors` and a size in `sizes`.
//!   Removing a dimension value removes its row/column in the same call.
//! - Missing cells read as zero.
//! - `Product::stock` is rewritten from the matrix after every matrix mutation,
//!   but reads never trust it while the matrix is in use.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Dimension, Product, VariantSelection};
use crate::validation::{validate_dimension_value, validate_stock_quantity};

// =============================================================================
// Stock Matrix
// =============================================================================

fn saturating_sum(counts: impl Iterator<Item = u32>) -> u32 {
    counts.fold(0, u32::saturating_add)
}

/// color → size → quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct StockMatrix(BTreeMap<String, BTreeMap<String, u32>>);

impl StockMatrix {
    pub fn new() -> Self {
        StockMatrix(BTreeMap::new())
    }

    /// True when no cell exists at all (empty rows do not count).
    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }

    /// Quantity at (color, size); 0 if absent.
    pub fn cell(&self, color: &str, size: &str) -> u32 {
        self.0
            .get(color)
            .and_then(|row| row.get(size))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of one color's row; 0 if the color has no row.
    pub fn row_total(&self, color: &str) -> u32 {
        self.0
            .get(color)
            .map(|row| saturating_sum(row.values().copied()))
            .unwrap_or(0)
    }

    /// Sum of every cell, saturating at `u32::MAX`.
    pub fn total(&self) -> u32 {
        saturating_sum(self.0.values().flat_map(|row| row.values()).copied())
    }

    pub fn set(&mut self, color: &str, size: &str, quantity: u32) {
        self.0
            .entry(color.to_string())
            .or_default()
            .insert(size.to_string(), quantity);
    }

    /// Inserts a zero cell if none exists; existing counts are kept.
    fn ensure(&mut self, color: &str, size: &str) {
        self.0
            .entry(color.to_string())
            .or_default()
            .entry(size.to_string())
            .or_insert(0);
    }

    fn remove_row(&mut self, color: &str) {
        self.0.remove(color);
    }

    fn remove_column(&mut self, size: &str) {
        for row in self.0.values_mut() {
            row.remove(size);
        }
        self.0.retain(|_, row| !row.is_empty());
    }

    /// Drops every key that is not in `colors` × `sizes`.
    pub fn retain_dimensions(&mut self, colors: &[String], sizes: &[String]) {
        self.0.retain(|color, _| colors.contains(color));
        for row in self.0.values_mut() {
            row.retain(|size, _| sizes.contains(size));
        }
        self.0.retain(|_, row| !row.is_empty());
    }

    /// Iterates `(color, size, quantity)` for every stored cell.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str, u32)> + '_ {
        self.0.iter().flat_map(|(color, row)| {
            row.iter()
                .map(move |(size, qty)| (color.as_str(), size.as_str(), *qty))
        })
    }

    pub fn as_map(&self) -> &BTreeMap<String, BTreeMap<String, u32>> {
        &self.0
    }
}

impl From<BTreeMap<String, BTreeMap<String, u32>>> for StockMatrix {
    fn from(map: BTreeMap<String, BTreeMap<String, u32>>) -> Self {
        StockMatrix(map)
    }
}

// =============================================================================
// Product Inventory Operations
// =============================================================================

impl Product {
    /// Total units on hand.
    ///
    /// Sum of every matrix cell when the matrix has cells, otherwise the
    /// scalar `stock`. Always recomputed; never read from a cache.
    pub fn total_stock(&self) -> u32 {
        if self.color_size_stock.is_empty() {
            self.stock
        } else {
            self.color_size_stock.total()
        }
    }

    /// Units across all sizes of one color; 0 for unknown colors.
    pub fn color_total(&self, color: &str) -> u32 {
        self.color_size_stock.row_total(color)
    }

    /// Units at exactly (color, size); 0 if absent.
    pub fn cell_stock(&self, color: &str, size: &str) -> u32 {
        self.color_size_stock.cell(color, size)
    }

    /// Colors that still have stock, in display order.
    pub fn in_stock_colors(&self) -> Vec<&str> {
        self.colors
            .iter()
            .filter(|c| !self.uses_variant_stock() || self.color_total(c) > 0)
            .map(String::as_str)
            .collect()
    }

    /// True when total stock is at or below `threshold`.
    pub fn is_low_stock(&self, threshold: u32) -> bool {
        self.total_stock() <= threshold
    }

    /// Units available for a specific selection.
    ///
    /// In matrix mode this is the (color, size) cell; a selection missing
    /// either side has nothing available. Otherwise it is the scalar stock,
    /// whatever size or color was picked.
    pub fn available_for(&self, selection: &VariantSelection) -> u32 {
        if self.uses_variant_stock() {
            match (&selection.color, &selection.size) {
                (Some(color), Some(size)) => self.cell_stock(color, size),
                _ => 0,
            }
        } else {
            self.stock
        }
    }

    /// Sets one matrix cell.
    ///
    /// ## Rules
    /// - `quantity` must be a non-negative integer; negative input is rejected
    ///   and nothing is stored.
    /// - `color` and `size` must already be values of this product.
    pub fn set_cell(&mut self, color: &str, size: &str, quantity: i64) -> CoreResult<()> {
        let quantity = validate_stock_quantity(quantity)?;
        self.require_value(Dimension::Color, color)?;
        self.require_value(Dimension::Size, size)?;

        self.color_size_stock.set(color, size, quantity);
        self.sync_stock();
        Ok(())
    }

    /// Sets the scalar stock. Only meaningful without a matrix.
    pub fn set_scalar_stock(&mut self, quantity: i64) -> CoreResult<()> {
        let quantity = validate_stock_quantity(quantity)?;
        if self.uses_variant_stock() {
            return Err(ValidationError::NotAllowed {
                field: "stock".to_string(),
                allowed: vec!["per color/size quantities".to_string()],
            }
            .into());
        }
        self.stock = quantity;
        Ok(())
    }

    /// Appends a color or size.
    ///
    /// Duplicates are ignored (returns `Ok(false)`). When both dimensions are
    /// non-empty afterwards, the new row or column is zero-filled against every
    /// value of the other dimension.
    pub fn add_dimension_value(&mut self, dimension: Dimension, value: &str) -> CoreResult<bool> {
        let value = validate_dimension_value(dimension, value)?;

        let list = match dimension {
            Dimension::Color => &mut self.colors,
            Dimension::Size => &mut self.sizes,
        };
        if list.iter().any(|v| v == &value) {
            return Ok(false);
        }
        list.push(value.clone());

        if self.uses_variant_stock() {
            match dimension {
                Dimension::Color => {
                    for size in &self.sizes {
                        self.color_size_stock.ensure(&value, size);
                    }
                }
                Dimension::Size => {
                    for color in &self.colors {
                        self.color_size_stock.ensure(color, &value);
                    }
                }
            }
        }

        self.sync_stock();
        Ok(true)
    }

    /// Removes a color or size and everything keyed by it.
    ///
    /// Removing a color also deletes its `color_images` entry. Returns
    /// `false` when the value was not present.
    pub fn remove_dimension_value(&mut self, dimension: Dimension, value: &str) -> bool {
        let list = match dimension {
            Dimension::Color => &mut self.colors,
            Dimension::Size => &mut self.sizes,
        };
        let before = list.len();
        list.retain(|v| v != value);
        if list.len() == before {
            return false;
        }

        match dimension {
            Dimension::Color => {
                self.color_size_stock.remove_row(value);
                self.color_images.remove(value);
            }
            Dimension::Size => self.color_size_stock.remove_column(value),
        }

        self.sync_stock();
        true
    }

    /// Writes the derived matrix total into the scalar `stock` field.
    ///
    /// Called after every matrix mutation and before a product is saved.
    pub fn sync_stock(&mut self) {
        if !self.color_size_stock.is_empty() {
            self.stock = self.color_size_stock.total();
        }
    }

    /// Repairs a product decoded from storage: drops matrix and image keys
    /// that name removed colors/sizes, then re-derives `stock`.
    pub fn normalize_variants(&mut self) {
        self.color_size_stock
            .retain_dimensions(&self.colors, &self.sizes);
        let colors = &self.colors;
        self.color_images.retain(|color, _| colors.contains(color));
        self.sync_stock();
    }

    /// Checks that `selection` names values this product offers.
    ///
    /// Returns the dimensions still missing a choice; an empty list means the
    /// selection is complete.
    pub fn check_selection(&self, selection: &VariantSelection) -> CoreResult<Vec<Dimension>> {
        let mut missing = Vec::new();

        match &selection.color {
            Some(color) => self.require_value(Dimension::Color, color)?,
            None if !self.colors.is_empty() => missing.push(Dimension::Color),
            None => {}
        }
        match &selection.size {
            Some(size) => self.require_value(Dimension::Size, size)?,
            None if !self.sizes.is_empty() => missing.push(Dimension::Size),
            None => {}
        }

        Ok(missing)
    }

    fn require_value(&self, dimension: Dimension, value: &str) -> CoreResult<()> {
        let list = match dimension {
            Dimension::Color => &self.colors,
            Dimension::Size => &self.sizes,
        };
        if list.iter().any(|v| v == value) {
            Ok(())
        } else {
            Err(CoreError::UnknownVariant {
                product: self.name.clone(),
                dimension: dimension.as_str().to_string(),
                value: value.to_string(),
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
