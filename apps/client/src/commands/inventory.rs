//! # Inventory Commands
//!
//! The admin console's variant-stock editor.
//!
//! ## Editor Session
//! ```text
//! open_product_editor(id) ──► GET products/:id ──► EditorState
//!        │
//!        ├── add_dimension_value(color, "Navy")   ─► zero-filled row
//!        ├── remove_dimension_value(size, "XL")   ─► column + cells gone
//!        ├── set_variant_stock("Navy", "M", "4")  ─► one cell
//!        ├── set_scalar_stock("12")               ─► only without a matrix
//!        │
//!        ▼
//! save_product ──► stock synced ──► PUT products/:id ──► catalog updated
//! ```
//!
//! Every edit is local until `save_product`. A rejected edit leaves the
//! open product as it was.

use medwear_core::validation::{parse_stock_input, validate_product_name, validate_sku};
use medwear_core::{CoreError, Dimension, Product};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::ApiError;
use crate::state::{CatalogState, ConfigState, EditorState, RemoteState, SubmitGuard};

/// The editor's view of the open product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub product: Product,
    /// Both colors and sizes present: stock is edited per cell.
    pub variant_mode: bool,
    pub total_stock: u32,
    pub low_stock: bool,
}

impl EditorView {
    fn new(product: Product, config: &ConfigState) -> Self {
        EditorView {
            variant_mode: product.uses_variant_stock(),
            total_stock: product.total_stock(),
            low_stock: product.is_low_stock(config.low_stock_threshold),
            product,
        }
    }
}

/// Loads a product fresh from the store API into the editor.
pub async fn open_product_editor(
    remote: &RemoteState,
    editor: &EditorState,
    config: &ConfigState,
    product_id: &str,
) -> Result<EditorView, ApiError> {
    debug!(product_id = %product_id, "open_product_editor command");

    let product = remote
        .inner()
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    editor.open(product.clone());
    Ok(EditorView::new(product, config))
}

/// Adds a color or size. Adding an existing value changes nothing.
pub fn add_dimension_value(
    editor: &EditorState,
    config: &ConfigState,
    dimension: Dimension,
    value: &str,
) -> Result<EditorView, ApiError> {
    debug!(dimension = dimension.as_str(), value = %value, "add_dimension_value command");
    let product = editor.edit(|p| p.add_dimension_value(dimension, value).map(|_| ()))?;
    Ok(EditorView::new(product, config))
}

/// Removes a color or size together with its stock cells (and, for a
/// color, its images).
pub fn remove_dimension_value(
    editor: &EditorState,
    config: &ConfigState,
    dimension: Dimension,
    value: &str,
) -> Result<EditorView, ApiError> {
    debug!(dimension = dimension.as_str(), value = %value, "remove_dimension_value command");
    let product = editor.edit(|p| {
        p.remove_dimension_value(dimension, value);
        Ok::<(), CoreError>(())
    })?;
    Ok(EditorView::new(product, config))
}

/// Sets one (color, size) cell from the text typed into it.
///
/// Negative, fractional or non-numeric input is rejected; nothing is stored.
pub fn set_variant_stock(
    editor: &EditorState,
    config: &ConfigState,
    color: &str,
    size: &str,
    quantity: &str,
) -> Result<EditorView, ApiError> {
    debug!(color = %color, size = %size, quantity = %quantity, "set_variant_stock command");
    let quantity = parse_stock_input(quantity).map_err(CoreError::from)?;
    let product = editor.edit(|p| p.set_cell(color, size, i64::from(quantity)))?;
    Ok(EditorView::new(product, config))
}

/// Sets the scalar stock of a product without a color × size matrix.
pub fn set_scalar_stock(
    editor: &EditorState,
    config: &ConfigState,
    quantity: &str,
) -> Result<EditorView, ApiError> {
    debug!(quantity = %quantity, "set_scalar_stock command");
    let quantity = parse_stock_input(quantity).map_err(CoreError::from)?;
    let product = editor.edit(|p| p.set_scalar_stock(i64::from(quantity)))?;
    Ok(EditorView::new(product, config))
}

/// Leaves the editor. Unsaved edits are dropped.
pub fn close_product_editor(editor: &EditorState) {
    debug!("close_product_editor command");
    editor.close();
}

/// Saves the open product.
///
/// Name and SKU are checked before anything is sent. The scalar `stock` is
/// re-derived from the matrix so the two can never disagree on the server.
/// On failure the editor keeps the unsaved edits so the admin can retry.
pub async fn save_product(
    remote: &RemoteState,
    editor: &EditorState,
    catalog: &CatalogState,
    config: &ConfigState,
    guard: &SubmitGuard,
) -> Result<EditorView, ApiError> {
    let _token = guard.try_begin()?;

    let mut product = editor
        .current()
        .ok_or_else(crate::state::no_product_open)?;
    validate_product_name(&product.name).map_err(CoreError::from)?;
    if let Some(sku) = product.sku.as_deref().filter(|s| !s.trim().is_empty()) {
        validate_sku(sku).map_err(CoreError::from)?;
    }
    product.sync_stock();
    debug!(product_id = %product.id, stock = product.stock, "save_product command");

    let saved = remote
        .inner()
        .products()
        .update(&product)
        .await
        .map_err(|err| {
            error!(product_id = %product.id, error = %err, "Product save failed");
            ApiError::from(err)
        })?;

    editor.open(saved.clone());
    catalog.upsert(saved.clone());
    info!(product_id = %saved.id, stock = saved.total_stock(), "Product saved");

    Ok(EditorView::new(saved, config))
}
