//! # Product Commands
//!
//! Catalog loading, search and the POS scanner Enter key.
//!
//! ## Scanner Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Search Box Enter                                     │
//! │                                                                         │
//! │  Salesman types "scrub"  ──► search_products ──► suggestions           │
//! │  Scanner types "MW-0042⏎" ─► scan_enter                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  resolve_enter (medwear-core)                                           │
//! │       ├── UseSuggestion(id)   ──► Found(product)                        │
//! │       ├── LookupBarcode(code) ──► GET products/barcode/:code            │
//! │       │                              ├── 200 ──► Found(product)         │
//! │       │                              └── 404 ──► NoResults              │
//! │       ├── KeepSuggestions     ──► Suggestions(list)                     │
//! │       └── NoResults           ──► NoResults                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use medwear_core::barcode::{resolve_enter, search_catalog};
use medwear_core::validation::validate_search_query;
use medwear_core::{EnterAction, Money, Product, StockAdjustment};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{CartState, CatalogState, ConfigState, RemoteState};

/// Default number of suggestions shown under the search box.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Upper bound a caller can ask for.
pub const MAX_SEARCH_LIMIT: usize = 100;

/// Product card shown in grids and suggestion lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub company: Option<String>,
    pub category: Option<String>,
    pub price: Money,
    /// What the customer pays (sale price when on sale)
    pub unit_price: Money,
    pub on_sale: bool,
    pub image: Option<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    /// Colors with at least one size in stock (swatches)
    pub in_stock_colors: Vec<String>,
    pub total_stock: u32,
    pub low_stock: bool,
    pub has_variants: bool,
}

impl ProductDto {
    pub fn from_product(p: &Product, low_stock_threshold: u32) -> Self {
        ProductDto {
            id: p.id.clone(),
            name: p.name.clone(),
            sku: p.sku.clone(),
            barcode: p.barcode.clone(),
            company: p.company.clone(),
            category: p.category.clone(),
            price: p.price,
            unit_price: p.unit_price(),
            on_sale: p.is_on_sale(),
            image: p.image_for(None).map(str::to_string),
            colors: p.colors.clone(),
            sizes: p.sizes.clone(),
            in_stock_colors: p.in_stock_colors().into_iter().map(str::to_string).collect(),
            total_stock: p.total_stock(),
            low_stock: p.is_low_stock(low_stock_threshold),
            has_variants: p.has_variants(),
        }
    }
}

/// Result of [`load_catalog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogLoad {
    /// False when the view moved on before the response arrived.
    pub applied: bool,
    pub product_count: usize,
    /// Cart lines shrunk or removed because stock went down.
    pub adjustments: Vec<StockAdjustment>,
}

/// Loads the full catalog.
///
/// ## Behavior
/// - The response is dropped if a newer load started or the view was
///   invalidated while the request was in flight.
/// - After a successful install the cart is re-checked against the fresh
///   stock; shrunk lines come back as `adjustments` for a notification.
/// - On failure the previous catalog stays in place.
pub async fn load_catalog(
    remote: &RemoteState,
    catalog: &CatalogState,
    cart: &CartState,
) -> Result<CatalogLoad, ApiError> {
    let epoch = catalog.begin_load();
    debug!(epoch, "load_catalog command");

    let products = remote.inner().products().list().await?;
    let product_count = products.len();

    if !catalog.finish_load(epoch, products) {
        debug!(epoch, "Discarding stale catalog response");
        return Ok(CatalogLoad {
            applied: false,
            product_count,
            adjustments: Vec::new(),
        });
    }

    let adjustments = catalog.with_products(|products| {
        cart.with_cart_mut(|c| c.revalidate(products))
    });
    if !adjustments.is_empty() {
        warn!(count = adjustments.len(), "Cart lines adjusted to current stock");
    }

    info!(product_count, "Catalog loaded");
    Ok(CatalogLoad {
        applied: true,
        product_count,
        adjustments,
    })
}

/// Searches the loaded catalog.
///
/// ## Arguments
/// * `query` - Matches name, SKU, barcode and company (case-insensitive)
/// * `limit` - Maximum results (default: 20, max: 100)
pub fn search_products(
    catalog: &CatalogState,
    config: &ConfigState,
    query: &str,
    limit: Option<usize>,
) -> Result<Vec<ProductDto>, ApiError> {
    let query = validate_search_query(query).map_err(medwear_core::CoreError::from)?;
    let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT).min(MAX_SEARCH_LIMIT);
    debug!(query = %query, limit, "search_products command");

    Ok(catalog.with_products(|products| {
        search_catalog(products, &query, limit)
            .into_iter()
            .map(|p| ProductDto::from_product(p, config.low_stock_threshold))
            .collect()
    }))
}

/// Enter pressed in the POS search box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub input: String,
    /// Index of the highlighted suggestion, if any.
    #[serde(default)]
    pub selected: Option<usize>,
    /// Same limit the suggestion list was rendered with.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// What the search box should do next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum ScanResult {
    /// Add this product (the UI may still need a variant pick).
    Found(Box<Product>),
    /// Several matches; keep the list open.
    Suggestions(Vec<ProductDto>),
    NoResults,
}

/// Handles Enter in the search box, typed or scanned.
///
/// A barcode lookup that succeeds also refreshes that product in the
/// catalog. A 404 is not an error: the UI shows "no results".
pub async fn scan_enter(
    remote: &RemoteState,
    catalog: &CatalogState,
    config: &ConfigState,
    request: ScanRequest,
) -> Result<ScanResult, ApiError> {
    let limit = request
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(MAX_SEARCH_LIMIT);
    let classifier = config.barcode_classifier();

    let (action, suggestions) = catalog.with_products(|products| {
        let suggestions: Vec<Product> = search_catalog(products, &request.input, limit)
            .into_iter()
            .cloned()
            .collect();
        let action = resolve_enter(&classifier, &request.input, &suggestions, request.selected);
        (action, suggestions)
    });
    debug!(input = %request.input, ?action, "scan_enter command");

    match action {
        EnterAction::UseSuggestion(id) => Ok(suggestions
            .into_iter()
            .find(|p| p.id == id)
            .map(|p| ScanResult::Found(Box::new(p)))
            .unwrap_or(ScanResult::NoResults)),
        EnterAction::LookupBarcode(code) => {
            match remote.inner().products().find_by_barcode(&code).await? {
                Some(product) => {
                    info!(barcode = %code, product_id = %product.id, "Barcode matched");
                    catalog.upsert(product.clone());
                    Ok(ScanResult::Found(Box::new(product)))
                }
                None => {
                    debug!(barcode = %code, "Barcode not found");
                    Ok(ScanResult::NoResults)
                }
            }
        }
        EnterAction::KeepSuggestions => Ok(ScanResult::Suggestions(
            suggestions
                .iter()
                .map(|p| ProductDto::from_product(p, config.low_stock_threshold))
                .collect(),
        )),
        EnterAction::NoResults => Ok(ScanResult::NoResults),
    }
}

/// Fetches one product fresh from the store API and updates the catalog.
///
/// ## Returns
/// The product, or `NOT_FOUND` if the server no longer has it.
pub async fn get_product(
    remote: &RemoteState,
    catalog: &CatalogState,
    id: &str,
) -> Result<Product, ApiError> {
    debug!(id = %id, "get_product command");
    let product = remote
        .inner()
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;
    catalog.upsert(product.clone());
    Ok(product)
}

/// Latest known version of a product for a cart operation.
///
/// Tries the store API first so stock is as fresh as possible. If the API
/// is unreachable the loaded catalog is used instead; a product the server
/// says is gone is never served from the catalog.
pub(crate) async fn current_product(
    remote: &RemoteState,
    catalog: &CatalogState,
    id: &str,
) -> Result<Product, ApiError> {
    match remote.inner().products().get_by_id(id).await {
        Ok(Some(product)) => {
            catalog.upsert(product.clone());
            Ok(product)
        }
        Ok(None) => Err(ApiError::not_found("Product", id)),
        Err(err) if err.is_network() => {
            warn!(id = %id, error = %err, "Using cached product; store API unreachable");
            catalog.find(id).ok_or_else(|| err.into())
        }
        Err(err) => Err(err.into()),
    }
}
