//! # Deal Commands
//!
//! The admin console's bundle builder.
//!
//! A deal needs at least two distinct products; `create_deal` refuses
//! anything less without calling the store API.

use medwear_core::deal::MIN_DEAL_PRODUCTS;
use medwear_core::{CoreError, Deal, DealDraft, Money};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::ApiError;
use crate::state::{CatalogState, DealBuilderState, RemoteState, SubmitGuard};

/// Builder panel contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealView {
    pub draft: DealDraft,
    pub product_count: usize,
    /// Σ current unit prices; `None` if a picked product left the catalog.
    pub original_price: Option<Money>,
    /// Enough products picked to submit.
    pub can_submit: bool,
}

impl DealView {
    fn new(draft: DealDraft, catalog: &CatalogState) -> Self {
        let original_price = catalog.with_products(|products| draft.original_price(products).ok());
        DealView {
            product_count: draft.product_count(),
            can_submit: draft.product_count() >= MIN_DEAL_PRODUCTS,
            original_price,
            draft,
        }
    }
}

/// Current builder contents.
pub fn get_deal_draft(deals: &DealBuilderState, catalog: &CatalogState) -> DealView {
    DealView::new(deals.snapshot(), catalog)
}

/// Picks a product for the deal; picking it again adds one more unit.
pub fn deal_add_product(
    deals: &DealBuilderState,
    catalog: &CatalogState,
    product_id: &str,
) -> Result<DealView, ApiError> {
    debug!(product_id = %product_id, "deal_add_product command");
    if catalog.find(product_id).is_none() {
        return Err(CoreError::ProductNotFound(product_id.to_string()).into());
    }
    deals.with_draft_mut(|draft| draft.add_product(product_id));
    Ok(get_deal_draft(deals, catalog))
}

/// Sets how many units of a picked product the deal contains.
pub fn deal_set_quantity(
    deals: &DealBuilderState,
    catalog: &CatalogState,
    product_id: &str,
    quantity: i64,
) -> Result<DealView, ApiError> {
    debug!(product_id = %product_id, quantity, "deal_set_quantity command");
    deals.with_draft_mut(|draft| draft.set_quantity(product_id, quantity))?;
    Ok(get_deal_draft(deals, catalog))
}

/// Drops a product from the deal. Dropping one that is not there is a no-op.
pub fn deal_remove_product(
    deals: &DealBuilderState,
    catalog: &CatalogState,
    product_id: &str,
) -> DealView {
    debug!(product_id = %product_id, "deal_remove_product command");
    deals.with_draft_mut(|draft| draft.remove_product(product_id));
    get_deal_draft(deals, catalog)
}

/// Name and price fields of the deal form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDealRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// As typed, e.g. "4500" or "4500.50".
    pub deal_price: String,
}

/// Validates and submits the deal.
///
/// ## Behavior
/// - Name, price and the two-product minimum are checked first; a failing
///   deal never reaches the network
/// - On success the submitted products leave the builder; the builder is
///   empty again unless more were picked while the request was out
/// - On failure the builder keeps its products
pub async fn create_deal(
    remote: &RemoteState,
    deals: &DealBuilderState,
    guard: &SubmitGuard,
    request: CreateDealRequest,
) -> Result<Deal, ApiError> {
    let _token = guard.try_begin()?;
    debug!(name = %request.name, "create_deal command");

    let deal_price = Money::parse_decimal(&request.deal_price).map_err(CoreError::from)?;
    let draft = DealDraft {
        name: request.name.trim().to_string(),
        description: request
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        deal_price,
        ..deals.snapshot()
    };
    draft.validate()?;

    let deal = remote
        .inner()
        .deals()
        .create(&draft)
        .await
        .map_err(|err| {
            error!(name = %draft.name, error = %err, "Deal creation failed");
            ApiError::from(err)
        })?;

    deals.with_draft_mut(|d| d.settle(&draft.items));
    info!(deal_id = %deal.id, products = deal.items.len(), "Deal created");
    Ok(deal)
}
