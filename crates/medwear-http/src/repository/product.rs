//! # Product Repository
//!
//! Catalog reads and product saves.
//!
//! Variant fields arrive as JSON text and are decoded defensively by
//! [`crate::wire`]; a malformed field never fails the listing.

use reqwest::Method;
use tracing::{debug, info};

use medwear_core::Product;

use crate::client::ApiClient;
use crate::error::{HttpError, HttpResult};
use crate::wire::{decode_product, decode_product_list, encode_product, unwrap_envelope};

const PRODUCTS: &str = "products";

/// Repository for product operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    client: ApiClient,
}

impl ProductRepository {
    pub fn new(client: ApiClient) -> Self {
        ProductRepository { client }
    }

    /// Fetches the full catalog.
    ///
    /// Accepts a bare array or `{ "products": [...] }`.
    pub async fn list(&self) -> HttpResult<Vec<Product>> {
        let body = self.client.get(&[PRODUCTS], "products").await?;
        let products =
            decode_product_list(body).map_err(|e| HttpError::decode("product list", e))?;
        debug!(count = products.len(), "Fetched catalog");
        Ok(products)
    }

    /// Gets a product by id. `None` when the server answers 404.
    pub async fn get_by_id(&self, id: &str) -> HttpResult<Option<Product>> {
        let Some(body) = self.client.get_optional(&[PRODUCTS, id], "product").await? else {
            debug!(product_id = %id, "Product not found");
            return Ok(None);
        };
        decode_product(unwrap_envelope(body, "product"))
            .map(Some)
            .map_err(|e| HttpError::decode("product", e))
    }

    /// Looks up a scanned code. `None` when no product carries it.
    pub async fn find_by_barcode(&self, code: &str) -> HttpResult<Option<Product>> {
        let code = code.trim();
        let Some(body) = self
            .client
            .get_optional(&[PRODUCTS, "barcode", code], "product by barcode")
            .await?
        else {
            debug!(barcode = %code, "No product for barcode");
            return Ok(None);
        };
        decode_product(unwrap_envelope(body, "product"))
            .map(Some)
            .map_err(|e| HttpError::decode("product by barcode", e))
    }

    /// Persists the full product shape, including the JSON-text variant fields.
    ///
    /// Returns the saved product as the server echoes it, or the input when
    /// the server answers with an empty body.
    pub async fn update(&self, product: &Product) -> HttpResult<Product> {
        let body = encode_product(product);
        let response = self
            .client
            .send(Method::PUT, &[PRODUCTS, product.id.as_str()], &body, "product")
            .await?;

        info!(product_id = %product.id, stock = product.total_stock(), "Product saved");

        if response.is_null() {
            return Ok(product.clone());
        }
        decode_product(unwrap_envelope(response, "product"))
            .map_err(|e| HttpError::decode("saved product", e))
    }
}
