//! # Sale Repository
//!
//! Submits a POS sale in one request. The server prices the lines,
//! decrements stock atomically and assigns the receipt number.

use reqwest::Method;
use tracing::info;

use medwear_core::{Sale, SaleDraft};

use crate::client::ApiClient;
use crate::error::{HttpError, HttpResult};
use crate::wire::{decode_sale, encode_sale};

/// Repository for POS sales.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    client: ApiClient,
}

impl SaleRepository {
    pub fn new(client: ApiClient) -> Self {
        SaleRepository { client }
    }

    /// Creates the sale. Either the whole sale is recorded or nothing is.
    pub async fn create(&self, draft: &SaleDraft) -> HttpResult<Sale> {
        let body = encode_sale(draft);
        let response = self
            .client
            .send(Method::POST, &["pos", "sales"], &body, "sale")
            .await?;
        let sale = decode_sale(response).map_err(|e| HttpError::decode("created sale", e))?;

        info!(
            receipt = %sale.receipt_number,
            total = %sale.total,
            lines = sale.items.len(),
            "Sale recorded"
        );
        Ok(sale)
    }
}
