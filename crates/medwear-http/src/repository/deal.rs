//! # Deal Repository

use reqwest::Method;
use tracing::info;

use medwear_core::{Deal, DealDraft};

use crate::client::ApiClient;
use crate::error::{HttpError, HttpResult};
use crate::wire::{decode_deal, encode_deal};

/// Repository for bundle deals.
#[derive(Debug, Clone)]
pub struct DealRepository {
    client: ApiClient,
}

impl DealRepository {
    pub fn new(client: ApiClient) -> Self {
        DealRepository { client }
    }

    /// Creates a deal. Callers validate the draft first; this does not.
    pub async fn create(&self, draft: &DealDraft) -> HttpResult<Deal> {
        let body = encode_deal(draft);
        let response = self
            .client
            .send(Method::POST, &["deals"], &body, "deal")
            .await?;
        let deal = decode_deal(response).map_err(|e| HttpError::decode("created deal", e))?;

        info!(deal_id = %deal.id, products = deal.items.len(), "Deal created");
        Ok(deal)
    }
}
