//! # Order Repository
//!
//! Storefront checkout (cash on delivery).

use reqwest::Method;
use tracing::info;

use medwear_core::{Order, OrderDraft};

use crate::client::ApiClient;
use crate::error::{HttpError, HttpResult};
use crate::wire::{decode_order, encode_order};

/// Repository for storefront orders.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    client: ApiClient,
}

impl OrderRepository {
    pub fn new(client: ApiClient) -> Self {
        OrderRepository { client }
    }

    /// Places the order; the response is `{ "order": { "id", ... } }`.
    pub async fn create(&self, draft: &OrderDraft) -> HttpResult<Order> {
        let body = encode_order(draft);
        let response = self
            .client
            .send(Method::POST, &["orders"], &body, "order")
            .await?;
        let order = decode_order(response).map_err(|e| HttpError::decode("created order", e))?;

        info!(order_id = %order.id, total = %draft.total, "Order placed");
        Ok(order)
    }
}
