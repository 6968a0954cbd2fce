//! # Wire Format
//!
//! Converts between the store API's JSON and the structured core types.
//!
//! ## JSON-String Fields
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  On the wire                             In memory                      │
//! │  ───────────                             ─────────                      │
//! │  "images":  "[\"a.jpg\"]"          ──►   Vec<String>                    │
//! │  "sizes":   "[\"S\",\"M\"]"        ──►   Vec<String>                    │
//! │  "colors":  "[\"Black\"]"          ──►   Vec<String>                    │
//! │  "colorImages": "{\"Black\":[..]}" ──►   BTreeMap<String, Vec<String>>  │
//! │  "colorSizeStock": "{..}"          ──►   StockMatrix                    │
//! │                                                                         │
//! │  Decode accepts a JSON string, the structure itself, or null.           │
//! │  Anything unparsable becomes empty and is logged; it never fails the    │
//! │  whole product.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Money
//! The API speaks decimal major units (`1299.5`, sometimes `"1299.50"`).
//! Values are converted through their decimal text with
//! [`Money::parse_decimal`]; floats are only used as a last resort for
//! numbers the server rendered with binary noise (`0.30000000000000004`).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::warn;

use medwear_core::deal::Deal;
use medwear_core::{
    DealDraft, DealItem, Money, Order, OrderDraft, PaymentMethod, Product, Sale,
    SaleDraft, SaleLine, StockMatrix, MAX_STOCK_PER_CELL,
};

// =============================================================================
// Scalars
// =============================================================================

/// Money as a JSON number in major units. Whole amounts are sent as integers.
pub fn money_to_json(money: Money) -> Value {
    if money.minor_part() == 0 {
        return Value::from(money.major());
    }
    serde_json::from_str(&money.to_decimal_string()).unwrap_or(Value::Null)
}

/// Reads a money amount from a JSON number or decimal string.
///
/// `None` for anything unreadable, including amounts too large for [`Money`].
pub fn money_from_json(value: &Value) -> Option<Money> {
    match value {
        Value::Number(n) => {
            if let Some(major) = n.as_i64() {
                return Money::checked_from_major(major);
            }
            Money::parse_decimal(&n.to_string()).ok().or_else(|| {
                n.as_f64()
                    .map(|f| (f * 100.0).round())
                    .filter(|cents| cents.is_finite() && cents.abs() < i64::MAX as f64)
                    .map(|cents| Money::from_cents(cents as i64))
            })
        }
        Value::String(s) => Money::parse_decimal(s).ok(),
        _ => None,
    }
}

/// Like [`money_from_json`], but logs unreadable values and treats them as zero.
fn money_field(owner: &str, field: &str, value: &Value) -> Money {
    if value.is_null() {
        return Money::zero();
    }
    money_from_json(value).unwrap_or_else(|| {
        warn!(owner = %owner, field, value = %value, "Unreadable amount, using 0");
        Money::zero()
    })
}

/// A non-negative count from a number or numeric string; anything else is 0.
/// Counts above [`MAX_STOCK_PER_CELL`] are clamped to it.
fn count_from_json(owner: &str, field: &str, value: &Value) -> u32 {
    let parsed = match value {
        Value::Null => return 0,
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n > MAX_COUNT => {
            warn!(owner = %owner, field, value = %value, max = MAX_COUNT, "Count too large, clamping");
            MAX_COUNT as u32
        }
        Some(n) => n as u32,
        None => {
            warn!(owner = %owner, field, value = %value, "Invalid stock count, using 0");
            0
        }
    }
}

/// Upper bound for any decoded count.
const MAX_COUNT: u64 = MAX_STOCK_PER_CELL as u64;

/// Text from a string, a number, or an object's `name`.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("name").and_then(text_of),
        _ => None,
    }
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn payment_method_of(value: &Value) -> PaymentMethod {
    match value.as_str().map(str::to_ascii_uppercase).as_deref() {
        Some("CARD") => PaymentMethod::Card,
        _ => PaymentMethod::Cash,
    }
}

/// Inserts `value` under `key` only when it is present.
fn insert_opt(body: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        body.insert(key.to_string(), value);
    }
}

/// Returns `body[key]` when the server wrapped the entity, else `body`.
pub fn unwrap_envelope(body: Value, key: &str) -> Value {
    match body {
        Value::Object(mut map) if map.get(key).is_some_and(Value::is_object) => {
            map.remove(key).unwrap_or(Value::Null)
        }
        other => other,
    }
}

// =============================================================================
// JSON-String Fields
// =============================================================================

/// Decodes a field that may hold JSON text, the structure itself, or null.
///
/// Never fails: a malformed value is logged and replaced with `T::default()`.
pub fn decode_json_field<T>(owner: &str, field: &str, value: Value) -> T
where
    T: DeserializeOwned + Default,
{
    let parsed = match value {
        Value::Null => return T::default(),
        Value::String(s) if s.trim().is_empty() => return T::default(),
        Value::String(s) => serde_json::from_str(&s),
        other => serde_json::from_value(other),
    };
    parsed.unwrap_or_else(|err| {
        warn!(owner = %owner, field, error = %err, "Malformed JSON field, using empty value");
        T::default()
    })
}

/// Encodes a structured value as the JSON text the API stores.
pub fn encode_json_field<T: Serialize>(value: &T) -> Value {
    Value::String(serde_json::to_string(value).unwrap_or_default())
}

fn decode_stock_matrix(owner: &str, value: Value) -> StockMatrix {
    let raw: BTreeMap<String, BTreeMap<String, Value>> =
        decode_json_field(owner, "colorSizeStock", value);

    let mut matrix = StockMatrix::new();
    for (color, row) in &raw {
        for (size, qty) in row {
            matrix.set(color, size, count_from_json(owner, "colorSizeStock", qty));
        }
    }
    matrix
}

// =============================================================================
// Product
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProduct {
    id: Value,
    #[serde(default)]
    name: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    cost_price: Value,
    #[serde(default)]
    price: Value,
    #[serde(default)]
    sale_price: Value,
    #[serde(default)]
    images: Value,
    #[serde(default)]
    barcode: Value,
    #[serde(default)]
    sku: Value,
    #[serde(default)]
    company: Value,
    #[serde(default)]
    category: Value,
    #[serde(default)]
    sizes: Value,
    #[serde(default)]
    colors: Value,
    #[serde(default)]
    color_images: Value,
    #[serde(default)]
    color_size_stock: Value,
    #[serde(default)]
    stock: Value,
    #[serde(default)]
    is_active: Option<bool>,
}

/// Decodes one product.
///
/// Only a missing/invalid `id` fails; every variant field degrades to empty.
pub fn decode_product(value: Value) -> Result<Product, serde_json::Error> {
    let wire: WireProduct = serde_json::from_value(value)?;
    let id = text_of(&wire.id)
        .ok_or_else(|| serde_json::Error::custom("product has no id"))?;

    let mut product = Product::new(id, wire.name, Money::zero());
    let owner = product.id.clone();

    if let Some(slug) = wire.slug.filter(|s| !s.trim().is_empty()) {
        product.slug = slug;
    }
    product.description = wire.description;
    product.price = money_field(&owner, "price", &wire.price);
    product.cost_price = money_field(&owner, "costPrice", &wire.cost_price);
    product.sale_price = money_from_json(&wire.sale_price);
    product.barcode = text_of(&wire.barcode);
    product.sku = text_of(&wire.sku);
    product.company = text_of(&wire.company);
    product.category = text_of(&wire.category);
    product.images = decode_json_field(&owner, "images", wire.images);
    product.sizes = decode_json_field(&owner, "sizes", wire.sizes);
    product.colors = decode_json_field(&owner, "colors", wire.colors);
    product.color_images = decode_json_field(&owner, "colorImages", wire.color_images);
    product.color_size_stock = decode_stock_matrix(&owner, wire.color_size_stock);
    product.stock = count_from_json(&owner, "stock", &wire.stock);
    product.is_active = wire.is_active.unwrap_or(true);

    product.normalize_variants();
    Ok(product)
}

/// Decodes `[...]` or `{ "products": [...] }`. Malformed entries are skipped.
pub fn decode_product_list(body: Value) -> Result<Vec<Product>, serde_json::Error> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("products") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(serde_json::Error::custom(
                    "expected an array or an object with \"products\"",
                ))
            }
        },
        _ => return Err(serde_json::Error::custom("expected a product list")),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match decode_product(item) {
            Ok(product) => Some(product),
            Err(err) => {
                warn!(error = %err, "Skipping malformed product");
                None
            }
        })
        .collect())
}

/// The PUT body for a product. Variant fields go out as JSON text and
/// `stock` carries the derived total.
pub fn encode_product(product: &Product) -> Value {
    json!({
        "id": product.id,
        "name": product.name,
        "slug": product.slug,
        "description": product.description,
        "costPrice": money_to_json(product.cost_price),
        "price": money_to_json(product.price),
        "salePrice": product.sale_price.map(money_to_json),
        "images": encode_json_field(&product.images),
        "barcode": product.barcode,
        "sku": product.sku,
        "company": product.company,
        "category": product.category,
        "sizes": encode_json_field(&product.sizes),
        "colors": encode_json_field(&product.colors),
        "colorImages": encode_json_field(&product.color_images),
        "colorSizeStock": encode_json_field(&product.color_size_stock),
        "stock": product.total_stock(),
        "isActive": product.is_active,
    })
}

// =============================================================================
// Sale
// =============================================================================

/// The POST sale body.
pub fn encode_sale(draft: &SaleDraft) -> Value {
    let items: Vec<Value> = draft
        .items
        .iter()
        .map(|item| {
            json!({
                "productId": item.product_id,
                "quantity": item.quantity,
                "size": item.size,
                "color": item.color,
            })
        })
        .collect();

    // percentage value is basis points, fixed is minor units; both have
    // two implied decimals
    let discount = money_to_json(Money::from_cents(draft.discount.value));

    let mut body = Map::new();
    body.insert("items".to_string(), Value::Array(items));
    body.insert("discount".to_string(), discount);
    body.insert("discountType".to_string(), json!(draft.discount.kind));
    body.insert("paymentMethod".to_string(), json!(draft.payment_method));
    insert_opt(&mut body, "customerName", draft.customer.name.clone().map(Value::String));
    insert_opt(&mut body, "customerPhone", draft.customer.phone.clone().map(Value::String));
    insert_opt(&mut body, "amountReceived", draft.amount_received.map(money_to_json));
    insert_opt(&mut body, "notes", draft.notes.clone().map(Value::String));
    Value::Object(body)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSaleItem {
    #[serde(default)]
    product_id: Value,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    product: Value,
    #[serde(default)]
    quantity: Value,
    #[serde(default)]
    price: Value,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSale {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    receipt_number: Value,
    #[serde(default)]
    items: Vec<WireSaleItem>,
    #[serde(default)]
    subtotal: Value,
    #[serde(default)]
    discount: Value,
    #[serde(default)]
    discount_amount: Value,
    #[serde(default)]
    total: Value,
    #[serde(default)]
    payment_method: Value,
    #[serde(default)]
    amount_received: Value,
    #[serde(default)]
    change_given: Value,
    #[serde(default)]
    customer_name: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

/// Decodes the created sale (bare or under `"sale"`).
pub fn decode_sale(body: Value) -> Result<Sale, serde_json::Error> {
    let wire: WireSale = serde_json::from_value(unwrap_envelope(body, "sale"))?;
    let receipt_number = text_of(&wire.receipt_number)
        .ok_or_else(|| serde_json::Error::custom("sale has no receipt number"))?;
    let id = text_of(&wire.id).unwrap_or_else(|| receipt_number.clone());
    let owner = receipt_number.clone();

    let items = wire
        .items
        .into_iter()
        .map(|item| SaleLine {
            product_id: text_of(&item.product_id).unwrap_or_default(),
            product_name: item
                .product_name
                .or_else(|| text_of(&item.product))
                .unwrap_or_default(),
            quantity: count_from_json(&owner, "quantity", &item.quantity),
            price: money_field(&owner, "price", &item.price),
            size: item.size,
            color: item.color,
        })
        .collect();

    let discount = if wire.discount_amount.is_null() {
        &wire.discount
    } else {
        &wire.discount_amount
    };

    Ok(Sale {
        id,
        items,
        subtotal: money_field(&owner, "subtotal", &wire.subtotal),
        discount: money_field(&owner, "discount", discount),
        total: money_field(&owner, "total", &wire.total),
        payment_method: payment_method_of(&wire.payment_method),
        amount_received: money_from_json(&wire.amount_received),
        change_given: money_from_json(&wire.change_given),
        customer_name: wire.customer_name,
        created_at: parse_timestamp(wire.created_at.as_deref()),
        receipt_number,
    })
}

// =============================================================================
// Order
// =============================================================================

/// The POST order body. The address is sent as JSON text.
pub fn encode_order(draft: &OrderDraft) -> Value {
    let items: Vec<Value> = draft
        .items
        .iter()
        .map(|item| {
            let mut line = Map::new();
            line.insert("productId".to_string(), json!(item.product_id));
            line.insert("quantity".to_string(), json!(item.quantity));
            line.insert("price".to_string(), money_to_json(item.price));
            insert_opt(&mut line, "size", item.size.clone().map(Value::String));
            insert_opt(&mut line, "color", item.color.clone().map(Value::String));
            insert_opt(
                &mut line,
                "customization",
                item.customization.clone().map(Value::String),
            );
            insert_opt(
                &mut line,
                "customizationPrice",
                item.customization_price.map(money_to_json),
            );
            Value::Object(line)
        })
        .collect();

    json!({
        "items": items,
        "subtotal": money_to_json(draft.subtotal),
        "shippingFee": money_to_json(draft.shipping_fee),
        "total": money_to_json(draft.total),
        "shippingAddress": encode_json_field(&draft.shipping_address),
        "paymentMethod": OrderDraft::PAYMENT_METHOD,
        "notes": draft.notes,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOrder {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    total: Value,
    #[serde(default)]
    created_at: Option<String>,
}

/// Decodes `{ "order": { "id": ... } }` (or a bare order).
pub fn decode_order(body: Value) -> Result<Order, serde_json::Error> {
    let wire: WireOrder = serde_json::from_value(unwrap_envelope(body, "order"))?;
    let id = text_of(&wire.id).ok_or_else(|| serde_json::Error::custom("order has no id"))?;
    Ok(Order {
        id,
        status: wire.status,
        total: money_from_json(&wire.total),
        created_at: parse_timestamp(wire.created_at.as_deref()),
    })
}

// =============================================================================
// Deal
// =============================================================================

/// The POST deal body.
pub fn encode_deal(draft: &DealDraft) -> Value {
    let items: Vec<Value> = draft
        .items
        .iter()
        .map(|item| json!({ "productId": item.product_id, "quantity": item.quantity }))
        .collect();

    let mut body = Map::new();
    body.insert("name".to_string(), json!(draft.name.trim()));
    insert_opt(&mut body, "description", draft.description.clone().map(Value::String));
    body.insert("dealPrice".to_string(), money_to_json(draft.deal_price));
    body.insert("items".to_string(), Value::Array(items));
    Value::Object(body)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDealItem {
    #[serde(default)]
    product_id: Value,
    #[serde(default)]
    quantity: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDeal {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    deal_price: Value,
    #[serde(default)]
    original_price: Value,
    #[serde(default, alias = "products")]
    items: Vec<WireDealItem>,
    #[serde(default)]
    is_active: Option<bool>,
}

/// Decodes a created deal (bare or under `"deal"`).
pub fn decode_deal(body: Value) -> Result<Deal, serde_json::Error> {
    let wire: WireDeal = serde_json::from_value(unwrap_envelope(body, "deal"))?;
    let id = text_of(&wire.id).ok_or_else(|| serde_json::Error::custom("deal has no id"))?;
    let items = wire
        .items
        .iter()
        .map(|item| DealItem {
            product_id: text_of(&item.product_id).unwrap_or_default(),
            quantity: count_from_json(&id, "quantity", &item.quantity).max(1),
        })
        .collect();

    Ok(Deal {
        deal_price: money_field(&id, "dealPrice", &wire.deal_price),
        original_price: money_from_json(&wire.original_price),
        id,
        name: wire.name,
        description: wire.description,
        items,
        is_active: wire.is_active.unwrap_or(true),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
