//! Command tests against a local mock store API.
//!
//! Each test builds only the state objects the command under test takes.

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use medwear_client::commands::cart::{add_to_cart, get_cart, update_cart_item, AddToCartRequest};
use medwear_client::commands::checkout::{place_order, PlaceOrderRequest};
use medwear_client::commands::deal::{create_deal, deal_add_product, CreateDealRequest};
use medwear_client::commands::inventory::{
    add_dimension_value, open_product_editor, save_product, set_variant_stock,
};
use medwear_client::commands::product::{load_catalog, scan_enter, ScanRequest, ScanResult};
use medwear_client::commands::sale::{complete_sale, SaleRequest};
use medwear_client::{
    CartState, CatalogState, ConfigState, DealBuilderState, EditorState, ErrorCode, RemoteState,
    SubmitGuard,
};
use medwear_core::{AddOutcome, Dimension, DiscountType, Money, PaymentMethod, ShippingAddress};
use medwear_http::HttpConfig;

fn remote(server: &MockServer) -> RemoteState {
    medwear_client::init_tracing();
    let mut config = HttpConfig::new(format!("{}/api", server.uri()));
    config.timeout_secs = 5;
    RemoteState::connect(&config).expect("client")
}

/// Two colors × two sizes; Black/M is sold out, White/M has 5.
fn scrub_top() -> Value {
    json!({
        "id": "top",
        "name": "Classic Scrub Top",
        "price": 2500,
        "colors": "[\"Black\",\"White\"]",
        "sizes": "[\"S\",\"M\"]",
        "colorSizeStock": "{\"Black\":{\"S\":2,\"M\":0},\"White\":{\"S\":0,\"M\":5}}"
    })
}

fn lab_coat(stock: u32) -> Value {
    json!({ "id": "coat", "name": "Lab Coat", "price": 1000, "barcode": "MW-0042", "stock": stock })
}

async fn mount_product(server: &MockServer, id: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/products/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn add(
    remote: &RemoteState,
    catalog: &CatalogState,
    cart: &CartState,
    request: AddToCartRequest,
) -> Result<medwear_client::commands::cart::AddToCartResponse, medwear_client::ApiError> {
    add_to_cart(remote, catalog, cart, &ConfigState::default(), request).await
}

fn coat_request() -> AddToCartRequest {
    AddToCartRequest {
        product_id: "coat".to_string(),
        ..AddToCartRequest::default()
    }
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[tokio::test]
async fn variant_add_blocks_sold_out_cell_and_clamps_at_stock() {
    let server = MockServer::start().await;
    mount_product(&server, "top", scrub_top()).await;
    let (remote, catalog, cart) = (remote(&server), CatalogState::new(), CartState::new());

    let black_m = AddToCartRequest {
        product_id: "top".to_string(),
        color: Some("Black".to_string()),
        size: Some("M".to_string()),
        ..AddToCartRequest::default()
    };
    let err = add(&remote, &catalog, &cart, black_m).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert_eq!(get_cart(&cart).item_count, 0);

    let white_m = AddToCartRequest {
        product_id: "top".to_string(),
        color: Some("White".to_string()),
        size: Some("M".to_string()),
        quantity: Some(4),
        ..AddToCartRequest::default()
    };
    let response = add(&remote, &catalog, &cart, white_m.clone()).await.unwrap();
    assert_eq!(response.outcome, AddOutcome::Added { quantity: 4 });

    let response = add(&remote, &catalog, &cart, white_m.clone()).await.unwrap();
    assert!(matches!(
        response.outcome,
        AddOutcome::Clamped { added: 1, quantity: 5, .. }
    ));
    assert!(response.notice.is_some());

    let err = add(&remote, &catalog, &cart, white_m).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert_eq!(get_cart(&cart).total_quantity, 5);
}

#[tokio::test]
async fn variant_product_without_selection_asks_for_one() {
    let server = MockServer::start().await;
    mount_product(&server, "top", scrub_top()).await;
    let (remote, catalog, cart) = (remote(&server), CatalogState::new(), CartState::new());

    let request = AddToCartRequest {
        product_id: "top".to_string(),
        ..AddToCartRequest::default()
    };
    let response = add(&remote, &catalog, &cart, request).await.unwrap();

    assert!(matches!(
        response.outcome,
        AddOutcome::NeedsVariantSelection { .. }
    ));
    assert_eq!(response.cart.item_count, 0);
}

#[tokio::test]
async fn update_beyond_stock_leaves_line_unchanged() {
    let server = MockServer::start().await;
    mount_product(&server, "coat", lab_coat(3)).await;
    let (remote, catalog, cart) = (remote(&server), CatalogState::new(), CartState::new());

    let view = add(&remote, &catalog, &cart, coat_request()).await.unwrap().cart;
    let key = view.lines[0].key.clone();

    let err = update_cart_item(&remote, &catalog, &cart, key.clone(), 4)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert_eq!(get_cart(&cart).total_quantity, 1);

    let view = update_cart_item(&remote, &catalog, &cart, key.clone(), 3)
        .await
        .unwrap();
    assert_eq!(view.total_quantity, 3);

    let view = update_cart_item(&remote, &catalog, &cart, key, 0).await.unwrap();
    assert!(view.lines.is_empty());
}

#[tokio::test]
async fn add_uses_cached_product_when_api_is_unreachable() {
    let server = MockServer::builder().start().await;
    let unreachable = remote(&server);
    drop(server);

    let catalog = CatalogState::new();
    let mut coat = medwear_core::Product::new("coat", "Lab Coat", Money::from_major(1000));
    coat.stock = 2;
    catalog.upsert(coat);
    let cart = CartState::new();

    let response = add(&unreachable, &catalog, &cart, coat_request()).await.unwrap();
    assert_eq!(response.outcome, AddOutcome::Added { quantity: 1 });
}

// ---------------------------------------------------------------------------
// Catalog & scanner
// ---------------------------------------------------------------------------

#[tokio::test]
async fn catalog_reload_shrinks_cart_to_new_stock() {
    let server = MockServer::start().await;
    mount_product(&server, "coat", lab_coat(5)).await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([lab_coat(2)])))
        .mount(&server)
        .await;
    let (remote, catalog, cart) = (remote(&server), CatalogState::new(), CartState::new());

    let request = AddToCartRequest {
        quantity: Some(4),
        ..coat_request()
    };
    add(&remote, &catalog, &cart, request).await.unwrap();

    let load = load_catalog(&remote, &catalog, &cart).await.unwrap();
    assert!(load.applied);
    assert_eq!(load.product_count, 1);
    assert_eq!(load.adjustments.len(), 1);
    assert_eq!(load.adjustments[0].now, 2);
    assert_eq!(get_cart(&cart).total_quantity, 2);
}

#[tokio::test]
async fn scanned_barcode_is_looked_up_on_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/barcode/MW-0042"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lab_coat(3)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products/barcode/MW-0404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Not found" })))
        .mount(&server)
        .await;
    let (remote, catalog, config) = (remote(&server), CatalogState::new(), ConfigState::default());

    let scan = |input: &str| ScanRequest {
        input: input.to_string(),
        ..ScanRequest::default()
    };

    let found = scan_enter(&remote, &catalog, &config, scan("MW-0042")).await.unwrap();
    assert!(matches!(found, ScanResult::Found(ref p) if p.id == "coat"));
    assert!(catalog.find("coat").is_some());

    let missing = scan_enter(&remote, &catalog, &config, scan("MW-0404")).await.unwrap();
    assert_eq!(missing, ScanResult::NoResults);
}

// ---------------------------------------------------------------------------
// Sale
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_sale_keeps_the_cart() {
    let server = MockServer::start().await;
    mount_product(&server, "coat", lab_coat(3)).await;
    Mock::given(method("POST"))
        .and(path("/api/pos/sales"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "error": "Lab Coat is out of stock" })),
        )
        .mount(&server)
        .await;
    let (remote, catalog, cart) = (remote(&server), CatalogState::new(), CartState::new());
    add(&remote, &catalog, &cart, coat_request()).await.unwrap();

    let guard = SubmitGuard::new("Sale");
    let request = SaleRequest {
        payment_method: PaymentMethod::Card,
        ..SaleRequest::default()
    };
    let err = complete_sale(&remote, &cart, &ConfigState::default(), &guard, request)
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ServerError);
    assert_eq!(err.message, "Lab Coat is out of stock");
    assert_eq!(get_cart(&cart).total_quantity, 1);
    assert!(!guard.is_busy());
}

#[tokio::test]
async fn completed_sale_clears_cart_and_returns_receipt() {
    let server = MockServer::start().await;
    mount_product(&server, "coat", lab_coat(3)).await;
    Mock::given(method("POST"))
        .and(path("/api/pos/sales"))
        .and(body_partial_json(json!({
            "paymentMethod": "CASH",
            "discountType": "PERCENTAGE",
            "discount": 10,
            "amountReceived": 1000
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "sale": {
                "id": "s1",
                "receiptNumber": "RCP-000777",
                "items": [{ "productId": "coat", "productName": "Lab Coat", "quantity": 1, "price": 1000 }],
                "subtotal": 1000,
                "discount": 100,
                "total": 900,
                "paymentMethod": "CASH",
                "amountReceived": 1000,
                "changeGiven": 100
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (remote, catalog, cart) = (remote(&server), CatalogState::new(), CartState::new());
    add(&remote, &catalog, &cart, coat_request()).await.unwrap();

    let request = SaleRequest {
        discount_type: DiscountType::Percentage,
        discount: "10".to_string(),
        payment_method: PaymentMethod::Cash,
        amount_received: Some("1000".to_string()),
        ..SaleRequest::default()
    };
    let receipt = complete_sale(
        &remote,
        &cart,
        &ConfigState::default(),
        &SubmitGuard::new("Sale"),
        request,
    )
    .await
    .unwrap();

    assert_eq!(receipt.receipt_number, "RCP-000777");
    assert_eq!(receipt.change_given, Some(Money::from_major(100)));
    assert_eq!(receipt.total_display, "Rs. 900.00");
    assert_eq!(get_cart(&cart).item_count, 0);
}

#[tokio::test]
async fn item_scanned_during_sale_stays_in_cart() {
    let server = MockServer::start().await;
    mount_product(&server, "coat", lab_coat(3)).await;
    mount_product(&server, "pants", json!({ "id": "pants", "name": "Scrub Pants", "price": 1800, "stock": 4 }))
        .await;
    Mock::given(method("POST"))
        .and(path("/api/pos/sales"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({
                    "receiptNumber": "RCP-000778",
                    "items": [{ "productId": "coat", "productName": "Lab Coat", "quantity": 1, "price": 1000 }],
                    "subtotal": 1000,
                    "total": 1000,
                    "paymentMethod": "CARD"
                }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    let (remote, catalog, cart) = (remote(&server), CatalogState::new(), CartState::new());
    add(&remote, &catalog, &cart, coat_request()).await.unwrap();

    let request = SaleRequest {
        payment_method: PaymentMethod::Card,
        ..SaleRequest::default()
    };
    let config = ConfigState::default();
    let guard = SubmitGuard::new("Sale");
    let pants = AddToCartRequest {
        product_id: "pants".to_string(),
        ..AddToCartRequest::default()
    };
    let (receipt, added) = tokio::join!(
        complete_sale(&remote, &cart, &config, &guard, request),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            add(&remote, &catalog, &cart, pants).await
        }
    );

    assert_eq!(receipt.unwrap().items.len(), 1);
    added.unwrap();
    let view = get_cart(&cart);
    assert_eq!(view.item_count, 1);
    assert_eq!(view.lines[0].line.product_id, "pants");
}

#[tokio::test]
async fn short_cash_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    mount_product(&server, "coat", lab_coat(3)).await;
    Mock::given(method("POST"))
        .and(path("/api/pos/sales"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let (remote, catalog, cart) = (remote(&server), CatalogState::new(), CartState::new());
    add(&remote, &catalog, &cart, coat_request()).await.unwrap();

    let request = SaleRequest {
        payment_method: PaymentMethod::Cash,
        amount_received: Some("800".to_string()),
        ..SaleRequest::default()
    };
    let err = complete_sale(
        &remote,
        &cart,
        &ConfigState::default(),
        &SubmitGuard::new("Sale"),
        request,
    )
    .await
    .unwrap_err();

    assert_eq!(err.code, ErrorCode::PaymentError);
    assert_eq!(get_cart(&cart).item_count, 1);
}

#[tokio::test]
async fn second_submission_while_in_flight_is_rejected() {
    let server = MockServer::start().await;
    let guard = SubmitGuard::new("Sale");
    let _pending = guard.try_begin().unwrap();

    let err = complete_sale(
        &remote(&server),
        &CartState::new(),
        &ConfigState::default(),
        &guard,
        SaleRequest::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.code, ErrorCode::RequestInFlight);
}

// ---------------------------------------------------------------------------
// Storefront order
// ---------------------------------------------------------------------------

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Ayesha Khan".to_string(),
        phone: "03001234567".to_string(),
        email: None,
        address: "12 Mall Road".to_string(),
        city: "Lahore".to_string(),
        postal_code: None,
    }
}

#[tokio::test]
async fn order_is_cod_and_clears_cart() {
    let server = MockServer::start().await;
    mount_product(&server, "coat", lab_coat(3)).await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(body_partial_json(json!({
            "paymentMethod": "COD",
            "subtotal": 1000,
            "shippingFee": 200,
            "total": 1200
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "order": { "id": "o1", "status": "PENDING" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (remote, catalog, cart) = (remote(&server), CatalogState::new(), CartState::new());
    add(&remote, &catalog, &cart, coat_request()).await.unwrap();

    let request = PlaceOrderRequest {
        shipping_address: address(),
        notes: None,
    };
    let confirmation = place_order(
        &remote,
        &cart,
        &ConfigState::default(),
        &SubmitGuard::new("Order"),
        request,
    )
    .await
    .unwrap();

    assert_eq!(confirmation.order_id, "o1");
    assert_eq!(confirmation.total, Money::from_major(1200));
    assert_eq!(get_cart(&cart).item_count, 0);
}

#[tokio::test]
async fn units_added_while_order_is_placed_stay_in_cart() {
    let server = MockServer::start().await;
    mount_product(&server, "coat", lab_coat(5)).await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(body_partial_json(json!({ "total": 1200 })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "order": { "id": "o2" } }))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (remote, catalog, cart) = (remote(&server), CatalogState::new(), CartState::new());
    add(&remote, &catalog, &cart, coat_request()).await.unwrap();

    let request = PlaceOrderRequest {
        shipping_address: address(),
        notes: None,
    };
    let config = ConfigState::default();
    let guard = SubmitGuard::new("Order");
    let more = AddToCartRequest {
        quantity: Some(2),
        ..coat_request()
    };
    let (placed, added) = tokio::join!(
        place_order(&remote, &cart, &config, &guard, request),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            add(&remote, &catalog, &cart, more).await
        }
    );

    assert_eq!(placed.unwrap().order_id, "o2");
    added.unwrap();
    assert_eq!(get_cart(&cart).total_quantity, 2);
}

#[tokio::test]
async fn order_without_city_is_not_sent() {
    let server = MockServer::start().await;
    mount_product(&server, "coat", lab_coat(3)).await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let (remote, catalog, cart) = (remote(&server), CatalogState::new(), CartState::new());
    add(&remote, &catalog, &cart, coat_request()).await.unwrap();

    let request = PlaceOrderRequest {
        shipping_address: ShippingAddress {
            city: "  ".to_string(),
            ..address()
        },
        notes: None,
    };
    let err = place_order(
        &remote,
        &cart,
        &ConfigState::default(),
        &SubmitGuard::new("Order"),
        request,
    )
    .await
    .unwrap_err();

    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(get_cart(&cart).item_count, 1);
}

// ---------------------------------------------------------------------------
// Admin: stock editor
// ---------------------------------------------------------------------------

#[tokio::test]
async fn editor_saves_matrix_with_synced_stock() {
    let server = MockServer::start().await;
    mount_product(&server, "top", scrub_top()).await;
    Mock::given(method("PUT"))
        .and(path("/api/products/top"))
        .and(body_partial_json(json!({ "stock": 11 })))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;
    let remote = remote(&server);
    let (editor, catalog, config) = (EditorState::new(), CatalogState::new(), ConfigState::default());

    let view = open_product_editor(&remote, &editor, &config, "top").await.unwrap();
    assert!(view.variant_mode);
    assert_eq!(view.total_stock, 7);

    let view = add_dimension_value(&editor, &config, Dimension::Size, "L").unwrap();
    assert_eq!(view.product.cell_stock("White", "L"), 0);

    set_variant_stock(&editor, &config, "White", "L", "4").unwrap();
    let err = set_variant_stock(&editor, &config, "White", "L", "-2").unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let saved = save_product(&remote, &editor, &catalog, &config, &SubmitGuard::new("Save"))
        .await
        .unwrap();
    assert_eq!(saved.total_stock, 11);
    assert_eq!(catalog.find("top").map(|p| p.stock), Some(11));
}

#[tokio::test]
async fn failed_save_keeps_unsaved_edits() {
    let server = MockServer::start().await;
    mount_product(&server, "top", scrub_top()).await;
    Mock::given(method("PUT"))
        .and(path("/api/products/top"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "Database unavailable" })))
        .expect(1)
        .mount(&server)
        .await;
    let remote = remote(&server);
    let (editor, catalog, config) = (EditorState::new(), CatalogState::new(), ConfigState::default());
    open_product_editor(&remote, &editor, &config, "top").await.unwrap();
    set_variant_stock(&editor, &config, "Black", "M", "6").unwrap();

    let guard = SubmitGuard::new("Save");
    let err = save_product(&remote, &editor, &catalog, &config, &guard)
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ServerError);
    assert_eq!(err.message, "Database unavailable");
    let current = editor.current().unwrap();
    assert_eq!(current.cell_stock("Black", "M"), 6);
    assert_eq!(current.total_stock(), 13);
    assert!(catalog.find("top").is_none());
    assert!(!guard.is_busy());
}

// ---------------------------------------------------------------------------
// Admin: deals
// ---------------------------------------------------------------------------

fn deal_catalog() -> CatalogState {
    let catalog = CatalogState::new();
    catalog.upsert(medwear_core::Product::new("top", "Scrub Top", Money::from_major(2000)));
    catalog.upsert(medwear_core::Product::new("pants", "Scrub Pants", Money::from_major(1800)));
    catalog
}

fn deal_request() -> CreateDealRequest {
    CreateDealRequest {
        name: "Starter Set".to_string(),
        description: None,
        deal_price: "3000".to_string(),
    }
}

#[tokio::test]
async fn single_product_deal_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/deals"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let (deals, catalog) = (DealBuilderState::new(), deal_catalog());
    deal_add_product(&deals, &catalog, "top").unwrap();

    let err = create_deal(&remote(&server), &deals, &SubmitGuard::new("Deal"), deal_request())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(deals.snapshot().product_count(), 1);
}

#[tokio::test]
async fn two_product_deal_is_created_and_builder_reset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/deals"))
        .and(body_partial_json(json!({ "name": "Starter Set", "dealPrice": 3000 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "deal": {
                "id": "d1",
                "name": "Starter Set",
                "dealPrice": 3000,
                "items": [{ "productId": "top", "quantity": 1 }, { "productId": "pants", "quantity": 1 }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (deals, catalog) = (DealBuilderState::new(), deal_catalog());
    deal_add_product(&deals, &catalog, "top").unwrap();
    deal_add_product(&deals, &catalog, "pants").unwrap();

    let deal = create_deal(&remote(&server), &deals, &SubmitGuard::new("Deal"), deal_request())
        .await
        .unwrap();

    assert_eq!(deal.id, "d1");
    assert_eq!(deals.snapshot().product_count(), 0);
}

#[tokio::test]
async fn rejected_deal_keeps_the_builder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/deals"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    let (deals, catalog) = (DealBuilderState::new(), deal_catalog());
    deal_add_product(&deals, &catalog, "top").unwrap();
    deal_add_product(&deals, &catalog, "pants").unwrap();
    let before = deals.snapshot();

    let err = create_deal(&remote(&server), &deals, &SubmitGuard::new("Deal"), deal_request())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ServerError);
    assert_eq!(deals.snapshot(), before);
}

#[tokio::test]
async fn product_picked_while_deal_is_created_stays_in_builder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/deals"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "deal": { "id": "d2", "name": "Starter Set", "dealPrice": 3000 } }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    let (deals, catalog) = (DealBuilderState::new(), deal_catalog());
    catalog.upsert(medwear_core::Product::new("cap", "Scrub Cap", Money::from_major(400)));
    deal_add_product(&deals, &catalog, "top").unwrap();
    deal_add_product(&deals, &catalog, "pants").unwrap();

    let remote = remote(&server);
    let guard = SubmitGuard::new("Deal");
    let (created, picked) = tokio::join!(
        create_deal(&remote, &deals, &guard, deal_request()),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            deal_add_product(&deals, &catalog, "cap")
        }
    );

    assert_eq!(created.unwrap().id, "d2");
    picked.unwrap();
    let draft = deals.snapshot();
    assert_eq!(draft.product_count(), 1);
    assert_eq!(draft.items[0].product_id, "cap");
}
