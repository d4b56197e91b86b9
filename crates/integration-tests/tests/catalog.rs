//! Variant generation, orders and settings end to end.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::atomic::Ordering;

use merchant_admin_core::{
    FieldKind, LanguageCode, ListQuery, OptionSet, OrderId, OrderStatus, PaymentStatus,
    ProductId, ProductOption, StockCheck, VariantError,
};
use merchant_admin_integration_tests::MockBackend;
use rust_decimal::Decimal;

fn size_color() -> OptionSet {
    let mut options = OptionSet::new();
    options
        .add_option(ProductOption::with_values("Size", ["S", "M"]).unwrap())
        .unwrap();
    options
        .add_option(ProductOption::with_values("Color", ["Red", "Blue"]).unwrap())
        .unwrap();
    options
}

#[tokio::test]
async fn generated_variants_replace_the_stored_set() {
    let backend = MockBackend::spawn().await.unwrap();
    let client = backend.client(MockBackend::expired_session());
    let id = ProductId::new("p1");

    let product = client.get_product(&id).await.unwrap();
    assert_eq!(
        product.text.get(FieldKind::Name, &LanguageCode::arabic()),
        Some("قميص كتان")
    );

    let mut variants = product.variant_set();
    let count = variants
        .regenerate(size_color().options(), product.base_sku(), product.price)
        .unwrap();
    assert_eq!(count, 4);
    variants.set_all_quantities(3);
    variants.set_price(3, Decimal::new(2250, 2)).unwrap();

    // 12 units across variants against a product stock of 10: warn, still save.
    let check = variants.stock_check(product.stock.unwrap());
    assert_eq!(
        check,
        StockCheck::ExceedsProductStock {
            variant_total: 12,
            product_stock: 10
        }
    );

    let saved = client.save_variants(&id, &variants, true).await.unwrap();
    assert!(saved.variants_required);
    let names: Vec<&str> = saved.variants.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["S / Red", "S / Blue", "M / Red", "M / Blue"]);
    assert_eq!(saved.variants[0].sku, "SHIRT-S-RED");
    assert_eq!(saved.variants[0].price, Some(Decimal::new(20, 0)));
    assert_eq!(saved.variants[3].price, Some(Decimal::new(2250, 2)));
    assert!(saved.variants.iter().all(|v| v.quantity == 3 && v.is_active));

    let stored = backend.state.product("p1").unwrap();
    assert_eq!(stored["variants"].as_array().unwrap().len(), 4);
    assert_eq!(stored["variants"][1]["attributes"]["Color"], "Blue");
    assert_eq!(stored["variantsRequired"], true);

    // Regenerating with fewer values fully replaces the previous four.
    let mut smaller = OptionSet::new();
    smaller
        .add_option(ProductOption::with_values("Size", ["L"]).unwrap())
        .unwrap();
    let mut variants = saved.variant_set();
    variants
        .regenerate(smaller.options(), saved.base_sku(), saved.price)
        .unwrap();
    let saved = client.save_variants(&id, &variants, false).await.unwrap();
    assert_eq!(saved.variants.len(), 1);
    assert_eq!(saved.variants[0].sku, "SHIRT-L");
}

#[tokio::test]
async fn rejected_generation_sends_nothing() {
    let backend = MockBackend::spawn().await.unwrap();
    let client = backend.client(MockBackend::expired_session());
    let product = client.get_product(&ProductId::new("p1")).await.unwrap();

    let mut options = size_color().options().to_vec();
    options.push(ProductOption::new("Material").unwrap());

    let mut variants = product.variant_set();
    let err = variants
        .regenerate(&options, product.base_sku(), product.price)
        .unwrap_err();
    assert_eq!(err, VariantError::NoValues("Material".into()));
    assert!(variants.is_empty());
    assert_eq!(backend.state.product_writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn order_status_update_and_filtered_list() {
    let backend = MockBackend::spawn().await.unwrap();
    let client = backend.client(MockBackend::expired_session());

    let order = client
        .update_order_status(&OrderId::new("o1"), OrderStatus::Shipped, Some("DHL 123".into()))
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.formatted_total(), "40.00 SAR");
    assert_eq!(order.unit_count(), 2);

    let query = ListQuery {
        status: Some(OrderStatus::Delivered.as_str().to_string()),
        ..ListQuery::default()
    };
    let orders = client.list_orders(&query).await.unwrap();
    assert_eq!(orders.items.len(), 1);
    assert_eq!(orders.items[0].status, OrderStatus::Delivered);
    assert_eq!(
        backend.state.last_query().get("status").map(String::as_str),
        Some("delivered")
    );
    assert_eq!(backend.state.refresh_count(), 1);
}

#[tokio::test]
async fn payment_settings_list_enabled_methods() {
    let backend = MockBackend::spawn().await.unwrap();
    let client = backend.client(MockBackend::expired_session());

    let settings = client.payment_settings().await.unwrap();
    assert_eq!(
        settings.enabled_methods(),
        ["cash_on_delivery", "bank_transfer"]
    );
    assert_eq!(settings.bank_details.unwrap().bank_name, "Al Rajhi");
}
