//! Product browsing commands.

use merchant_admin_client::ApiClient;
use merchant_admin_core::{LanguageCode, ListQuery, Product, ProductId, Variant};

use super::{out, require_session};
use crate::error::CliError;

/// List products.
pub async fn list(
    client: &ApiClient,
    page: Option<u32>,
    search: Option<String>,
) -> Result<(), CliError> {
    require_session(client)?;

    let query = ListQuery {
        page,
        search,
        ..ListQuery::default()
    };
    let products = client.list_products(&query).await?;

    let language = LanguageCode::english();
    for product in &products.items {
        out(&product_line(product, &language));
    }
    if products.has_more() {
        out(&format!(
            "... more on page {}",
            products.page.unwrap_or(1).saturating_add(1)
        ));
    }
    Ok(())
}

/// Show one product and its variants.
pub async fn show(client: &ApiClient, id: &str) -> Result<(), CliError> {
    require_session(client)?;

    let product = client.get_product(&ProductId::new(id)).await?;
    out(&product_line(&product, &LanguageCode::english()));
    if product.variants_required {
        out("Variant selection required");
    }
    for variant in &product.variants {
        out(&variant_line(variant));
    }
    Ok(())
}

pub(crate) fn product_line(product: &Product, language: &LanguageCode) -> String {
    let price = product
        .price
        .map_or_else(|| "-".to_string(), |p| format!("{p:.2}"));
    let stock = product
        .stock
        .map_or_else(|| "-".to_string(), |s| s.to_string());
    format!(
        "{:<10} {:<32} sku={:<16} price={:<10} stock={:<6} variants={}{}",
        product.id,
        product.display_name(language),
        product.base_sku(),
        price,
        stock,
        product.variants.len(),
        if product.is_active { "" } else { " (inactive)" },
    )
}

pub(crate) fn variant_line(variant: &Variant) -> String {
    let price = variant
        .price
        .map_or_else(|| "-".to_string(), |p| format!("{p:.2}"));
    format!(
        "  {:<28} sku={:<24} price={:<10} qty={:<5}{}",
        variant.name,
        variant.sku,
        price,
        variant.quantity,
        if variant.is_active { "" } else { " (inactive)" },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use merchant_admin_core::{FieldKind, LocalizedText, ProductOption, generate_variants};
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_product_line_uses_localized_name() {
        let product = Product {
            id: ProductId::new("p1"),
            text: LocalizedText::new().with(FieldKind::Name, LanguageCode::arabic(), "قميص"),
            sku: Some("SHIRT".into()),
            price: Some(Decimal::new(1999, 2)),
            stock: None,
            category_id: None,
            variants: Vec::new(),
            variants_required: false,
            is_active: false,
            created_at: None,
        };
        let line = product_line(&product, &LanguageCode::english());
        assert!(line.contains("قميص"));
        assert!(line.contains("price=19.99"));
        assert!(line.contains("stock=-"));
        assert!(line.ends_with("(inactive)"));
    }

    #[test]
    fn test_variant_line() {
        let options = [ProductOption::with_values("Size", ["S"]).unwrap()];
        let variants = generate_variants(&options, "CAP", None).unwrap();
        let line = variant_line(variants.first().unwrap());
        assert!(line.contains("sku=CAP-S"));
        assert!(line.contains("price=-"));
        assert!(line.contains("qty=0"));
    }
}
