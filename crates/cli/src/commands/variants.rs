//! Variant generation command.

use merchant_admin_client::ApiClient;
use merchant_admin_core::{LanguageCode, OptionSet, ProductId, ProductOption, StockCheck};
use rust_decimal::Decimal;

use super::products::variant_line;
use super::{out, require_session};
use crate::error::CliError;

/// Arguments of `variants generate`.
pub struct GenerateArgs {
    pub product_id: String,
    pub options: Vec<ProductOption>,
    pub base_sku: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: u32,
    pub required: bool,
    pub dry_run: bool,
}

/// Parse a `Name=value1,value2` option argument.
///
/// # Errors
///
/// Returns a message if the `=` is missing or the option is invalid.
pub fn parse_option(raw: &str) -> Result<ProductOption, String> {
    let (name, values) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected Name=value1,value2, got '{raw}'"))?;
    ProductOption::with_values(name, values.split(',').map(str::trim))
        .map_err(|e| e.to_string())
}

/// Regenerate a product's variants and, unless dry-running, save them.
///
/// The new set replaces every existing variant of the product.
pub async fn generate(client: &ApiClient, args: &GenerateArgs) -> Result<(), CliError> {
    require_session(client)?;

    let mut option_set = OptionSet::new();
    for option in &args.options {
        option_set.add_option(option.clone())?;
    }

    let id = ProductId::new(args.product_id.as_str());
    let product = client.get_product(&id).await?;
    let base_sku = args.base_sku.as_deref().unwrap_or_else(|| product.base_sku());
    let price = args.price.or(product.price);

    let mut variants = product.variant_set();
    let previous = variants.len();
    let count = variants.regenerate(option_set.options(), base_sku, price)?;
    variants.set_all_quantities(args.quantity);

    out(&format!(
        "{}: {count} variants",
        product.display_name(&LanguageCode::english())
    ));
    for variant in variants.variants() {
        out(&variant_line(variant));
    }

    if let Some(stock) = product.stock
        && let StockCheck::ExceedsProductStock {
            variant_total,
            product_stock,
        } = variants.stock_check(stock)
    {
        tracing::warn!(variant_total, product_stock, "Variant stock exceeds product stock");
        out(&format!(
            "warning: variant stock ({variant_total}) exceeds product stock ({product_stock})"
        ));
    }

    if args.dry_run {
        out("Dry run: nothing saved");
        return Ok(());
    }

    let saved = client.save_variants(&id, &variants, args.required).await?;
    out(&format!(
        "Replaced {previous} variants with {}",
        saved.variants.len()
    ));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use merchant_admin_core::VariantError;

    use super::*;

    #[test]
    fn test_parse_option_trims_values() {
        let option = parse_option("Color=Red, Navy Blue ,Green").unwrap();
        assert_eq!(option.name(), "Color");
        assert_eq!(option.values(), ["Red", "Navy Blue", "Green"]);
    }

    #[test]
    fn test_parse_option_requires_equals() {
        assert!(parse_option("Size").unwrap_err().contains("Name=value1,value2"));
    }

    #[test]
    fn test_parse_option_rejects_duplicates() {
        let err = parse_option("Size=S,M,s").unwrap_err();
        assert_eq!(
            err,
            VariantError::DuplicateValue {
                option: "Size".into(),
                value: "s".into()
            }
            .to_string()
        );
    }

    #[test]
    fn test_parse_option_rejects_blank_value() {
        assert!(parse_option("Size=S,,M").is_err());
    }
}
