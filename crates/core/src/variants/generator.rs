//! Cartesian variant generation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::{MAX_OPTIONS, NAME_SEPARATOR, ProductOption, Variant, VariantError};

/// Every combination of one value per option, first option varying slowest.
///
/// Returns an empty list when `options` is empty.
#[must_use]
pub fn combinations(options: &[ProductOption]) -> Vec<Vec<&str>> {
    let Some((first, rest)) = options.split_first() else {
        return Vec::new();
    };

    let mut combos: Vec<Vec<&str>> = first.values().iter().map(|v| vec![v.as_str()]).collect();
    for option in rest {
        combos = combos
            .iter()
            .flat_map(|prefix| {
                option.values().iter().map(move |value| {
                    let mut combo = Vec::with_capacity(prefix.len() + 1);
                    combo.extend_from_slice(prefix);
                    combo.push(value.as_str());
                    combo
                })
            })
            .collect();
    }
    combos
}

/// Derive a variant SKU from the product's base SKU.
///
/// Each value is uppercased and stripped of everything outside `[A-Z0-9]`.
/// A blank base SKU yields an empty SKU.
///
/// ```
/// use merchant_admin_core::derive_sku;
///
/// assert_eq!(derive_sku("SHIRT", &["S", "Red"]), "SHIRT-S-RED");
/// assert_eq!(derive_sku("TEE", &["X-Large", "Navy blue"]), "TEE-XLARGE-NAVYBLUE");
/// assert_eq!(derive_sku("", &["S"]), "");
/// ```
#[must_use]
pub fn derive_sku(base_sku: &str, values: &[&str]) -> String {
    let base_sku = base_sku.trim();
    if base_sku.is_empty() {
        return String::new();
    }

    let mut sku = base_sku.to_owned();
    for value in values {
        sku.push('-');
        sku.extend(
            value
                .to_uppercase()
                .chars()
                .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
        );
    }
    sku
}

/// Expand `options` into one [`Variant`] per combination.
///
/// Each variant inherits `price`, starts with zero quantity and is active.
///
/// # Errors
///
/// Rejects the whole request, producing nothing, when there are no options,
/// more than [`MAX_OPTIONS`], an option with a blank name or no values, a
/// blank or duplicate value, or two options with the same name.
pub fn generate_variants(
    options: &[ProductOption],
    base_sku: &str,
    price: Option<Decimal>,
) -> Result<Vec<Variant>, VariantError> {
    validate_options(options)?;

    let variants = combinations(options)
        .into_iter()
        .map(|combo| {
            let attributes: BTreeMap<String, String> = options
                .iter()
                .zip(&combo)
                .map(|(option, value)| (option.name().to_owned(), (*value).to_owned()))
                .collect();

            Variant {
                id: None,
                name: combo.join(NAME_SEPARATOR),
                secondary_name: None,
                sku: derive_sku(base_sku, &combo),
                price,
                quantity: 0,
                attributes,
                is_active: true,
            }
        })
        .collect();

    Ok(variants)
}

fn validate_options(options: &[ProductOption]) -> Result<(), VariantError> {
    if options.is_empty() {
        return Err(VariantError::NoOptions);
    }
    if options.len() > MAX_OPTIONS {
        return Err(VariantError::TooManyOptions {
            count: options.len(),
            max: MAX_OPTIONS,
        });
    }

    for (i, option) in options.iter().enumerate() {
        option.validate()?;
        let name = option.name().trim().to_lowercase();
        if options
            .iter()
            .take(i)
            .any(|earlier| earlier.name().trim().to_lowercase() == name)
        {
            return Err(VariantError::DuplicateOptionName(option.name().to_owned()));
        }
    }
    Ok(())
}
