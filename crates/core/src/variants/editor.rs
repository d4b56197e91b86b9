//! Index-addressed editing of a generated variant batch.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ProductOption, Variant, VariantError, VariantsUpdate, generate_variants};

/// Outcome of comparing variant stock with the product's stock figure.
///
/// An excess is reported, never enforced: the backend accepts the
/// inconsistency and the merchant decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockCheck {
    /// Variant quantities fit within the product stock.
    Consistent {
        /// Sum of variant quantities.
        variant_total: u64,
    },
    /// Variant quantities add up to more than the product stock.
    ExceedsProductStock {
        /// Sum of variant quantities.
        variant_total: u64,
        /// The product-level stock figure.
        product_stock: u64,
    },
}

impl StockCheck {
    /// Whether the check should be surfaced as a warning.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::ExceedsProductStock { .. })
    }
}

/// The variants of one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantSet {
    variants: Vec<Variant>,
}

impl VariantSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap variants loaded from the backend.
    #[must_use]
    pub const fn from_variants(variants: Vec<Variant>) -> Self {
        Self { variants }
    }

    /// Replace the whole set with a fresh generation.
    ///
    /// Per-variant edits made since the last generation are discarded. On
    /// error the current variants are kept as they are.
    ///
    /// # Errors
    ///
    /// Propagates the validation error from [`generate_variants`].
    pub fn regenerate(
        &mut self,
        options: &[ProductOption],
        base_sku: &str,
        price: Option<Decimal>,
    ) -> Result<usize, VariantError> {
        self.variants = generate_variants(options, base_sku, price)?;
        Ok(self.variants.len())
    }

    /// The variants in generation order.
    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Number of variants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Reprice one variant.
    ///
    /// # Errors
    ///
    /// Fails on a negative price or an unknown index.
    pub fn set_price(&mut self, index: usize, price: Decimal) -> Result<(), VariantError> {
        if price.is_sign_negative() && !price.is_zero() {
            return Err(VariantError::NegativePrice(price));
        }
        self.slot(index)?.price = Some(price);
        Ok(())
    }

    /// Set one variant's stock.
    ///
    /// # Errors
    ///
    /// Fails on an unknown index.
    pub fn set_quantity(&mut self, index: usize, quantity: u32) -> Result<(), VariantError> {
        self.slot(index)?.quantity = quantity;
        Ok(())
    }

    /// Set every variant's stock to the same figure.
    pub fn set_all_quantities(&mut self, quantity: u32) {
        for variant in &mut self.variants {
            variant.quantity = quantity;
        }
    }

    /// Override one variant's SKU.
    ///
    /// # Errors
    ///
    /// Fails on an unknown index.
    pub fn set_sku(&mut self, index: usize, sku: &str) -> Result<(), VariantError> {
        sku.trim().clone_into(&mut self.slot(index)?.sku);
        Ok(())
    }

    /// Set or clear one variant's secondary name.
    ///
    /// # Errors
    ///
    /// Fails on an unknown index.
    pub fn set_secondary_name(
        &mut self,
        index: usize,
        name: Option<&str>,
    ) -> Result<(), VariantError> {
        self.slot(index)?.secondary_name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned);
        Ok(())
    }

    /// Enable or disable one variant.
    ///
    /// # Errors
    ///
    /// Fails on an unknown index.
    pub fn set_active(&mut self, index: usize, active: bool) -> Result<(), VariantError> {
        self.slot(index)?.is_active = active;
        Ok(())
    }

    /// Remove one variant.
    ///
    /// # Errors
    ///
    /// Fails on an unknown index.
    pub fn remove(&mut self, index: usize) -> Result<Variant, VariantError> {
        self.check_index(index)?;
        Ok(self.variants.remove(index))
    }

    /// Sum of all variant quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.variants.iter().map(|v| u64::from(v.quantity)).sum()
    }

    /// Compare variant stock against the product's stock figure.
    #[must_use]
    pub fn stock_check(&self, product_stock: u64) -> StockCheck {
        let variant_total = self.total_quantity();
        if variant_total > product_stock {
            StockCheck::ExceedsProductStock {
                variant_total,
                product_stock,
            }
        } else {
            StockCheck::Consistent { variant_total }
        }
    }

    /// Whether every variant has the same set of attribute names.
    ///
    /// Always true right after generation; can become false for sets loaded
    /// from the backend after the option schema changed.
    #[must_use]
    pub fn has_consistent_attributes(&self) -> bool {
        let mut iter = self.variants.iter();
        let Some(first) = iter.next() else {
            return true;
        };
        iter.all(|v| v.attributes.keys().eq(first.attributes.keys()))
    }

    /// Build the payload replacing the product's variants on the backend.
    #[must_use]
    pub fn to_update(&self, variants_required: bool) -> VariantsUpdate {
        VariantsUpdate {
            variants: self.variants.clone(),
            variants_required,
        }
    }

    fn check_index(&self, index: usize) -> Result<(), VariantError> {
        if index < self.variants.len() {
            Ok(())
        } else {
            Err(VariantError::IndexOutOfRange {
                index,
                len: self.variants.len(),
            })
        }
    }

    fn slot(&mut self, index: usize) -> Result<&mut Variant, VariantError> {
        let len = self.variants.len();
        self.variants
            .get_mut(index)
            .ok_or(VariantError::IndexOutOfRange { index, len })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn size_color() -> Vec<ProductOption> {
        vec![
            ProductOption::with_values("Size", ["S", "M"]).unwrap(),
            ProductOption::with_values("Color", ["Red", "Blue"]).unwrap(),
        ]
    }

    fn generated() -> VariantSet {
        let mut set = VariantSet::new();
        set.regenerate(&size_color(), "SHIRT", Some(Decimal::new(20, 0)))
            .unwrap();
        set
    }

    #[test]
    fn test_index_addressed_edits() {
        let mut set = generated();
        set.set_price(1, Decimal::new(2550, 2)).unwrap();
        set.set_quantity(1, 7).unwrap();
        set.set_sku(1, " CUSTOM-1 ").unwrap();
        set.set_secondary_name(1, Some("صغير / أزرق")).unwrap();
        set.set_active(2, false).unwrap();

        let edited = &set.variants()[1];
        assert_eq!(edited.price, Some(Decimal::new(2550, 2)));
        assert_eq!(edited.quantity, 7);
        assert_eq!(edited.sku, "CUSTOM-1");
        assert_eq!(edited.secondary_name.as_deref(), Some("صغير / أزرق"));
        assert!(!set.variants()[2].is_active);
        assert_eq!(set.variants()[0].price, Some(Decimal::new(20, 0)));
    }

    #[test]
    fn test_out_of_range_edits_fail() {
        let mut set = generated();
        assert_eq!(
            set.set_quantity(4, 1),
            Err(VariantError::IndexOutOfRange { index: 4, len: 4 })
        );
        assert!(set.remove(9).is_err());
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut set = generated();
        assert!(matches!(
            set.set_price(0, Decimal::new(-1, 0)),
            Err(VariantError::NegativePrice(_))
        ));
        assert!(set.set_price(0, Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_remove_variant() {
        let mut set = generated();
        let removed = set.remove(0).unwrap();
        assert_eq!(removed.name, "S / Red");
        assert_eq!(set.variants()[0].name, "S / Blue");
    }

    #[test]
    fn test_regenerate_discards_edits() {
        let mut set = generated();
        set.set_quantity(0, 9).unwrap();

        let mut options = size_color();
        options[1].add_value("Green").unwrap();
        assert_eq!(set.regenerate(&options, "SHIRT", None).unwrap(), 6);
        assert_eq!(set.total_quantity(), 0);
    }

    #[test]
    fn test_failed_regenerate_keeps_previous_variants() {
        let mut set = generated();
        set.set_quantity(3, 5).unwrap();
        let before = set.clone();

        let mut options = size_color();
        options.push(ProductOption::new("Material").unwrap());
        assert!(set.regenerate(&options, "SHIRT", None).is_err());
        assert_eq!(set, before);
    }

    #[test]
    fn test_removing_option_does_not_touch_variants() {
        let mut options = crate::variants::OptionSet::new();
        for option in size_color() {
            options.add_option(option).unwrap();
        }
        let mut set = VariantSet::new();
        set.regenerate(options.options(), "", None).unwrap();

        options.remove_option(1).unwrap();
        assert_eq!(set.len(), 4);
        assert!(set.variants().iter().all(|v| v.attributes.len() == 2));
    }

    #[test]
    fn test_stock_excess_is_only_a_warning() {
        let mut set = generated();
        set.set_all_quantities(5);

        let check = set.stock_check(12);
        assert_eq!(
            check,
            StockCheck::ExceedsProductStock {
                variant_total: 20,
                product_stock: 12
            }
        );
        assert!(check.is_warning());

        let update = set.to_update(true);
        assert_eq!(update.variants.len(), 4);
        assert!(update.variants_required);
    }

    #[test]
    fn test_stock_within_limit() {
        let mut set = generated();
        set.set_quantity(0, 3).unwrap();
        let check = set.stock_check(3);
        assert_eq!(check, StockCheck::Consistent { variant_total: 3 });
        assert!(!check.is_warning());
    }

    #[test]
    fn test_attribute_consistency() {
        let mut set = generated();
        assert!(set.has_consistent_attributes());

        let mut odd = set.variants()[0].clone();
        odd.attributes.remove("Color");
        let mut variants = set.variants().to_vec();
        variants.push(odd);
        set = VariantSet::from_variants(variants);
        assert!(!set.has_consistent_attributes());
    }
}
