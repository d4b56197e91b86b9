//! Option editing.

use serde::{Deserialize, Serialize};

use super::{MAX_OPTIONS, VariantError};

/// A named axis of variation with an ordered list of unique values.
///
/// Values are compared case-insensitively after trimming, since `red` and
/// `Red` would derive the same SKU segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    name: String,
    #[serde(default)]
    values: Vec<String>,
}

impl ProductOption {
    /// Create an option with no values yet.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::EmptyOptionName`] if `name` is blank.
    pub fn new(name: &str) -> Result<Self, VariantError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VariantError::EmptyOptionName);
        }
        Ok(Self {
            name: name.to_owned(),
            values: Vec::new(),
        })
    }

    /// Create an option and add each value in order.
    ///
    /// # Errors
    ///
    /// Fails on a blank name or on the first blank or duplicate value.
    pub fn with_values<I, S>(name: &str, values: I) -> Result<Self, VariantError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut option = Self::new(name)?;
        for value in values {
            option.add_value(value.as_ref())?;
        }
        Ok(option)
    }

    /// The option name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The values in insertion order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Rename the option.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::EmptyOptionName`] if `name` is blank.
    pub fn rename(&mut self, name: &str) -> Result<(), VariantError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VariantError::EmptyOptionName);
        }
        name.clone_into(&mut self.name);
        Ok(())
    }

    /// Whether `value` is already present.
    #[must_use]
    pub fn contains_value(&self, value: &str) -> bool {
        let needle = normalize(value);
        self.values.iter().any(|v| normalize(v) == needle)
    }

    /// Append a value.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::EmptyValue`] for a blank value and
    /// [`VariantError::DuplicateValue`] if it is already present; the option
    /// is left unchanged in both cases.
    pub fn add_value(&mut self, value: &str) -> Result<(), VariantError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(VariantError::EmptyValue(self.name.clone()));
        }
        if self.contains_value(value) {
            return Err(VariantError::DuplicateValue {
                option: self.name.clone(),
                value: value.to_owned(),
            });
        }
        self.values.push(value.to_owned());
        Ok(())
    }

    /// Remove the value at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::IndexOutOfRange`] if there is no such value.
    pub fn remove_value(&mut self, index: usize) -> Result<String, VariantError> {
        if index >= self.values.len() {
            return Err(VariantError::IndexOutOfRange {
                index,
                len: self.values.len(),
            });
        }
        Ok(self.values.remove(index))
    }

    /// Check the invariants that construction enforces. Needed for options
    /// that arrived through deserialization.
    pub(crate) fn validate(&self) -> Result<(), VariantError> {
        if self.name.trim().is_empty() {
            return Err(VariantError::EmptyOptionName);
        }
        if self.values.is_empty() {
            return Err(VariantError::NoValues(self.name.clone()));
        }
        for (i, value) in self.values.iter().enumerate() {
            if value.trim().is_empty() {
                return Err(VariantError::EmptyValue(self.name.clone()));
            }
            let needle = normalize(value);
            if self.values.iter().take(i).any(|v| normalize(v) == needle) {
                return Err(VariantError::DuplicateValue {
                    option: self.name.clone(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// The ordered options of one product, capped at [`MAX_OPTIONS`].
///
/// Editing options never touches variants that were already generated; only
/// a fresh generation reconciles them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet {
    options: Vec<ProductOption>,
}

impl OptionSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The options in order.
    #[must_use]
    pub fn options(&self) -> &[ProductOption] {
        &self.options
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Append an option.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::TooManyOptions`] when the set is full and
    /// [`VariantError::DuplicateOptionName`] if the name is taken.
    pub fn add_option(&mut self, option: ProductOption) -> Result<(), VariantError> {
        if self.options.len() >= MAX_OPTIONS {
            return Err(VariantError::TooManyOptions {
                count: self.options.len() + 1,
                max: MAX_OPTIONS,
            });
        }
        let name = normalize(option.name());
        if self.options.iter().any(|o| normalize(o.name()) == name) {
            return Err(VariantError::DuplicateOptionName(option.name().to_owned()));
        }
        self.options.push(option);
        Ok(())
    }

    /// Remove the option at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::IndexOutOfRange`] if there is no such option.
    pub fn remove_option(&mut self, index: usize) -> Result<ProductOption, VariantError> {
        if index >= self.options.len() {
            return Err(VariantError::IndexOutOfRange {
                index,
                len: self.options.len(),
            });
        }
        Ok(self.options.remove(index))
    }

    /// Mutable access to the option at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::IndexOutOfRange`] if there is no such option.
    pub fn option_mut(&mut self, index: usize) -> Result<&mut ProductOption, VariantError> {
        let len = self.options.len();
        self.options
            .get_mut(index)
            .ok_or(VariantError::IndexOutOfRange { index, len })
    }
}
