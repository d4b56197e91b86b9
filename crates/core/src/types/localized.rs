//! Per-language text fields.
//!
//! The backend stores translated fields as flat keys on the owning object
//! (`name_en`, `description_ar`, ...). In memory they live in a two-key table
//! indexed by [`FieldKind`] and [`LanguageCode`], and are flattened back into
//! `{kind}_{lang}` keys on the wire.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which translatable field a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKind {
    /// Display name of the entity.
    Name,
    /// Long-form description.
    Description,
}

impl FieldKind {
    /// Prefix used in wire keys.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Self::Name),
            "description" => Some(Self::Description),
            _ => None,
        }
    }
}

/// A lowercase ISO 639-1 language code such as `en` or `ar`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse a two-letter language code, normalizing to lowercase.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        (code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()))
            .then(|| Self(code.to_ascii_lowercase()))
    }

    /// English.
    #[must_use]
    pub fn english() -> Self {
        Self("en".to_owned())
    }

    /// Arabic.
    #[must_use]
    pub fn arabic() -> Self {
        Self("ar".to_owned())
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Translated text fields keyed by `(FieldKind, LanguageCode)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<String, String>",
    from = "BTreeMap<String, serde_json::Value>"
)]
pub struct LocalizedText {
    entries: BTreeMap<(FieldKind, LanguageCode), String>,
}

impl LocalizedText {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, kind: FieldKind, language: LanguageCode, value: &str) -> Self {
        self.set(kind, language, value);
        self
    }

    /// Set a field. A blank value removes the entry.
    pub fn set(&mut self, kind: FieldKind, language: LanguageCode, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.entries.remove(&(kind, language));
        } else {
            self.entries.insert((kind, language), value.to_owned());
        }
    }

    /// Look up a field in one language.
    #[must_use]
    pub fn get(&self, kind: FieldKind, language: &LanguageCode) -> Option<&str> {
        self.entries
            .get(&(kind, language.clone()))
            .map(String::as_str)
    }

    /// Look up a field, preferring `language` and falling back to any
    /// other language that has it.
    #[must_use]
    pub fn resolve(&self, kind: FieldKind, language: &LanguageCode) -> Option<&str> {
        self.get(kind, language).or_else(|| {
            self.entries
                .iter()
                .find(|((k, _), _)| *k == kind)
                .map(|(_, value)| value.as_str())
        })
    }

    /// Languages that have at least one field set.
    #[must_use]
    pub fn languages(&self) -> Vec<&LanguageCode> {
        let mut languages: Vec<&LanguageCode> = self.entries.keys().map(|(_, l)| l).collect();
        languages.sort();
        languages.dedup();
        languages
    }

    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<LocalizedText> for BTreeMap<String, String> {
    fn from(text: LocalizedText) -> Self {
        text.entries
            .into_iter()
            .map(|((kind, language), value)| (format!("{}_{language}", kind.as_str()), value))
            .collect()
    }
}

impl From<BTreeMap<String, serde_json::Value>> for LocalizedText {
    fn from(fields: BTreeMap<String, serde_json::Value>) -> Self {
        let entries = fields
            .into_iter()
            .filter_map(|(key, value)| {
                let (kind, language) = key.rsplit_once('_')?;
                let kind = FieldKind::parse(kind)?;
                let language = LanguageCode::parse(language)?;
                let value = value.as_str()?.trim();
                (!value.is_empty()).then(|| ((kind, language), value.to_owned()))
            })
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> LocalizedText {
        LocalizedText::new()
            .with(FieldKind::Name, LanguageCode::english(), "Linen Shirt")
            .with(FieldKind::Name, LanguageCode::arabic(), "قميص كتان")
            .with(FieldKind::Description, LanguageCode::english(), "Breathable")
    }

    #[test]
    fn test_wire_keys_are_kind_underscore_language() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["name_en"], "Linen Shirt");
        assert_eq!(json["name_ar"], "قميص كتان");
        assert_eq!(json["description_en"], "Breathable");
        assert!(json.get("description_ar").is_none());
    }

    #[test]
    fn test_reading_ignores_unrelated_keys() {
        let text: LocalizedText = serde_json::from_value(serde_json::json!({
            "name_en": "Mug",
            "price": 12.5,
            "created_at": "2024-01-01",
            "description_xx1": "bad code",
            "name_fr": 7,
        }))
        .unwrap();

        assert_eq!(text.get(FieldKind::Name, &LanguageCode::english()), Some("Mug"));
        assert_eq!(text.languages().len(), 1);
    }

    #[test]
    fn test_blank_value_removes_entry() {
        let mut text = sample();
        text.set(FieldKind::Name, LanguageCode::arabic(), "   ");
        assert!(text.get(FieldKind::Name, &LanguageCode::arabic()).is_none());
    }

    #[test]
    fn test_resolve_falls_back_to_other_language() {
        let text = sample();
        assert_eq!(
            text.resolve(FieldKind::Description, &LanguageCode::arabic()),
            Some("Breathable")
        );
    }

    #[test]
    fn test_language_code_parse() {
        assert_eq!(LanguageCode::parse("EN").unwrap().as_str(), "en");
        assert!(LanguageCode::parse("eng").is_none());
        assert!(LanguageCode::parse("e1").is_none());
    }
}
