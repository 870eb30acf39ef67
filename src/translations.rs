//! Translation-completeness audit over the block tree.
//!
//! Localizable fields live on blocks under language-suffixed keys
//! (`"{field}-{lang}"`). Which fields a block type carries is declared in a
//! [`TranslationRegistry`] populated at startup by the block-registration
//! side of the host.

use std::collections::HashMap;

use serde_json::Value;

use crate::page::BlockRecord;

/// Type tag of composite partial blocks, which are never audited.
pub const PARTIAL_BLOCK_TYPE: &str = "PartialBlock";

/// Capability table mapping a block type tag to its localizable field names.
///
/// Lookup is total: an unregistered type yields an empty field list, so its
/// blocks are vacuously fully translated.
#[derive(Debug, Clone, Default)]
pub struct TranslationRegistry {
    fields: HashMap<String, Vec<String>>,
}

impl TranslationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the localizable fields of a block type. Replaces any earlier
    /// declaration for the same type.
    pub fn register<I, F>(&mut self, block_type: impl Into<String>, fields: I)
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.fields.insert(
            block_type.into(),
            fields.into_iter().map(Into::into).collect(),
        );
    }

    /// The localizable fields declared for `block_type`, empty when unknown.
    pub fn localizable_fields(&self, block_type: &str) -> &[String] {
        self.fields.get(block_type).map_or(&[], Vec::as_slice)
    }
}

/// Whether any audited block lacks a translation for `lang`.
///
/// Returns `false` immediately for an empty language. Blocks without a type
/// tag and [`PartialBlock`](PARTIAL_BLOCK_TYPE) composites are skipped. A
/// field is missing when the `"{field}-{lang}"` key is absent or holds an
/// empty value. Short-circuits on the first hit.
pub fn has_missing_translations(
    registry: &TranslationRegistry,
    blocks: &[BlockRecord],
    lang: &str,
) -> bool {
    if lang.is_empty() {
        return false;
    }

    blocks.iter().any(|block| {
        let Some(block_type) = block.block_type() else {
            return false;
        };
        if block_type == PARTIAL_BLOCK_TYPE {
            return false;
        }

        registry
            .localizable_fields(block_type)
            .iter()
            .any(|field| {
                let key = format!("{field}-{lang}");
                block.field(&key).is_none_or(is_empty_value)
            })
    })
}

/// Null, empty strings and empty containers all count as "no translation".
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TranslationRegistry {
        let mut registry = TranslationRegistry::new();
        registry.register("Heading", ["title"]);
        registry.register("Paragraph", ["content", "caption"]);
        registry
    }

    #[test]
    fn empty_block_list_is_complete() {
        assert!(!has_missing_translations(&registry(), &[], "fr"));
    }

    #[test]
    fn empty_language_is_always_complete() {
        let blocks = vec![BlockRecord::new("Heading", "h1")];
        assert!(!has_missing_translations(&registry(), &blocks, ""));
    }

    #[test]
    fn empty_translated_field_is_missing() {
        let blocks = vec![BlockRecord::new("Heading", "h1").with_field("title-fr", "")];
        assert!(has_missing_translations(&registry(), &blocks, "fr"));
    }

    #[test]
    fn absent_translated_field_is_missing() {
        let blocks = vec![BlockRecord::new("Heading", "h1").with_field("title", "Hello")];
        assert!(has_missing_translations(&registry(), &blocks, "fr"));
    }

    #[test]
    fn non_empty_translated_field_is_complete() {
        let blocks = vec![BlockRecord::new("Heading", "h1").with_field("title-fr", "Bonjour")];
        assert!(!has_missing_translations(&registry(), &blocks, "fr"));
    }

    #[test]
    fn null_translated_field_is_missing() {
        let blocks =
            vec![BlockRecord::new("Heading", "h1").with_field("title-fr", Value::Null)];
        assert!(has_missing_translations(&registry(), &blocks, "fr"));
    }

    #[test]
    fn any_missing_field_flags_the_block() {
        let blocks = vec![
            BlockRecord::new("Paragraph", "p1")
                .with_field("content-de", "Hallo")
                .with_field("caption-de", ""),
        ];
        assert!(has_missing_translations(&registry(), &blocks, "de"));
    }

    #[test]
    fn unknown_block_type_is_vacuously_complete() {
        let blocks = vec![BlockRecord::new("CustomWidget", "w1")];
        assert!(!has_missing_translations(&registry(), &blocks, "fr"));
    }

    #[test]
    fn partial_blocks_are_skipped() {
        let mut registry = registry();
        registry.register(PARTIAL_BLOCK_TYPE, ["title"]);
        let blocks = vec![BlockRecord::new(PARTIAL_BLOCK_TYPE, "pb1")];
        assert!(!has_missing_translations(&registry, &blocks, "fr"));
    }

    #[test]
    fn untyped_blocks_are_skipped() {
        let blocks = vec![BlockRecord::default()];
        assert!(!has_missing_translations(&registry(), &blocks, "fr"));
    }

    #[test]
    fn first_incomplete_block_among_many_is_enough() {
        let blocks = vec![
            BlockRecord::new("Heading", "h1").with_field("title-fr", "Bonjour"),
            BlockRecord::new("Paragraph", "p1").with_field("content-fr", ""),
        ];
        assert!(has_missing_translations(&registry(), &blocks, "fr"));
    }

    #[test]
    fn registry_lookup_is_total() {
        let registry = registry();
        assert_eq!(registry.localizable_fields("Heading"), ["title"]);
        assert!(registry.localizable_fields("NotRegistered").is_empty());
    }
}
