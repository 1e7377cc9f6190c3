//! Flat locale dictionaries.
//!
//! Locale files are nested JSON objects. They are flattened into dotted keys
//! (`{"cart": {"title": "Cart"}}` becomes `cart.title`). Parsing streams the
//! document through a serde visitor instead of building a `serde_json::Value`,
//! because a `Value` silently drops repeated object keys and those repeats are
//! exactly what the auditor needs to report.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Value};
use thiserror::Error;

use super::TranslationKey;

/// Errors that can occur when parsing a locale file.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The input is not valid JSON or its root is not an object.
    #[error("invalid locale JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One locale's translations, keyed by dotted path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: BTreeMap<String, String>,
    duplicates: BTreeSet<String>,
}

impl Dictionary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a nested JSON locale document.
    ///
    /// Numbers and booleans become strings, `null` values are skipped and
    /// array elements get their index as a path segment. When a key repeats,
    /// the last value wins and the key is recorded in [`Self::duplicates`].
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not JSON or its root is not an object.
    pub fn parse_json(source: &str) -> Result<Self, DictionaryError> {
        let mut dictionary = Self::new();
        let mut deserializer = serde_json::Deserializer::from_str(source);
        RootSeed {
            out: &mut dictionary,
        }
        .deserialize(&mut deserializer)?;
        deserializer.end()?;
        Ok(dictionary)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// View restricted to keys declared in code.
    #[must_use]
    pub const fn typed(&self) -> TypedDictionary<'_> {
        TypedDictionary(self)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace a value. Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys that appeared more than once in the parsed source.
    #[must_use]
    pub const fn duplicates(&self) -> &BTreeSet<String> {
        &self.duplicates
    }

    /// Rebuild the nested JSON shape for writing back to a locale file.
    ///
    /// When a key is both a leaf and a prefix of other keys (`a` and `a.b`),
    /// the longer key is kept flat at the deepest level that still holds an
    /// object.
    #[must_use]
    pub fn to_nested_json(&self) -> Value {
        let mut root = Map::new();
        for (key, value) in &self.entries {
            insert_nested(&mut root, key, value);
        }
        Value::Object(root)
    }

    fn record(&mut self, key: String, value: String) {
        if self.entries.contains_key(&key) {
            self.duplicates.insert(key.clone());
        }
        self.entries.insert(key, value);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            duplicates: BTreeSet::new(),
        }
    }
}

fn insert_nested(node: &mut Map<String, Value>, key: &str, value: &str) {
    let Some((head, rest)) = key.split_once('.') else {
        node.insert(key.to_owned(), Value::String(value.to_owned()));
        return;
    };

    let child = node
        .entry(head.to_owned())
        .or_insert_with(|| Value::Object(Map::new()));

    match child {
        Value::Object(map) => insert_nested(map, rest, value),
        _ => {
            node.insert(key.to_owned(), Value::String(value.to_owned()));
        }
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}.{segment}")
    }
}

// =============================================================================
// Streaming flattener
// =============================================================================

/// Accepts only an object at the document root.
struct RootSeed<'a> {
    out: &'a mut Dictionary,
}

impl<'de> DeserializeSeed<'de> for RootSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for RootSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object at the root of the locale file")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<(), A::Error> {
        FlattenSeed {
            prefix: String::new(),
            out: self.out,
        }
        .visit_map(map)
    }
}

/// Flattens any JSON value found at `prefix`.
struct FlattenSeed<'a> {
    prefix: String,
    out: &'a mut Dictionary,
}

impl<'de> DeserializeSeed<'de> for FlattenSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for FlattenSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a translation string or a nested object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        while let Some(segment) = map.next_key::<String>()? {
            map.next_value_seed(FlattenSeed {
                prefix: join(&self.prefix, &segment),
                out: &mut *self.out,
            })?;
        }
        Ok(())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        let mut index = 0usize;
        while seq
            .next_element_seed(FlattenSeed {
                prefix: join(&self.prefix, &index.to_string()),
                out: &mut *self.out,
            })?
            .is_some()
        {
            index += 1;
        }
        Ok(())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<(), E> {
        self.out.record(self.prefix, v.to_owned());
        Ok(())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<(), E> {
        self.out.record(self.prefix, v);
        Ok(())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<(), E> {
        self.out.record(self.prefix, v.to_string());
        Ok(())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<(), E> {
        self.out.record(self.prefix, v.to_string());
        Ok(())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<(), E> {
        self.out.record(self.prefix, v.to_string());
        Ok(())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<(), E> {
        self.out.record(self.prefix, v.to_string());
        Ok(())
    }

    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_none<E: de::Error>(self) -> Result<(), E> {
        Ok(())
    }
}

/// A [`Dictionary`] looked up by [`TranslationKey`] instead of raw strings.
#[derive(Debug, Clone, Copy)]
pub struct TypedDictionary<'a>(&'a Dictionary);

impl<'a> TypedDictionary<'a> {
    #[must_use]
    pub fn get(self, key: TranslationKey) -> Option<&'a str> {
        self.0.get(key.as_str())
    }

    /// Declared keys that have no entry.
    #[must_use]
    pub fn missing(self) -> Vec<TranslationKey> {
        TranslationKey::ALL
            .iter()
            .copied()
            .filter(|key| self.get(*key).is_none())
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_typed_view() {
        let dict = Dictionary::parse_json(r#"{"nav": {"home": "Inicio"}}"#).unwrap();
        let typed = dict.typed();
        assert_eq!(typed.get(TranslationKey::NavHome), Some("Inicio"));
        assert_eq!(typed.get(TranslationKey::CartNoticeExpired), None);

        let missing = typed.missing();
        assert!(!missing.contains(&TranslationKey::NavHome));
        assert_eq!(missing.len(), TranslationKey::ALL.len() - 1);
    }

    #[test]
    fn test_parse_flattens_nested_objects() {
        let dict = Dictionary::parse_json(
            r#"{"cart": {"title": "Cart", "notice": {"expired": "Expired"}}, "nav.home": "Home"}"#,
        )
        .unwrap();
        assert_eq!(dict.get("cart.title"), Some("Cart"));
        assert_eq!(dict.get("cart.notice.expired"), Some("Expired"));
        assert_eq!(dict.typed().get(TranslationKey::NavHome), Some("Home"));
        assert_eq!(dict.len(), 3);
        assert!(dict.duplicates().is_empty());
    }

    #[test]
    fn test_parse_records_duplicates() {
        let dict = Dictionary::parse_json(
            r#"{
                "cart": {"title": "Cart", "title": "Basket"},
                "nav": {"home": "Home"},
                "nav.home": "Start"
            }"#,
        )
        .unwrap();
        assert_eq!(dict.get("cart.title"), Some("Basket"));
        assert_eq!(dict.get("nav.home"), Some("Start"));
        assert_eq!(
            dict.duplicates().iter().cloned().collect::<Vec<_>>(),
            vec!["cart.title".to_string(), "nav.home".to_string()]
        );
    }

    #[test]
    fn test_parse_scalars_and_nulls() {
        let dict =
            Dictionary::parse_json(r#"{"a": 3, "b": true, "c": null, "d": ["x", "y"]}"#).unwrap();
        assert_eq!(dict.get("a"), Some("3"));
        assert_eq!(dict.get("b"), Some("true"));
        assert_eq!(dict.get("c"), None);
        assert_eq!(dict.get("d.1"), Some("y"));
    }

    #[test]
    fn test_parse_rejects_non_object_root() {
        assert!(Dictionary::parse_json(r#"["a"]"#).is_err());
        assert!(Dictionary::parse_json(r#""text""#).is_err());
        assert!(Dictionary::parse_json("{").is_err());
        assert!(Dictionary::parse_json(r#"{"a": "b"} trailing"#).is_err());
    }

    #[test]
    fn test_to_nested_json() {
        let dict: Dictionary = [
            ("cart.title", "Cart"),
            ("cart.empty", "Empty"),
            ("nav.home", "Home"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            dict.to_nested_json(),
            json!({"cart": {"title": "Cart", "empty": "Empty"}, "nav": {"home": "Home"}})
        );
    }

    #[test]
    fn test_to_nested_json_leaf_prefix_conflict() {
        let dict: Dictionary = [("a", "leaf"), ("a.b", "child")].into_iter().collect();
        assert_eq!(dict.to_nested_json(), json!({"a": "leaf", "a.b": "child"}));
        let reparsed = Dictionary::parse_json(&dict.to_nested_json().to_string()).unwrap();
        assert_eq!(reparsed, dict);
    }
}
