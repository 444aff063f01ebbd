//! Extractor configuration: option values, defaults and the merge rule.
//!
//! A JSON extractor is configured by a small set of named options. The host
//! supplies a (possibly partial) configuration; [`ExtractorConfiguration::merge`]
//! layers it over [`ExtractorConfiguration::json_defaults`] so every known
//! option always has a value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Option names and defaults
// ---------------------------------------------------------------------------

pub const FLATTEN: &str = "flatten";
pub const LIST_SEPARATOR: &str = "list_separator";
pub const KEY_SEPARATOR: &str = "key_separator";
pub const KV_SEPARATOR: &str = "kv_separator";

pub const DEFAULT_LIST_SEPARATOR: &str = ", ";
pub const DEFAULT_KEY_SEPARATOR: &str = "_";
pub const DEFAULT_KV_SEPARATOR: &str = "=";

// ---------------------------------------------------------------------------
// ConfigValue
// ---------------------------------------------------------------------------

/// A single option value. Extractor options are either flags or strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Text(String),
}

impl ConfigValue {
    /// Boolean view of the value. The text `"true"` counts as set so that
    /// configurations round-tripped through string-only storage still work.
    pub fn as_bool(&self) -> bool {
        match self {
            ConfigValue::Bool(b) => *b,
            ConfigValue::Text(s) => s == "true",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            ConfigValue::Bool(_) => None,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

// ---------------------------------------------------------------------------
// InputValue
// ---------------------------------------------------------------------------

/// Raw value read from a form input, tagged with the input's semantic type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputValue {
    /// A checkbox; carries its checked state.
    Checkbox(bool),
    /// Any text-like input; carries the value exactly as typed.
    Text(String),
}

impl InputValue {
    /// Coerce the raw input into the value stored in the configuration.
    pub fn coerce(self) -> ConfigValue {
        match self {
            InputValue::Checkbox(checked) => ConfigValue::Bool(checked),
            InputValue::Text(text) => ConfigValue::Text(text),
        }
    }
}

// ---------------------------------------------------------------------------
// ExtractorConfiguration
// ---------------------------------------------------------------------------

/// Mapping from option name to value.
///
/// JSON `null` entries are dropped on deserialization, so an explicit null
/// behaves exactly like an absent key during [`merge`](Self::merge).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractorConfiguration {
    #[serde(deserialize_with = "deserialize_skipping_nulls")]
    values: BTreeMap<String, ConfigValue>,
}

fn deserialize_skipping_nulls<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, ConfigValue>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<ConfigValue>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect())
}

impl ExtractorConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for the JSON extractor. `flatten` deliberately has none.
    pub fn json_defaults() -> Self {
        Self::new()
            .with(LIST_SEPARATOR, DEFAULT_LIST_SEPARATOR)
            .with(KEY_SEPARATOR, DEFAULT_KEY_SEPARATOR)
            .with(KV_SEPARATOR, DEFAULT_KV_SEPARATOR)
    }

    /// Layer `supplied` over `defaults`.
    ///
    /// Every key of `defaults` is present in the result, taking the supplied
    /// value when one exists. Keys only known to `supplied` pass through
    /// unchanged. `None` behaves like an empty configuration.
    pub fn merge(defaults: &Self, supplied: Option<&Self>) -> Self {
        let mut merged = defaults.clone();
        if let Some(supplied) = supplied {
            for (key, value) in &supplied.values {
                merged.values.insert(key.clone(), value.clone());
            }
        }
        merged
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: ConfigValue) -> Option<ConfigValue> {
        self.values.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // -- typed accessors ----------------------------------------------------

    /// `flatten`, treating an absent option as `false`.
    pub fn flatten(&self) -> bool {
        self.get(FLATTEN).is_some_and(ConfigValue::as_bool)
    }

    pub fn list_separator(&self) -> &str {
        self.text_or(LIST_SEPARATOR, DEFAULT_LIST_SEPARATOR)
    }

    pub fn key_separator(&self) -> &str {
        self.text_or(KEY_SEPARATOR, DEFAULT_KEY_SEPARATOR)
    }

    pub fn kv_separator(&self) -> &str {
        self.text_or(KV_SEPARATOR, DEFAULT_KV_SEPARATOR)
    }

    fn text_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get(key).and_then(ConfigValue::as_str).unwrap_or(fallback)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
