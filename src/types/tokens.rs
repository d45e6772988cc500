//! Semantic Token Map
//!
//! A flat, read-only mapping from vocabulary token names to CSS values.
//! Entries can only be added through the crate (the mapper) or through the
//! validating [`TokenMap::from_entries`] constructor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::{HarvestError, Result};
use crate::tokens::vocabulary;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTokenMap")]
pub struct TokenMap {
    prefix: String,
    entries: BTreeMap<String, String>,
}

/// Unchecked wire form; deserialized maps go through `from_entries`
#[derive(Deserialize)]
struct RawTokenMap {
    #[serde(default)]
    prefix: String,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl TryFrom<RawTokenMap> for TokenMap {
    type Error = HarvestError;

    fn try_from(raw: RawTokenMap) -> Result<Self> {
        Self::from_entries(raw.prefix, raw.entries)
    }
}

impl TokenMap {
    pub(crate) fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Build a map from `(name, value)` pairs, rejecting unknown names
    pub fn from_entries<I, K, V>(prefix: impl Into<String>, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = Self::new(prefix);
        for (name, value) in entries {
            map.insert(name.as_ref(), value)?;
        }
        Ok(map)
    }

    pub(crate) fn insert(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        if !vocabulary::is_known(name) {
            return Err(HarvestError::UnknownToken(name.to_string()));
        }
        self.entries.insert(name.to_string(), value.into());
        Ok(())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `--{prefix}-{name}`
    pub fn css_property(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            format!("--{}", name)
        } else {
            format!("--{}-{}", self.prefix, name)
        }
    }

    /// `var(--{prefix}-{name})`
    pub fn css_var(&self, name: &str) -> String {
        format!("var({})", self.css_property(name))
    }
}
