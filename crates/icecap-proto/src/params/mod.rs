//! Message parameters.
//!
//! Parameters are `key=value` pairs or bare `key` flags. They are kept in a
//! sorted map so serialisation is deterministic; the protocol attaches no
//! meaning to parameter order.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Serialize, Serializer};

use crate::error::ProtocolError;

/// Value of a single parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamValue {
    /// A bare key with no `=`, meaning "true".
    Flag,
    /// A `key=value` pair. The value may be empty.
    Text(String),
}

impl ParamValue {
    /// Returns the text value, or `None` for a flag.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Flag => None,
            Self::Text(text) => Some(text.as_str()),
        }
    }

    /// Returns `true` for a bare flag.
    #[must_use]
    pub const fn is_flag(&self) -> bool {
        matches!(self, Self::Flag)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Flag => serializer.serialize_bool(true),
            Self::Text(text) => serializer.serialize_str(text),
        }
    }
}

/// Ordered parameter map attached to every message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params {
    entries: BTreeMap<String, ParamValue>,
}

impl Params {
    /// Creates an empty parameter map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Builder-style insert of a `key=value` parameter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert of a bare flag.
    #[must_use]
    pub fn with_flag(mut self, key: impl Into<String>) -> Self {
        self.insert(key, ParamValue::Flag);
        self
    }

    /// Inserts a parameter, returning the previous value for the key.
    ///
    /// A bare flag with an empty key has no wire form (it would serialise as
    /// an empty field, which parsing skips), so it is not stored and `None`
    /// is returned.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        let name = key.into();
        let entry = value.into();
        if !is_representable(&name, &entry) {
            return None;
        }
        self.entries.insert(name, entry)
    }

    /// Removes a parameter, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.remove(key)
    }

    /// Looks up a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Returns the text value of a parameter, if present and not a flag.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(ParamValue::as_text)
    }

    /// Returns `true` when the key is present as a bare flag.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(ParamValue::is_flag)
    }

    /// Returns `true` when the key is present, whatever its value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the text value of a parameter the caller cannot do without.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MissingParameter`] when the key is absent or
    /// is a bare flag.
    pub fn require(&self, key: &str) -> Result<&str, ProtocolError> {
        self.text(key)
            .ok_or_else(|| ProtocolError::missing_parameter(key))
    }

    /// Returns a copy without the given keys.
    ///
    /// Handlers use this to strip identity keys (`network`, `mypresence`,
    /// ...) before storing the remainder as an entity's info map.
    #[must_use]
    pub fn without(&self, keys: &[&str]) -> Self {
        self.entries
            .iter()
            .filter(|(key, _)| !keys.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Copies every entry of `other` into this map, overwriting existing keys.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Iterates over the parameters in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.entries.iter()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ParamValue)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .filter(|(key, value)| is_representable(key, value))
                .collect(),
        }
    }
}

fn is_representable(key: &str, value: &ParamValue) -> bool {
    !(key.is_empty() && value.is_flag())
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests;
