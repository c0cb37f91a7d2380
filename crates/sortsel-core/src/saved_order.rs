#![forbid(unsafe_code)]

//! Persisted order, as read from the select element's order attribute.

use crate::error::{Result, SortselError};
use crate::value::Value;

/// An externally supplied ordered list of value identifiers.
///
/// Entries that were not strings in the source document are kept as `None`
/// so that they occupy a slot but never match a chip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedOrder {
    entries: Vec<Option<Value>>,
}

impl SavedOrder {
    /// Build from plain values.
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            entries: values.into_iter().map(|v| Some(v.into())).collect(),
        }
    }

    /// Parse the JSON text of an order attribute, e.g. `["b","a"]`.
    ///
    /// # Errors
    ///
    /// Malformed JSON or a top-level value that is not an array.
    pub fn parse_attribute(raw: &str) -> Result<Self> {
        let parsed: serde_json::Value = serde_json::from_str(raw)?;
        let serde_json::Value::Array(items) = parsed else {
            return Err(SortselError::SavedOrderNotList);
        };
        let entries = items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => Some(Value::from(s)),
                _ => None,
            })
            .collect();
        Ok(Self { entries })
    }

    /// All entries, including non-string placeholders.
    pub fn iter(&self) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.entries.iter().map(Option::as_ref)
    }

    /// Only the usable values, in order.
    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.entries.iter().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Into<Value>> FromIterator<V> for SavedOrder {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}
