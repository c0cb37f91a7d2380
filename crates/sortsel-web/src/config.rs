#![forbid(unsafe_code)]

//! Configuration for sortable multiselects.
//!
//! Every field has a default matching the stock widget markup, so
//! `SortselConfig::default()` works without any file.
//!
//! ```toml
//! order_attribute = "data-values-order"
//!
//! [sortable]
//! animation_ms = 200
//! ghost_class = "my-ghost"
//! ```
//!
//! ```rust,ignore
//! let config = SortselConfig::from_toml_file("sortsel.toml")?;
//! let config = SortselConfig::from_json_str(json)?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::selector::Selector;

/// Drag mechanism options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortableConfig {
    /// Selector of draggable children (the chips). See [`Selector`] for the
    /// supported syntax.
    pub draggable: String,
    /// Selector of the fixed child that never moves (the search field).
    pub filter: String,
    /// Selector of a chip's removal control; presses on it are not drags.
    pub close_control: String,
    /// Length of the settle animation after a drop, in milliseconds.
    pub animation_ms: u32,
    /// Class applied to the placeholder while dragging.
    pub ghost_class: String,
    /// Whether the host should auto-scroll the container during a drag.
    pub scroll: bool,
}

impl Default for SortableConfig {
    fn default() -> Self {
        Self {
            draggable: ".search-choice".into(),
            filter: ".search-field".into(),
            close_control: ".search-choice-close".into(),
            animation_ms: 150,
            ghost_class: "chosen-sortable-ghost".into(),
            scroll: false,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortselConfig {
    /// Drag mechanism options.
    pub sortable: SortableConfig,
    /// Attribute on the select element carrying the saved order as JSON.
    pub order_attribute: String,
    /// Selector of the selects the feature applies to. Only multi-value
    /// selects are ever attached, whatever the selector says.
    pub select_selector: String,
}

impl Default for SortselConfig {
    fn default() -> Self {
        Self {
            sortable: SortableConfig::default(),
            order_attribute: "data-values-order".into(),
            select_selector: "select.chosen-select[multiple]".into(),
        }
    }
}

impl SortselConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check that every field is usable.
    ///
    /// Returns a list of problems; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let selectors = [
            ("sortable.draggable", &self.sortable.draggable),
            ("sortable.filter", &self.sortable.filter),
            ("sortable.close_control", &self.sortable.close_control),
            ("select_selector", &self.select_selector),
        ];
        for (name, raw) in selectors {
            if let Err(err) = Selector::parse(raw) {
                errors.push(format!("{name}: {err}"));
            }
        }
        if self.order_attribute.trim().is_empty() {
            errors.push("order_attribute must not be empty".into());
        }
        if self.sortable.draggable == self.sortable.filter {
            errors.push("sortable.draggable and sortable.filter must differ".into());
        }
        if self.sortable.ghost_class.is_empty()
            || self.sortable.ghost_class.contains(char::is_whitespace)
        {
            errors.push(format!(
                "sortable.ghost_class must be a single class name, got {:?}",
                self.sortable.ghost_class
            ));
        }
        errors
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
