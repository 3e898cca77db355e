//! Editor configuration bound from the host
//!
//! Every value the host provides may be missing entirely (the host has no
//! such attribute), present but empty, or set. [`Bound`] keeps those three
//! states apart so "unavailable" is never confused with `false` or zero.
//!
//! # Example
//!
//! ```rust
//! use gridspan::{EditorConfig, Feature};
//!
//! let config: EditorConfig =
//!     serde_json::from_str(r#"{"rowCount": 4, "enableBlanking": false}"#).unwrap();
//!
//! assert_eq!(config.desired_dimensions().unwrap(), (4, 10));
//! assert!(!config.is_enabled(Feature::Blanking));
//! assert!(config.is_enabled(Feature::Merging));
//! ```

use std::fmt;

use gridspan_core::parse_dimension;
use serde::{Deserialize, Deserializer};

use crate::error::Result;

/// Rows in a grid created without a bound row count
pub const DEFAULT_ROWS: usize = 10;

/// Columns in a grid created without a bound column count
pub const DEFAULT_COLUMNS: usize = 10;

/// A value bound from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound<T> {
    /// The host does not provide this value at all
    Unavailable,
    /// The host provides the value but it is currently empty
    Empty,
    /// The host provides a value
    Value(T),
}

impl<T> Default for Bound<T> {
    fn default() -> Self {
        Bound::Unavailable
    }
}

impl<T> Bound<T> {
    /// The bound value, if set
    pub fn value(&self) -> Option<&T> {
        match self {
            Bound::Value(v) => Some(v),
            Bound::Unavailable | Bound::Empty => None,
        }
    }

    /// Whether the host provides this value at all
    pub fn is_available(&self) -> bool {
        !matches!(self, Bound::Unavailable)
    }
}

impl<T: Clone> Bound<T> {
    /// The bound value, or `default` when unavailable or empty
    pub fn resolve(&self, default: T) -> T {
        self.value().cloned().unwrap_or(default)
    }
}

impl<T> From<T> for Bound<T> {
    fn from(value: T) -> Self {
        Bound::Value(value)
    }
}

// A missing field becomes `Unavailable` through `#[serde(default)]`; this
// only sees fields that are present.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Bound<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Bound::Value(value),
            None => Bound::Empty,
        })
    }
}

/// Raw dimension text as the host provides it
///
/// Hosts bind counts as strings or numbers; both are kept as text and only
/// parsed when a grid is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionInput(pub String);

impl DimensionInput {
    /// Parse into a valid row or column count
    pub fn parse(&self) -> Result<usize> {
        Ok(parse_dimension(&self.0)?)
    }
}

impl From<&str> for DimensionInput {
    fn from(value: &str) -> Self {
        DimensionInput(value.to_string())
    }
}

impl From<usize> for DimensionInput {
    fn from(value: usize) -> Self {
        DimensionInput(value.to_string())
    }
}

impl<'de> Deserialize<'de> for DimensionInput {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Integer(i64),
            Float(f64),
        }

        Ok(DimensionInput(match Repr::deserialize(deserializer)? {
            Repr::Text(text) => text,
            Repr::Integer(n) => n.to_string(),
            Repr::Float(f) => f.to_string(),
        }))
    }
}

/// Features the host can switch on or off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Merge and unmerge
    Merging,
    /// Blank and unblank
    Blanking,
    /// Editing sequence numbers, including autofill
    Editing,
    /// The blocked-flag checkbox
    Checkbox,
    /// Pushing every committed change to the store immediately
    AutoSave,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::Merging => "merging",
            Feature::Blanking => "blanking",
            Feature::Editing => "editing",
            Feature::Checkbox => "checkbox",
            Feature::AutoSave => "auto-save",
        };
        write!(f, "{}", name)
    }
}

/// Values bound from the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Desired row count
    pub row_count: Bound<DimensionInput>,
    /// Desired column count
    pub column_count: Bound<DimensionInput>,
    pub enable_merging: Bound<bool>,
    pub enable_blanking: Bound<bool>,
    pub enable_editing: Bound<bool>,
    pub enable_checkbox: Bound<bool>,
    pub auto_save_enabled: Bound<bool>,
}

impl EditorConfig {
    /// Whether a feature is on, falling back to its default when the flag
    /// is unavailable or empty
    ///
    /// Everything defaults to on except the checkbox.
    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::Merging => self.enable_merging.resolve(true),
            Feature::Blanking => self.enable_blanking.resolve(true),
            Feature::Editing => self.enable_editing.resolve(true),
            Feature::Checkbox => self.enable_checkbox.resolve(false),
            Feature::AutoSave => self.auto_save_enabled.resolve(true),
        }
    }

    /// Selection is only useful when something can act on it
    pub fn selection_enabled(&self) -> bool {
        self.is_enabled(Feature::Merging) || self.is_enabled(Feature::Blanking)
    }

    /// Desired `(rows, columns)`, defaulting counts the host does not bind
    pub fn desired_dimensions(&self) -> Result<(usize, usize)> {
        let rows = match self.row_count.value() {
            Some(input) => input.parse()?,
            None => DEFAULT_ROWS,
        };
        let columns = match self.column_count.value() {
            Some(input) => input.parse()?,
            None => DEFAULT_COLUMNS,
        };
        Ok((rows, columns))
    }

    /// Builder-style flag setter
    pub fn with_feature(mut self, feature: Feature, enabled: bool) -> Self {
        let slot = match feature {
            Feature::Merging => &mut self.enable_merging,
            Feature::Blanking => &mut self.enable_blanking,
            Feature::Editing => &mut self.enable_editing,
            Feature::Checkbox => &mut self.enable_checkbox,
            Feature::AutoSave => &mut self.auto_save_enabled,
        };
        *slot = Bound::Value(enabled);
        self
    }

    /// Builder-style dimension setter
    pub fn with_dimensions(mut self, rows: usize, columns: usize) -> Self {
        self.row_count = Bound::Value(rows.into());
        self.column_count = Bound::Value(columns.into());
        self
    }
}
