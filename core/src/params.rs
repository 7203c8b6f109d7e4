//! Typed parameter map produced by argument resolution.
//!
//! Resolution stores every matched flag and positional argument in a
//! [`Params`] map keyed by the spec name. Values are [`ParamValue`] variants;
//! handlers read them back through the typed accessors instead of matching on
//! the enum.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved key holding the original token list of the deepest resolved
/// command level.
///
/// Read it through [`Params::raw_args`]; resolution overwrites it at every
/// level it descends into.
pub const RAW_ARGS_KEY: &str = "_args";

/// A single resolved parameter value.
///
/// # Examples
///
/// ```
/// use argtree_core::ParamValue;
///
/// let value = ParamValue::from("alice");
/// assert_eq!(value.as_str(), Some("alice"));
/// assert_eq!(value.as_int(), None);
/// assert_eq!(value.type_name(), "string");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamValue {
    /// A string value (the default for flags and arguments).
    Str(String),
    /// A 32-bit signed integer.
    Int(i32),
    /// A boolean, stored as `true` for value-less flags.
    Bool(bool),
    /// Ordered values collected by a variadic argument.
    Values(Vec<String>),
    /// The raw token list stored under [`RAW_ARGS_KEY`].
    RawArgs(Vec<String>),
}

impl ParamValue {
    /// Returns the string value, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value, if this is an `Int`.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            ParamValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the collected variadic values, if this is a `Values`.
    pub fn as_values(&self) -> Option<&[String]> {
        match self {
            ParamValue::Values(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the raw token list, if this is a `RawArgs`.
    pub fn as_raw_args(&self) -> Option<&[String]> {
        match self {
            ParamValue::RawArgs(v) => Some(v),
            _ => None,
        }
    }

    /// Human-readable name of the stored variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Str(_) => "string",
            ParamValue::Int(_) => "int32",
            ParamValue::Bool(_) => "bool",
            ParamValue::Values(_) => "values",
            ParamValue::RawArgs(_) => "raw args",
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Int(n)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(v: Vec<String>) -> Self {
        ParamValue::Values(v)
    }
}

/// Error returned by the typed accessors on [`Params`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// No value is stored under the requested key.
    #[error("parameter '{0}' not set")]
    Missing(String),
    /// A value is stored, but under a different variant than requested.
    #[error("parameter '{key}' holds {actual}, not {expected}")]
    WrongType {
        /// The requested key
        key: String,
        /// Variant name the accessor expected
        expected: &'static str,
        /// Variant name actually stored
        actual: &'static str,
    },
}

/// Map of resolved parameters handed to command runners.
///
/// Created fresh per run, populated level by level as resolution descends
/// the command tree. Keys from deeper levels overwrite parent keys of the
/// same name.
///
/// # Examples
///
/// ```
/// use argtree_core::{ParamValue, Params};
///
/// let mut params = Params::new();
/// params.insert("user", "alice");
/// params.insert("count", 3);
///
/// assert_eq!(params.str_value("user").unwrap(), "alice");
/// assert_eq!(params.int_value("count").unwrap(), 3);
/// assert!(params.str_value("count").is_err());
/// assert!(params.str_value("missing").is_err());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    entries: HashMap<String, ParamValue>,
}

impl Params {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under the given key, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the raw value stored under the key.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Whether a value is stored under the key.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all stored entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merges another map into this one. Keys present in `other` overwrite
    /// keys already stored, which gives sub-command parameters precedence
    /// over parent parameters of the same name.
    ///
    /// # Examples
    ///
    /// ```
    /// use argtree_core::Params;
    ///
    /// let mut parent = Params::new();
    /// parent.insert("env", "staging");
    ///
    /// let mut child = Params::new();
    /// child.insert("env", "production");
    ///
    /// parent.merge(child);
    /// assert_eq!(parent.str_value("env").unwrap(), "production");
    /// ```
    pub fn merge(&mut self, other: Params) {
        for (key, value) in other.entries {
            self.entries.insert(key, value);
        }
    }

    /// Returns the string stored under the key.
    pub fn str_value(&self, key: &str) -> Result<&str, ParamError> {
        let value = self.require(key)?;
        value.as_str().ok_or_else(|| wrong_type(key, "string", value))
    }

    /// Returns the integer stored under the key.
    pub fn int_value(&self, key: &str) -> Result<i32, ParamError> {
        let value = self.require(key)?;
        value.as_int().ok_or_else(|| wrong_type(key, "int32", value))
    }

    /// Returns the boolean stored under the key.
    pub fn bool_value(&self, key: &str) -> Result<bool, ParamError> {
        let value = self.require(key)?;
        value.as_bool().ok_or_else(|| wrong_type(key, "bool", value))
    }

    /// Returns the variadic values stored under the key.
    pub fn values(&self, key: &str) -> Result<&[String], ParamError> {
        let value = self.require(key)?;
        value
            .as_values()
            .ok_or_else(|| wrong_type(key, "values", value))
    }

    /// Returns the original token list of the deepest resolved level, or an
    /// empty slice when resolution has not stored one. Useful for handlers
    /// that pass raw trailing tokens through to another program.
    pub fn raw_args(&self) -> &[String] {
        match self.entries.get(RAW_ARGS_KEY) {
            Some(ParamValue::RawArgs(tokens)) => tokens,
            _ => &[],
        }
    }

    fn require(&self, key: &str) -> Result<&ParamValue, ParamError> {
        self.entries
            .get(key)
            .ok_or_else(|| ParamError::Missing(key.to_string()))
    }
}

fn wrong_type(key: &str, expected: &'static str, value: &ParamValue) -> ParamError {
    ParamError::WrongType {
        key: key.to_string(),
        expected,
        actual: value.type_name(),
    }
}
