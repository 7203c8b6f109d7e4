//! Value parsers applied to raw flag and argument tokens.
//!
//! A parser turns one raw token into a typed [`ParamValue`]. Specs carry an
//! optional parser; resolution falls back to [`parse_string`] when none is
//! set. Parse failures are non-fatal by policy: the engine reports the error
//! on its error sink and stores the fallback value the error carries.

use thiserror::Error;

use crate::ParamValue;

/// Converts a raw token into a typed [`ParamValue`].
///
/// Plain function pointers keep [`FlagSpec`](crate::FlagSpec) and
/// [`ArgSpec`](crate::ArgSpec) cheap to clone and debug-print.
pub type ValueParser = fn(&str) -> Result<ParamValue, ValueError>;

/// Error from a [`ValueParser`].
///
/// Carries the fallback value the resolution engine stores when it continues
/// past the failure, so a failed parse still leaves a well-typed entry in
/// the parameter map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValueError {
    message: String,
    fallback: ParamValue,
}

impl ValueError {
    /// Creates a parse error with the fallback value to store.
    pub fn new(message: impl Into<String>, fallback: ParamValue) -> Self {
        Self {
            message: message.into(),
            fallback,
        }
    }

    /// The fallback value stored when the failure is treated as non-fatal.
    pub fn fallback(&self) -> &ParamValue {
        &self.fallback
    }

    /// Consumes the error and returns the fallback value.
    pub fn into_fallback(self) -> ParamValue {
        self.fallback
    }
}

/// Passthrough parser: stores the raw token as a string. Never fails.
///
/// This is the default applied when a spec declares no parser.
pub fn parse_string(raw: &str) -> Result<ParamValue, ValueError> {
    Ok(ParamValue::Str(raw.to_string()))
}

/// Base-10, 32-bit signed integer parser.
///
/// On failure the error carries `-1` as the fallback. The sentinel is
/// deliberately not zero: a caller that reads the stored value without
/// checking the reported error sees a value that stands out.
///
/// # Examples
///
/// ```
/// use argtree_core::{ParamValue, parse_i32};
///
/// assert_eq!(parse_i32("32").unwrap(), ParamValue::Int(32));
///
/// let err = parse_i32("test").unwrap_err();
/// assert_eq!(err.into_fallback(), ParamValue::Int(-1));
/// ```
pub fn parse_i32(raw: &str) -> Result<ParamValue, ValueError> {
    match raw.parse::<i32>() {
        Ok(n) => Ok(ParamValue::Int(n)),
        Err(err) => Err(ValueError::new(
            format!("invalid integer '{raw}': {err}"),
            ParamValue::Int(-1),
        )),
    }
}
