//! Core command-tree model for declarative CLI dispatch.
//!
//! This crate defines the foundational types consumed by the resolution
//! engine in `argtree-runtime`:
//!
//! - [`Command`] — a node in the command tree (flags, positional args,
//!   nested sub-commands, optional runner).
//! - [`FlagSpec`] — a flag with short/long forms, value consumption, and
//!   requiredness.
//! - [`ArgSpec`] — a positional argument, scalar or variadic.
//! - [`Params`] / [`ParamValue`] — the typed parameter map handed to
//!   runners.
//! - [`RunContext`] — cooperative cancellation passed through to runners.
//!
//! Value parsing ([`parse_string`], [`parse_i32`]) converts raw tokens into
//! typed values; parse failures carry a fallback so the engine can continue
//! past them.
//!
//! Linting ([`lint`]) catches structural gaps such as missing names and
//! descriptions before a tree ships.
//!
//! # Example
//!
//! ```
//! use argtree_core::{ArgSpec, Command, FlagSpec, lint, parse_i32};
//!
//! let tree = Command::new("greet")
//!     .with_flag(
//!         FlagSpec::with_value(Some("n"), "name")
//!             .with_description("Name to greet")
//!             .required(),
//!     )
//!     .with_subcommand(
//!         Command::new("wave")
//!             .with_short("Wave a number of times")
//!             .with_arg(ArgSpec::optional("times").with_parser(parse_i32)),
//!     );
//!
//! assert!(tree.find_subcommand("wave").is_some());
//! assert!(lint(&tree).is_empty());
//! ```

mod command;
mod context;
mod lint;
mod params;
mod value;

pub use command::{ArgSpec, BoxedError, Command, FlagSpec, Runner};
pub use context::RunContext;
pub use lint::{LintWarning, lint};
pub use params::{ParamError, ParamValue, Params, RAW_ARGS_KEY};
pub use value::{ValueError, ValueParser, parse_i32, parse_string};
