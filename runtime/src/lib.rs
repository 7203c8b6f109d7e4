//! Resolution and dispatch for `argtree` command trees.
//!
//! This crate turns a raw token stream and a declared [`Command`] tree into
//! an executed runner, rendered help text, or a version string:
//!
//! - [`resolve`] walks the tree, matching flags, positional arguments, and
//!   sub-command names level by level.
//! - [`render_help`] formats the aligned help text for any command.
//! - [`Dispatcher`] ties both together behind a pair of output sinks and
//!   adds the `lint` entry point and the hidden root version flag.
//!
//! # Example
//!
//! ```
//! use argtree_core::{ArgSpec, Command, FlagSpec};
//! use argtree_runtime::resolve;
//!
//! let root = Command::new("tool").with_subcommand(
//!     Command::new("copy")
//!         .with_flag(FlagSpec::boolean(Some("f"), "force"))
//!         .with_arg(ArgSpec::required("source")),
//! );
//!
//! let tokens: Vec<String> = ["copy", "-f", "notes.txt"]
//!     .iter()
//!     .map(|t| t.to_string())
//!     .collect();
//! let mut err = Vec::new();
//! let resolution = resolve(&root, &tokens, &mut err)?;
//!
//! assert_eq!(resolution.command.name, "copy");
//! assert!(resolution.params.bool_value("force")?);
//! assert_eq!(resolution.params.str_value("source")?, "notes.txt");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`Command`]: argtree_core::Command

mod dispatch;
mod help;
mod resolve;

pub use dispatch::{DEFAULT_VERSION, Dispatcher, RunError, run};
pub use help::{is_help_token, render_help, usage_line};
pub use resolve::{Resolution, ResolveError, flag_like, resolve};
